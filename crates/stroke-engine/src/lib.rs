pub mod api;
pub mod assets;
pub mod bridge;
pub mod capture;
pub mod geometry;
pub mod input;
pub mod progression;
pub mod scoring;

// Re-export key types at crate root for convenience
pub use api::commands::{RenderCommand, CommandRecord};
pub use api::config::EngineConfig;
pub use api::engine::{TraceEngine, SessionContext, StrokeOutcome};
pub use api::telemetry::{
    TelemetrySink, TelemetryOutbox, NullTelemetry, TelemetryError,
    StrokeRecord, StrokeRecordResponse,
};
pub use assets::{
    CharacterDefinition, CharacterSet, CharacterPreview, CharacterError, ReferenceStroke, node_label,
};
pub use bridge::protocol::{encode_commands, PROTOCOL_VERSION};
pub use capture::PathAccumulator;
pub use geometry::{Node, Path, simplify, key_points, Compaction};
pub use input::{InputEvent, InputQueue};
pub use progression::{Progression, Phase, Transition};
pub use scoring::{StrokeScorer, ScoringConfig, ScoreResult};
