pub mod scorer;

pub use scorer::{StrokeScorer, ScoringConfig, ScoreResult};
