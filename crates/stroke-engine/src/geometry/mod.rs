pub mod node;
pub mod simplify;

pub use node::{Node, Path, perpendicular_distance, overall_direction, as_floats};
pub use simplify::{simplify, key_points, Compaction, DEFAULT_TOLERANCE};
