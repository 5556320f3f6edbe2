pub mod machine;

pub use machine::{Progression, Phase, Transition};
