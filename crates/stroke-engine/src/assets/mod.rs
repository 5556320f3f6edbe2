pub mod characters;

pub use characters::{
    CharacterDefinition, CharacterError, CharacterPreview, CharacterSet, ReferenceStroke,
    node_label,
};
