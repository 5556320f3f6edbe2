use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Node;

/// One brush stroke of a character: ordered skeleton nodes, start to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStroke {
    pub nodes: Vec<Node>,
}

impl ReferenceStroke {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn start(&self) -> Option<Node> {
        self.nodes.first().copied()
    }

    pub fn end(&self) -> Option<Node> {
        self.nodes.last().copied()
    }
}

/// A character to practise. Stroke order is fixed and meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDefinition {
    pub id: u32,
    pub name: String,
    /// Outline image drawn underneath the trace, if the host has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg_url: Option<String>,
    #[serde(alias = "strokeData")]
    pub strokes: Vec<ReferenceStroke>,
}

/// Entry for a character picker. The page shows `name` as the tile
/// label and the outline image when there is one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPreview {
    pub id: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_url: Option<String>,
    pub stroke_count: usize,
}

/// Errors from loading or validating character data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CharacterError {
    #[error("invalid character data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("character has no strokes")]
    NoStrokes,
    #[error("stroke {stroke} has no nodes")]
    EmptyStroke { stroke: usize },
    #[error("stroke {stroke} node {node} is not a finite coordinate")]
    NonFinite { stroke: usize, node: usize },
    #[error("duplicate character id {0}")]
    DuplicateId(u32),
}

impl CharacterDefinition {
    /// Parse and validate a single character.
    pub fn from_json(json: &str) -> Result<Self, CharacterError> {
        let def: Self = serde_json::from_str(json)?;
        def.validate()?;
        Ok(def)
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn stroke(&self, index: usize) -> Option<&ReferenceStroke> {
        self.strokes.get(index)
    }

    /// Check the data is usable for practice. The engine never relies on
    /// this: unvalidated data still fails closed.
    pub fn validate(&self) -> Result<(), CharacterError> {
        if self.strokes.is_empty() {
            return Err(CharacterError::NoStrokes);
        }
        for (s, stroke) in self.strokes.iter().enumerate() {
            if stroke.nodes.is_empty() {
                return Err(CharacterError::EmptyStroke { stroke: s });
            }
            if let Some(n) = stroke.nodes.iter().position(|node| !node.is_finite()) {
                return Err(CharacterError::NonFinite { stroke: s, node: n });
            }
        }
        Ok(())
    }

    pub fn preview(&self) -> CharacterPreview {
        CharacterPreview {
            id: self.id,
            name: self.name.clone(),
            svg_url: self.svg_url.clone(),
            stroke_count: self.stroke_count(),
        }
    }
}

/// Marker label for a node, 1-based: stroke 0 node 2 is "1.3".
pub fn node_label(stroke: usize, node: usize) -> String {
    format!("{}.{}", stroke + 1, node + 1)
}

/// An ordered library of characters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterSet {
    characters: Vec<CharacterDefinition>,
}

impl CharacterSet {
    pub fn new(characters: Vec<CharacterDefinition>) -> Result<Self, CharacterError> {
        for (i, c) in characters.iter().enumerate() {
            c.validate()?;
            if characters[..i].iter().any(|other| other.id == c.id) {
                return Err(CharacterError::DuplicateId(c.id));
            }
        }
        Ok(Self { characters })
    }

    /// Parse a JSON array of characters.
    pub fn from_json(json: &str) -> Result<Self, CharacterError> {
        let characters: Vec<CharacterDefinition> = serde_json::from_str(json)?;
        Self::new(characters)
    }

    pub fn get(&self, id: u32) -> Option<&CharacterDefinition> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterDefinition> {
        self.characters.iter()
    }

    pub fn previews(&self) -> Vec<CharacterPreview> {
        self.characters.iter().map(CharacterDefinition::preview).collect()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
