//! Path compaction for telemetry and storage.
//!
//! Douglas–Peucker keeps the visual shape of a trace with a handful of nodes.
//! The output is never used for scoring; the scorer always sees the raw trace.

use serde::{Deserialize, Serialize};

use super::node::{perpendicular_distance, Node, Path};

/// Default simplification tolerance in pixels (800×600 canvas).
pub const DEFAULT_TOLERANCE: f32 = 5.0;

/// Simplify a path with the Douglas–Peucker algorithm.
///
/// Paths of three nodes or fewer are returned unchanged. The first and last
/// node of the input are always preserved. A negative tolerance behaves as 0.
pub fn simplify(path: &[Node], tolerance: f32) -> Path {
    let tolerance = tolerance.max(0.0);
    if path.len() <= 3 {
        return path.to_vec();
    }

    let (max_dist, split) = farthest_from_chord(path);

    if max_dist > tolerance {
        let mut left = simplify(&path[..=split], tolerance);
        let right = simplify(&path[split..], tolerance);
        // Split node is the head of `right`
        left.extend_from_slice(&right[1..]);
        left
    } else {
        vec![path[0], path[path.len() - 1]]
    }
}

/// Reduce a path to start, midpoint and end.
pub fn key_points(path: &[Node]) -> Path {
    if path.len() <= 3 {
        return path.to_vec();
    }
    vec![path[0], path[path.len() / 2], path[path.len() - 1]]
}

/// Find the interior node farthest from the first→last chord.
/// Returns (distance, index). Only the first of equally distant nodes wins.
fn farthest_from_chord(path: &[Node]) -> (f32, usize) {
    let first = path[0];
    let last = path[path.len() - 1];

    let mut max_dist = 0.0;
    let mut max_index = 0;
    for (i, &p) in path.iter().enumerate().take(path.len() - 1).skip(1) {
        let d = perpendicular_distance(p, first, last);
        if d > max_dist {
            max_dist = d;
            max_index = i;
        }
    }
    (max_dist, max_index)
}

/// How a finished trace is compacted before it is shipped as telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Compaction {
    /// Douglas–Peucker with the given tolerance in pixels.
    DouglasPeucker { tolerance: f32 },
    /// Start, midpoint and end only.
    KeyPoints,
    /// Ship the trace as captured.
    Raw,
}

impl Default for Compaction {
    fn default() -> Self {
        Compaction::DouglasPeucker { tolerance: DEFAULT_TOLERANCE }
    }
}

impl Compaction {
    pub fn apply(&self, path: &[Node]) -> Path {
        match *self {
            Compaction::DouglasPeucker { tolerance } => simplify(path, tolerance),
            Compaction::KeyPoints => key_points(path),
            Compaction::Raw => path.to_vec(),
        }
    }
}
