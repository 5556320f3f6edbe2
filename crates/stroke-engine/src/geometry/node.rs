use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A single 2-D point in canvas-local pixels.
///
/// Used for both reference skeleton points and trace samples. `#[repr(C)]`
/// so a path can be handed to the host as a flat `[x, y, x, y, ...]` slice.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Node {
    pub x: f32,
    pub y: f32,
}

/// An ordered sequence of nodes: a live trace or a reference skeleton.
pub type Path = Vec<Node>;

impl Node {
    pub const FLOATS: usize = 2;

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Euclidean distance to another node.
    #[inline]
    pub fn distance(self, other: Node) -> f32 {
        self.to_vec2().distance(other.to_vec2())
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vec2> for Node {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Node> for Vec2 {
    fn from(n: Node) -> Self {
        n.to_vec2()
    }
}

impl From<[f32; 2]> for Node {
    fn from(p: [f32; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

/// Perpendicular distance of `p` from the line through `a` and `b`.
///
/// `|cross(b - a, a - p)| / |b - a|`. A degenerate segment (`a == b`) yields 0.
pub fn perpendicular_distance(p: Node, a: Node, b: Node) -> f32 {
    let ab = b.to_vec2() - a.to_vec2();
    let len = ab.length();
    if len == 0.0 {
        return 0.0;
    }
    let ap = a.to_vec2() - p.to_vec2();
    ab.perp_dot(ap).abs() / len
}

/// Overall direction of a path: `last - first`. Zero for paths shorter than 2.
pub fn overall_direction(path: &[Node]) -> Vec2 {
    match (path.first(), path.last()) {
        (Some(first), Some(last)) => last.to_vec2() - first.to_vec2(),
        _ => Vec2::ZERO,
    }
}

/// Flatten a path into `[x0, y0, x1, y1, ...]`.
pub fn as_floats(path: &[Node]) -> &[f32] {
    bytemuck::cast_slice(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Node::new(0.0, 0.0);
        let b = Node::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn perpendicular_distance_from_horizontal_line() {
        let a = Node::new(0.0, 0.0);
        let b = Node::new(10.0, 0.0);
        assert!((perpendicular_distance(Node::new(5.0, 7.0), a, b) - 7.0).abs() < 1e-5);
        assert!((perpendicular_distance(Node::new(5.0, -3.0), a, b) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn perpendicular_distance_degenerate_segment_is_zero() {
        let a = Node::new(4.0, 4.0);
        assert_eq!(perpendicular_distance(Node::new(100.0, 100.0), a, a), 0.0);
    }

    #[test]
    fn overall_direction_of_short_paths() {
        assert_eq!(overall_direction(&[]), Vec2::ZERO);
        assert_eq!(overall_direction(&[Node::new(1.0, 1.0)]), Vec2::ZERO);
        let dir = overall_direction(&[Node::new(1.0, 1.0), Node::new(0.0, 0.0), Node::new(4.0, 5.0)]);
        assert_eq!(dir, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn flatten_to_floats() {
        let path = vec![Node::new(1.0, 2.0), Node::new(3.0, 4.0)];
        assert_eq!(as_floats(&path), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn serde_matches_xy_contract() {
        let n: Node = serde_json::from_str(r#"{"x": 150, "y": 300.5}"#).unwrap();
        assert_eq!(n, Node::new(150.0, 300.5));
        assert_eq!(serde_json::to_string(&n).unwrap(), r#"{"x":150.0,"y":300.5}"#);
    }
}
