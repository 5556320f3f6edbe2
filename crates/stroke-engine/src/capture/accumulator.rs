use crate::geometry::{Node, Path};

/// Buffers the live pointer trace for the stroke in progress.
///
/// No filtering or smoothing happens here: the trace is exactly what the
/// input source delivered, in order.
pub struct PathAccumulator {
    points: Path,
    active: bool,
}

impl PathAccumulator {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(256),
            active: false,
        }
    }

    /// Start a new trace at `point`. Any unfinished trace is discarded.
    pub fn begin(&mut self, point: Node) {
        self.points.clear();
        self.points.push(point);
        self.active = true;
    }

    /// Append `point` if a trace is active. Returns whether it was appended.
    pub fn extend(&mut self, point: Node) -> bool {
        if !self.active {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Finish the trace and hand it over. Empty if `begin` was never called
    /// (or the trace was already ended).
    pub fn end(&mut self) -> Path {
        if !self.active {
            return Vec::new();
        }
        self.active = false;
        std::mem::take(&mut self.points)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The in-progress trace, for live ink.
    pub fn points(&self) -> &[Node] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for PathAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
