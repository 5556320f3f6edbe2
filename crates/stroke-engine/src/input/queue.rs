/// Pointer events the engine understands.
/// Touch, mouse and pen all arrive as the same events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pen down at canvas coordinates (x, y). Starts a trace.
    PointerDown { x: f32, y: f32 },
    /// Pen moved to (x, y) while down.
    PointerMove { x: f32, y: f32 },
    /// Pen lifted. The release position is not part of the trace.
    PointerUp { x: f32, y: f32 },
    /// The pointer was released outside the drawing surface or the host
    /// lost it. Evaluated exactly like `PointerUp`.
    PointerCancel,
}

/// Pointer events buffered by the host between engine ticks.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(64),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
