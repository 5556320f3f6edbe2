use bytemuck::{Pod, Zeroable};

use crate::bridge::protocol::{
    CMD_CHARACTER_COMPLETE, CMD_CLEAR_LIVE_INK, CMD_FAILURE_FEEDBACK, CMD_HIDE_STROKE_NODES,
    CMD_MARK_STROKE_COMPLETE, CMD_REDRAW_COMPLETED, CMD_SHOW_STROKE_NODES, CMD_SUCCESS_FEEDBACK,
};

/// Intent sent to the rendering collaborator.
///
/// The engine never touches drawables; the renderer owns the mapping from a
/// stroke index to its node markers and ink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand {
    /// Make the node markers of `stroke` visible.
    ShowStrokeNodes { stroke: usize },
    /// Hide the node markers of `stroke`.
    HideStrokeNodes { stroke: usize },
    /// Tint the markers of `stroke` as done.
    MarkStrokeComplete { stroke: usize },
    /// Wipe the live ink layer.
    ClearLiveInk,
    /// Redraw the reference ink of strokes `0..count`.
    RedrawCompletedStrokes { count: usize },
    /// Play the transient "try again" feedback for `stroke`.
    FailureFeedback { stroke: usize, score: f32 },
    /// Play the success feedback for `stroke`.
    SuccessFeedback { stroke: usize, score: f32 },
    /// Every stroke of the character passed.
    CharacterComplete { character_id: u32 },
}

/// A render command as written to the host-visible buffer.
/// Generic container: `kind` identifies the command, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CommandRecord {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl CommandRecord {
    pub const FLOATS: usize = 4;

    fn new(kind: u32, a: f32, b: f32) -> Self {
        Self { kind: kind as f32, a, b, c: 0.0 }
    }
}

impl RenderCommand {
    pub fn kind(&self) -> u32 {
        match self {
            RenderCommand::ShowStrokeNodes { .. } => CMD_SHOW_STROKE_NODES,
            RenderCommand::HideStrokeNodes { .. } => CMD_HIDE_STROKE_NODES,
            RenderCommand::MarkStrokeComplete { .. } => CMD_MARK_STROKE_COMPLETE,
            RenderCommand::ClearLiveInk => CMD_CLEAR_LIVE_INK,
            RenderCommand::RedrawCompletedStrokes { .. } => CMD_REDRAW_COMPLETED,
            RenderCommand::FailureFeedback { .. } => CMD_FAILURE_FEEDBACK,
            RenderCommand::SuccessFeedback { .. } => CMD_SUCCESS_FEEDBACK,
            RenderCommand::CharacterComplete { .. } => CMD_CHARACTER_COMPLETE,
        }
    }

    pub fn to_record(&self) -> CommandRecord {
        let kind = self.kind();
        match *self {
            RenderCommand::ShowStrokeNodes { stroke }
            | RenderCommand::HideStrokeNodes { stroke }
            | RenderCommand::MarkStrokeComplete { stroke } => CommandRecord::new(kind, stroke as f32, 0.0),
            RenderCommand::ClearLiveInk => CommandRecord::new(kind, 0.0, 0.0),
            RenderCommand::RedrawCompletedStrokes { count } => CommandRecord::new(kind, count as f32, 0.0),
            RenderCommand::FailureFeedback { stroke, score }
            | RenderCommand::SuccessFeedback { stroke, score } => CommandRecord::new(kind, stroke as f32, score),
            RenderCommand::CharacterComplete { character_id } => {
                CommandRecord::new(kind, character_id as f32, 0.0)
            }
        }
    }
}
