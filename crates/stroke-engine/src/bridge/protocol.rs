/// Command buffer layout shared with the host page.
/// Must stay in sync with the TypeScript reader.
///
/// Layout (all values f32):
/// ```text
/// [Header: 4 floats]  protocol version, command count, stroke index, stroke count
/// [Commands: count × 4 floats]  kind, a, b, c
/// ```

use crate::api::commands::{CommandRecord, RenderCommand};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 4;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_COMMAND_COUNT: usize = 1;
pub const HEADER_STROKE_INDEX: usize = 2;
pub const HEADER_STROKE_COUNT: usize = 3;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Command kinds (the `kind` float of each record).
pub const CMD_SHOW_STROKE_NODES: u32 = 1;
pub const CMD_HIDE_STROKE_NODES: u32 = 2;
pub const CMD_MARK_STROKE_COMPLETE: u32 = 3;
pub const CMD_CLEAR_LIVE_INK: u32 = 4;
pub const CMD_REDRAW_COMPLETED: u32 = 5;
pub const CMD_FAILURE_FEEDBACK: u32 = 6;
pub const CMD_SUCCESS_FEEDBACK: u32 = 7;
pub const CMD_CHARACTER_COMPLETE: u32 = 8;

/// Pack a frame's commands behind a header into `out` (cleared first).
pub fn encode_commands(
    commands: &[RenderCommand],
    stroke_index: usize,
    stroke_count: usize,
    out: &mut Vec<f32>,
) {
    out.clear();
    out.reserve(HEADER_FLOATS + commands.len() * CommandRecord::FLOATS);
    let mut header = [0.0f32; HEADER_FLOATS];
    header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    header[HEADER_COMMAND_COUNT] = commands.len() as f32;
    header[HEADER_STROKE_INDEX] = stroke_index as f32;
    header[HEADER_STROKE_COUNT] = stroke_count as f32;
    out.extend_from_slice(&header);

    let records: Vec<CommandRecord> = commands.iter().map(RenderCommand::to_record).collect();
    out.extend_from_slice(bytemuck::cast_slice(&records));
}
