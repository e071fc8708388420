use chip8_core::FrameBuffer;

/// Formats a Chip-8 FrameBuffer as text, one line per row: `#` for lit pixels and `.` for dark
/// ones.
pub fn frame_to_text(frame: &FrameBuffer) -> String {
    frame
        .iter()
        .map(|row| {
            row.iter()
                .map(|&pixel| if pixel == 1 { '#' } else { '.' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
