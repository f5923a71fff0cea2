//! Shared helpers for widget tests.

use ratatui::buffer::Buffer;

/// Flattens a buffer into a newline-separated string of cell symbols.
pub(crate) fn buffer_to_string(buf: &Buffer) -> String {
    let mut result = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            if let Some(cell) = buf.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        result.push('\n');
    }
    result
}
