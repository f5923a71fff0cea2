//! Widget components for the nebula TUI.
//!
//! Each widget is a pure function rendering state into a buffer, which
//! keeps presentation testable without a real terminal.
//!
//! - [`markdown`]: markdown-to-styled-lines conversion for replies
//! - [`transcript`]: the chat transcript and input line
//! - [`board`]: the Scrumban board overlay
//! - [`status_bar`]: footer with keybinding hints, notices, and credits
//! - [`help`]: the help overlay

pub mod board;
pub mod help;
pub mod markdown;
pub mod status_bar;
pub mod transcript;

pub use board::render_board_overlay;
pub use help::render_help_overlay;
pub use markdown::markdown_lines;
pub use status_bar::render_status_bar;
pub use transcript::{render_input, render_transcript};

use ratatui::layout::Rect;

/// Creates a centered rectangle within a given area, clamped to fit.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let popup_width = width.min(area.width);
    let popup_height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    Rect::new(x, y, popup_width, popup_height)
}
