//! Status bar rendering.
//!
//! A single footer row: keybinding hints (or a transient notice) on the
//! left, the credit balance on the right.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Width reserved for the credits display.
const CREDITS_WIDTH: u16 = 16;

/// Renders the status bar.
pub fn render_status_bar(
    credits: Option<u64>,
    notice: Option<&str>,
    area: Rect,
    buf: &mut Buffer,
) {
    let [left_area, right_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(CREDITS_WIDTH)]).areas(area);

    let left = match notice {
        Some(notice) => Line::from(Span::styled(
            format!(" {notice}"),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            " Tab views · Enter send · Ctrl+B board · Ctrl+E export · Ctrl+L clear · F1 help",
            Style::default().fg(Color::DarkGray),
        )),
    };
    Paragraph::new(left).render(left_area, buf);

    let balance = match credits {
        Some(credits) => credits.to_string(),
        None => "--".to_string(),
    };
    let right = Line::from(vec![
        Span::styled("Credits: ", Style::default().fg(Color::DarkGray)),
        Span::styled(balance, Style::default().fg(Color::Green)),
        Span::raw(" "),
    ]);
    Paragraph::new(right)
        .alignment(Alignment::Right)
        .render(right_area, buf);
}
