//! Help overlay widget.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::centered_rect;

/// The width of the help overlay panel.
const HELP_WIDTH: u16 = 42;

/// The height of the help overlay panel.
const HELP_HEIGHT: u16 = 20;

/// Renders a centered help overlay displaying all keybindings.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let popup_area = centered_rect(HELP_WIDTH, HELP_HEIGHT, area);

    Clear.render(popup_area, buf);

    let help_block = Block::default()
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightYellow));

    let help_text = Paragraph::new(build_help_lines())
        .block(help_block)
        .alignment(Alignment::Left);

    help_text.render(popup_area, buf);
}

/// Builds the lines of help content.
fn build_help_lines() -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Green);
    let text_style = Style::default().fg(Color::White);
    let hint_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    let entry = |key: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<11}"), key_style),
            Span::styled(action, text_style),
        ])
    };

    vec![
        Line::from(""),
        Line::from(Span::styled("  Chat", header_style)),
        entry("Enter", "Send message"),
        entry("Tab", "Next view (chat/search/library)"),
        entry("PgUp/PgDn", "Scroll transcript"),
        entry("Ctrl+L", "Clear history"),
        entry("Ctrl+E", "Export transcript"),
        Line::from(""),
        Line::from(Span::styled("  Board (Ctrl+B)", header_style)),
        entry("←/→", "Select lane"),
        entry("↑/↓", "Select card"),
        entry("[ / ]", "Move card between lanes"),
        entry("Esc", "Close board"),
        Line::from(""),
        Line::from(Span::styled("  General", header_style)),
        entry("F1", "Toggle help"),
        entry("Ctrl+C", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Press any key to close", hint_style)),
    ]
}
