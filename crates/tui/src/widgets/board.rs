//! Scrumban board overlay rendering.
//!
//! The board renders as a centered overlay with the four lanes side by
//! side. Cards are one line each; the selected card in the focused lane
//! is highlighted.

use nebula_protocol::{Lane, LaneKind, ScrumbanBoard};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::centered_rect;

/// Returns the accent color of a lane.
#[must_use]
pub const fn lane_color(kind: LaneKind) -> Color {
    match kind {
        LaneKind::Todo => Color::DarkGray,
        LaneKind::Blocked => Color::Red,
        LaneKind::InProgress => Color::Blue,
        LaneKind::Done => Color::Green,
    }
}

/// Renders the board overlay on top of the current view.
pub fn render_board_overlay(
    board: &ScrumbanBoard,
    selected_lane: usize,
    selected_card: Option<usize>,
    area: Rect,
    buf: &mut Buffer,
) {
    let width = area.width.saturating_sub(4).min(104);
    let height = area.height.saturating_sub(2).min(24);
    let popup = centered_rect(width, height, area);
    if popup.width < 12 || popup.height < 5 {
        return;
    }

    Clear.render(popup, buf);

    let outer = Block::default()
        .title(Span::styled(
            " Scrumban Board ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(
            " ←→↑↓ navigate · [ ] move card · Esc close ",
            Style::default().fg(Color::DarkGray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = outer.inner(popup);
    outer.render(popup, buf);

    let lane_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(inner);

    for (i, kind) in LaneKind::all().iter().enumerate() {
        let lane = board.lane(*kind);
        let focused = selected_lane == i;
        let selection = if focused { selected_card } else { None };
        render_lane(lane, focused, selection, lane_areas[i], buf);
    }
}

/// Renders one lane column.
fn render_lane(lane: &Lane, focused: bool, selection: Option<usize>, area: Rect, buf: &mut Buffer) {
    let accent = lane_color(lane.kind);
    let border_color = if focused { accent } else { Color::DarkGray };

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ({}) ", lane.kind.display_name(), lane.len()),
            Style::default().fg(accent).add_modifier(if focused {
                Modifier::BOLD
            } else {
                Modifier::empty()
            }),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let max_width = area.width.saturating_sub(4) as usize;
    let lines: Vec<Line<'static>> = lane
        .cards
        .iter()
        .enumerate()
        .map(|(idx, card)| {
            let selected = selection == Some(idx);
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if selected { "▸ " } else { "• " };
            Line::from(Span::styled(
                format!("{marker}{}", truncate(&card.title, max_width)),
                style,
            ))
        })
        .collect();

    Paragraph::new(lines).block(block).render(area, buf);
}

/// Truncates a card title to the lane width.
fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        text.to_string()
    } else if max_width > 1 {
        let mut out: String = text.chars().take(max_width - 1).collect();
        out.push('…');
        out
    } else {
        text.chars().take(max_width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use nebula_protocol::ScrumCard;

    #[test]
    fn lane_colors_are_distinct() {
        let colors: Vec<_> = LaneKind::all().iter().map(|k| lane_color(*k)).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn overlay_renders_all_lane_titles() {
        let board = ScrumbanBoard::new();
        let area = Rect::new(0, 0, 100, 24);
        let mut buf = Buffer::empty(area);

        render_board_overlay(&board, 0, None, area, &mut buf);

        let content = buffer_to_string(&buf);
        assert!(content.contains("To Do"));
        assert!(content.contains("Blocked"));
        assert!(content.contains("In Progress"));
        assert!(content.contains("Done"));
    }

    #[test]
    fn overlay_renders_card_titles() {
        let mut board = ScrumbanBoard::new();
        board.add_card(ScrumCard::new("Login card"));

        let area = Rect::new(0, 0, 100, 24);
        let mut buf = Buffer::empty(area);
        render_board_overlay(&board, 0, Some(0), area, &mut buf);

        let content = buffer_to_string(&buf);
        assert!(content.contains("Login card"));
        assert!(content.contains('▸'));
    }

    #[test]
    fn overlay_skips_tiny_areas() {
        let board = ScrumbanBoard::new();
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);

        // Must not panic on an unusably small terminal.
        render_board_overlay(&board, 0, None, area, &mut buf);
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 8), "a longe…");
    }
}
