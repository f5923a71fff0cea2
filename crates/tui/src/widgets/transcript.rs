//! Chat transcript and input line rendering.

use nebula_protocol::{ChatRole, ChatTurn};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use super::markdown::markdown_lines;

/// Builds the styled lines of the transcript.
///
/// User turns render as plain text, assistant turns through the markdown
/// converter. A typing indicator line is appended while a reply is in
/// flight.
#[must_use]
pub fn transcript_lines(turns: &[ChatTurn], typing: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for turn in turns {
        let (speaker, color) = match turn.role {
            ChatRole::User => ("You", Color::Cyan),
            ChatRole::Assistant => ("Nebula", Color::Magenta),
        };

        lines.push(Line::from(vec![
            Span::styled(
                speaker.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" · {}", turn.timestamp.format("%H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        match turn.role {
            ChatRole::User => {
                for line in turn.text.lines() {
                    lines.push(Line::from(Span::styled(
                        line.to_string(),
                        Style::default().fg(Color::White),
                    )));
                }
            }
            ChatRole::Assistant => lines.extend(markdown_lines(&turn.text)),
        }

        lines.push(Line::from(""));
    }

    if typing {
        lines.push(Line::from(Span::styled(
            "Nebula is typing…",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

/// Renders the transcript panel, pinned to the bottom.
///
/// `scroll` is the user's scroll-back offset in lines (0 = follow the
/// newest turn).
pub fn render_transcript(
    turns: &[ChatTurn],
    typing: bool,
    scroll: u16,
    area: Rect,
    buf: &mut Buffer,
) {
    let lines = transcript_lines(turns, typing);

    let inner_height = area.height.saturating_sub(2);
    let total = lines.len() as u16;
    let bottom_offset = total.saturating_sub(inner_height);
    let offset = bottom_offset.saturating_sub(scroll);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Conversation ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));

    paragraph.render(area, buf);
}

/// Renders the message input line.
///
/// While a reply is in flight the surface is visibly locked: dimmed
/// border, no cursor, and a waiting title.
pub fn render_input(input: &str, enabled: bool, area: Rect, buf: &mut Buffer) {
    let (title, border_color) = if enabled {
        (" Message ", Color::Cyan)
    } else {
        (" Waiting for reply… ", Color::DarkGray)
    };

    let mut spans = vec![Span::styled(
        input.to_string(),
        Style::default().fg(if enabled { Color::White } else { Color::DarkGray }),
    )];
    if enabled {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color)),
    );

    paragraph.render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn transcript_lines_include_speakers_and_text() {
        let turns = vec![ChatTurn::user("hello"), ChatTurn::assistant("**hi**")];
        let lines = transcript_lines(&turns, false);

        let content: String = lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.as_ref()))
            .collect();

        assert!(content.contains("You"));
        assert!(content.contains("hello"));
        assert!(content.contains("Nebula"));
        assert!(content.contains("hi"));
    }

    #[test]
    fn typing_indicator_appended_while_in_flight() {
        let lines = transcript_lines(&[], true);
        let content: String = lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.as_ref()))
            .collect();

        assert!(content.contains("typing"));

        let without = transcript_lines(&[], false);
        assert!(without.is_empty());
    }

    #[test]
    fn render_transcript_draws_title_and_turns() {
        let turns = vec![ChatTurn::user("hello world")];
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);

        render_transcript(&turns, false, 0, area, &mut buf);

        let content = buffer_to_string(&buf);
        assert!(content.contains("Conversation"));
        assert!(content.contains("hello world"));
    }

    #[test]
    fn render_input_shows_lock_state() {
        let area = Rect::new(0, 0, 40, 3);

        let mut buf = Buffer::empty(area);
        render_input("draft", true, area, &mut buf);
        assert!(buffer_to_string(&buf).contains("Message"));

        let mut buf = Buffer::empty(area);
        render_input("draft", false, area, &mut buf);
        assert!(buffer_to_string(&buf).contains("Waiting for reply"));
    }
}
