//! Markdown rendering for TUI display.
//!
//! Converts assistant reply markdown to styled ratatui [`Line`]s. Covers
//! the constructs chat replies actually use (emphasis, code, lists,
//! links, headings) and leaves wrapping to the surrounding `Paragraph`.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Style context tracking active modifiers during parsing.
#[derive(Default)]
struct StyleContext {
    bold: bool,
    italic: bool,
    in_code_block: bool,
    heading: Option<HeadingLevel>,
    link_url: Option<String>,
    list_depth: usize,
}

impl StyleContext {
    fn current_style(&self) -> Style {
        if self.heading.is_some() {
            return Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
        }
        if self.in_code_block {
            return Style::default().fg(Color::Yellow);
        }
        if self.link_url.is_some() {
            return Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED);
        }

        let mut style = Style::default().fg(Color::White);
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }
}

/// Renders markdown text to styled lines for TUI display.
///
/// # Examples
///
/// ```
/// use nebula_tui::widgets::markdown_lines;
///
/// let lines = markdown_lines("**bold** and `code`");
/// assert!(!lines.is_empty());
/// ```
#[must_use]
pub fn markdown_lines(text: &str) -> Vec<Line<'static>> {
    if text.is_empty() {
        return vec![];
    }

    let parser = Parser::new_ext(text, Options::empty());
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut ctx = StyleContext::default();

    for event in parser {
        match event {
            Event::Start(tag) => match tag {
                Tag::Strong => ctx.bold = true,
                Tag::Emphasis => ctx.italic = true,
                Tag::CodeBlock(_) => {
                    flush_line(&mut current, &mut lines);
                    ctx.in_code_block = true;
                }
                Tag::Heading { level, .. } => {
                    flush_line(&mut current, &mut lines);
                    ctx.heading = Some(level);
                }
                Tag::Link { dest_url, .. } => {
                    ctx.link_url = Some(dest_url.to_string());
                }
                Tag::List(_) => ctx.list_depth += 1,
                Tag::Item => {
                    let indent = "  ".repeat(ctx.list_depth.saturating_sub(1));
                    current.push(Span::styled(
                        format!("{indent}- "),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Strong => ctx.bold = false,
                TagEnd::Emphasis => ctx.italic = false,
                TagEnd::CodeBlock => {
                    flush_line(&mut current, &mut lines);
                    ctx.in_code_block = false;
                }
                TagEnd::Heading(_) => {
                    flush_line(&mut current, &mut lines);
                    ctx.heading = None;
                }
                TagEnd::Link => {
                    if let Some(url) = ctx.link_url.take() {
                        current.push(Span::styled(
                            format!(" ({url})"),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                }
                TagEnd::List(_) => {
                    ctx.list_depth = ctx.list_depth.saturating_sub(1);
                    flush_line(&mut current, &mut lines);
                }
                TagEnd::Item => flush_line(&mut current, &mut lines),
                TagEnd::Paragraph => {
                    flush_line(&mut current, &mut lines);
                    lines.push(Line::from(""));
                }
                _ => {}
            },
            Event::Text(text) => {
                if ctx.in_code_block {
                    let style = ctx.current_style();
                    for line in text.lines() {
                        lines.push(Line::from(Span::styled(format!("  {line}"), style)));
                    }
                } else {
                    current.push(Span::styled(text.to_string(), ctx.current_style()));
                }
            }
            Event::Code(code) => {
                current.push(Span::styled(
                    code.to_string(),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Event::SoftBreak => current.push(Span::raw(" ")),
            Event::HardBreak => flush_line(&mut current, &mut lines),
            Event::Rule => {
                flush_line(&mut current, &mut lines);
                lines.push(Line::from(Span::styled(
                    "\u{2500}".repeat(30),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            _ => {}
        }
    }

    flush_line(&mut current, &mut lines);

    // Drop trailing blank lines left by the last paragraph.
    while lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }

    lines
}

/// Flushes the accumulated spans to a new line.
fn flush_line(current: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>) {
    if !current.is_empty() {
        lines.push(Line::from(std::mem::take(current)));
    }
}
