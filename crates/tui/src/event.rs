//! Event handling and key mappings.
//!
//! Key events are mapped to messages depending on the input mode: the
//! chat and search views capture printable characters for their text
//! fields, the library view only navigates, and the board overlay has
//! its own bindings while it is open.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use nebula_protocol::Message;

/// Default poll timeout for events.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// How key events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A text field is focused: printable characters are input.
    Text,
    /// No text field (library view): plain keys navigate.
    Browse,
    /// The board overlay is open and captures all input.
    Board,
}

/// Polls for a terminal event with the default timeout.
///
/// Returns `Some(Event)` if an event is available within the timeout,
/// or `None` if the timeout expires without an event.
///
/// # Errors
///
/// Returns an error if polling the terminal fails.
pub fn poll_event() -> std::io::Result<Option<Event>> {
    if event::poll(POLL_TIMEOUT)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Converts a key event to an application message.
///
/// # Key Bindings
///
/// | Key | Mode | Action |
/// |-----|------|--------|
/// | `Ctrl+C` | any | Quit |
/// | `Ctrl+B` | any | Toggle board overlay |
/// | `Ctrl+L` | any | Clear history |
/// | `Ctrl+E` | any | Export transcript |
/// | `Esc` | any | Contextual escape |
/// | `Tab` | text/browse | Next view |
/// | `Enter` | text | Submit |
/// | `F1` | text/browse | Toggle help |
/// | `PgUp`/`PgDn` | text/browse | Scroll transcript |
/// | arrows | board | Navigate lanes/cards |
/// | `[` / `]` | board | Move selected card |
#[must_use]
pub fn key_to_message(key: KeyEvent, mode: InputMode) -> Option<Message> {
    // Control chords work in every mode.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Message::Quit),
            KeyCode::Char('b') => Some(Message::ToggleBoard),
            KeyCode::Char('l') => Some(Message::ClearHistory),
            KeyCode::Char('e') => Some(Message::ExportTranscript),
            _ => None,
        };
    }

    match mode {
        InputMode::Board => match key.code {
            KeyCode::Esc => Some(Message::Escape),
            KeyCode::Left => Some(Message::BoardLeft),
            KeyCode::Right => Some(Message::BoardRight),
            KeyCode::Up => Some(Message::BoardUp),
            KeyCode::Down => Some(Message::BoardDown),
            KeyCode::Char('[') => Some(Message::BoardMoveLeft),
            KeyCode::Char(']') => Some(Message::BoardMoveRight),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            _ => None,
        },
        InputMode::Text => match key.code {
            KeyCode::Esc => Some(Message::Escape),
            KeyCode::Enter => Some(Message::Submit),
            KeyCode::Tab => Some(Message::CycleView),
            KeyCode::Backspace => Some(Message::InputBackspace),
            KeyCode::PageUp => Some(Message::ScrollUp),
            KeyCode::PageDown => Some(Message::ScrollDown),
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char(ch) => Some(Message::InputChar { ch }),
            _ => None,
        },
        InputMode::Browse => match key.code {
            KeyCode::Esc => Some(Message::Escape),
            KeyCode::Tab => Some(Message::CycleView),
            KeyCode::PageUp => Some(Message::ScrollUp),
            KeyCode::PageDown => Some(Message::ScrollDown),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            _ => None,
        },
    }
}
