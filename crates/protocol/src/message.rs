//! TUI message types for event handling.
//!
//! This module defines the message enum used for communication between
//! the TUI input handler and the application state.

use serde::{Deserialize, Serialize};

/// Messages that represent user actions in the TUI.
///
/// These messages are produced by the input handler and consumed by
/// the application state to update the UI.
///
/// # Examples
///
/// ```
/// use nebula_protocol::Message;
///
/// let msg = Message::Submit;
/// assert!(!msg.is_terminating());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Quit the application.
    Quit,
    /// Escape: close an overlay or clear the active input (contextual).
    Escape,
    /// Submit the chat input (or run the search).
    Submit,
    /// Switch to the next view (chat → search → library → chat).
    CycleView,
    /// Type a character into the active input field.
    InputChar {
        /// The character that was typed.
        ch: char,
    },
    /// Delete the last character of the active input field.
    InputBackspace,
    /// Scroll the transcript up by one page.
    ScrollUp,
    /// Scroll the transcript down by one page.
    ScrollDown,
    /// Toggle the Scrumban board overlay.
    ToggleBoard,
    /// Toggle the help overlay.
    ToggleHelp,
    /// Clear the chat history (local store + backend).
    ClearHistory,
    /// Export the transcript as an HTML file.
    ExportTranscript,

    // --- Board overlay messages ---
    /// Move lane selection to the left.
    BoardLeft,
    /// Move lane selection to the right.
    BoardRight,
    /// Move card selection up within the current lane.
    BoardUp,
    /// Move card selection down within the current lane.
    BoardDown,
    /// Move the selected card to the previous lane.
    BoardMoveLeft,
    /// Move the selected card to the next lane.
    BoardMoveRight,
}

impl Message {
    /// Returns `true` if this message only makes sense while the board
    /// overlay is open.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_protocol::Message;
    ///
    /// assert!(Message::BoardLeft.is_board_action());
    /// assert!(!Message::Submit.is_board_action());
    /// ```
    #[must_use]
    pub fn is_board_action(&self) -> bool {
        matches!(
            self,
            Self::BoardLeft
                | Self::BoardRight
                | Self::BoardUp
                | Self::BoardDown
                | Self::BoardMoveLeft
                | Self::BoardMoveRight
        )
    }

    /// Returns `true` if this message edits the active text input.
    #[must_use]
    pub fn is_input_edit(&self) -> bool {
        matches!(self, Self::InputChar { .. } | Self::InputBackspace)
    }

    /// Returns `true` if this message should terminate the application.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_protocol::Message;
    ///
    /// assert!(Message::Quit.is_terminating());
    /// assert!(!Message::Escape.is_terminating());
    /// ```
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::Quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_action_detection() {
        assert!(Message::BoardLeft.is_board_action());
        assert!(Message::BoardRight.is_board_action());
        assert!(Message::BoardUp.is_board_action());
        assert!(Message::BoardDown.is_board_action());
        assert!(Message::BoardMoveLeft.is_board_action());
        assert!(Message::BoardMoveRight.is_board_action());
        assert!(!Message::Submit.is_board_action());
        assert!(!Message::ToggleBoard.is_board_action());
    }

    #[test]
    fn input_edit_detection() {
        assert!(Message::InputChar { ch: 'a' }.is_input_edit());
        assert!(Message::InputBackspace.is_input_edit());
        assert!(!Message::Submit.is_input_edit());
        assert!(!Message::Escape.is_input_edit());
    }

    #[test]
    fn terminating_detection() {
        assert!(Message::Quit.is_terminating());
        assert!(!Message::Escape.is_terminating());
        assert!(!Message::ClearHistory.is_terminating());
    }

    #[test]
    fn message_serialization_roundtrip() {
        let messages = vec![
            Message::Quit,
            Message::Escape,
            Message::Submit,
            Message::CycleView,
            Message::InputChar { ch: 'x' },
            Message::InputBackspace,
            Message::ScrollUp,
            Message::ScrollDown,
            Message::ToggleBoard,
            Message::ToggleHelp,
            Message::ClearHistory,
            Message::ExportTranscript,
            Message::BoardLeft,
            Message::BoardRight,
            Message::BoardUp,
            Message::BoardDown,
            Message::BoardMoveLeft,
            Message::BoardMoveRight,
        ];

        for msg in messages {
            let json = serde_json::to_string(&msg).expect("serialize");
            let parsed: Message = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(msg, parsed);
        }
    }

    #[test]
    fn message_json_format() {
        let json = serde_json::to_string(&Message::CycleView).expect("serialize");
        assert_eq!(json, r#""cycle_view""#);

        let json = serde_json::to_string(&Message::ClearHistory).expect("serialize");
        assert_eq!(json, r#""clear_history""#);
    }
}
