//! Top-level view types.
//!
//! The client shows exactly one of three panel surfaces at a time. The
//! view switcher enforces that invariant on every transition.

use serde::{Deserialize, Serialize};

/// One of the three mutually exclusive top-level views.
///
/// # Examples
///
/// ```
/// use nebula_protocol::ViewKind;
///
/// assert_eq!(ViewKind::Chat.display_name(), "Chat");
/// assert_eq!(ViewKind::Library.next(), ViewKind::Chat);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// The chat transcript and input line.
    #[default]
    Chat,
    /// Local search over the message history.
    Search,
    /// The (static) scenario library.
    Library,
}

impl ViewKind {
    /// Returns all views in tab order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Chat, Self::Search, Self::Library]
    }

    /// Returns a human-readable display name for the view.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::Search => "Search",
            Self::Library => "Library",
        }
    }

    /// Returns the index of this view in tab order (0-2).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Chat => 0,
            Self::Search => 1,
            Self::Library => 2,
        }
    }

    /// Returns the next view in tab order, wrapping around.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_protocol::ViewKind;
    ///
    /// assert_eq!(ViewKind::Chat.next(), ViewKind::Search);
    /// assert_eq!(ViewKind::Library.next(), ViewKind::Chat);
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Chat => Self::Search,
            Self::Search => Self::Library,
            Self::Library => Self::Chat,
        }
    }

    /// Returns `true` if this view has a text input field.
    #[must_use]
    pub const fn has_text_input(self) -> bool {
        matches!(self, Self::Chat | Self::Search)
    }
}
