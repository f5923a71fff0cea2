//! Chat turn types.
//!
//! A [`ChatTurn`] is one message exchanged in a session, tagged by the
//! speaker role. Turns are immutable once created: they are appended to
//! the message store and rendered, never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The speaker of a chat turn.
///
/// # Examples
///
/// ```
/// use nebula_protocol::ChatRole;
///
/// let role = ChatRole::Assistant;
/// assert!(!role.is_user());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// A message typed by the user.
    #[default]
    User,
    /// A reply produced by the agent (or synthesized locally on failure).
    Assistant,
}

impl ChatRole {
    /// Returns `true` if this role is [`ChatRole::User`].
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_protocol::ChatRole;
    ///
    /// assert!(ChatRole::User.is_user());
    /// assert!(!ChatRole::Assistant.is_user());
    /// ```
    #[must_use]
    pub const fn is_user(self) -> bool {
        matches!(self, Self::User)
    }
}

/// One message exchanged in a chat session.
///
/// Turns are created when the user submits text and when a reply (or a
/// synthesized failure notice) arrives. The timestamp records creation
/// time and is preserved across persistence round trips.
///
/// # Examples
///
/// ```
/// use nebula_protocol::{ChatRole, ChatTurn};
///
/// let turn = ChatTurn::user("Generate a login scenario");
/// assert_eq!(turn.role, ChatRole::User);
/// assert_eq!(turn.text, "Generate a login scenario");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who spoke this turn.
    pub role: ChatRole,
    /// The raw message text (markdown for assistant turns).
    pub text: String,
    /// When this turn was created.
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// Creates a user turn stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_protocol::ChatTurn;
    ///
    /// let turn = ChatTurn::user("hello");
    /// assert!(turn.role.is_user());
    /// ```
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates an assistant turn stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_protocol::{ChatRole, ChatTurn};
    ///
    /// let turn = ChatTurn::assistant("Scenario: ...");
    /// assert_eq!(turn.role, ChatRole::Assistant);
    /// ```
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_default_is_user() {
        assert_eq!(ChatRole::default(), ChatRole::User);
    }

    #[test]
    fn role_json_format() {
        let json = serde_json::to_string(&ChatRole::Assistant).expect("serialize");
        assert_eq!(json, r#""assistant""#);

        let json = serde_json::to_string(&ChatRole::User).expect("serialize");
        assert_eq!(json, r#""user""#);
    }

    #[test]
    fn turn_constructors_set_role() {
        assert_eq!(ChatTurn::user("a").role, ChatRole::User);
        assert_eq!(ChatTurn::assistant("b").role, ChatRole::Assistant);
    }

    #[test]
    fn turn_serialization_roundtrip() {
        let turn = ChatTurn::assistant("**bold** reply");
        let json = serde_json::to_string(&turn).expect("serialize");
        let parsed: ChatTurn = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(turn, parsed);
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Turn serialization preserves role and text for arbitrary content.
        #[test]
        fn turn_roundtrip(text in "\\PC*", is_user in any::<bool>()) {
            let turn = if is_user {
                ChatTurn::user(text.clone())
            } else {
                ChatTurn::assistant(text.clone())
            };

            let json = serde_json::to_string(&turn).expect("serialize");
            let parsed: ChatTurn = serde_json::from_str(&json).expect("deserialize");

            prop_assert_eq!(turn.role, parsed.role);
            prop_assert_eq!(turn.text, parsed.text);
            prop_assert_eq!(turn.timestamp, parsed.timestamp);
        }
    }
}
