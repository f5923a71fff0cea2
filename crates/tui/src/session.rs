//! The chat session controller.
//!
//! [`ChatSession`] owns the message store and brackets every round trip:
//! a submission appends the user turn and locks the input surface, and
//! the matching [`ChatSession::resolve`] call appends exactly one reply
//! turn (real or synthesized) and releases the lock. Both resolve paths
//! go through the same code, so the lock cannot leak on a new error
//! path.
//!
//! The controller is synchronous and free of I/O: the app layer performs
//! the dispatched request and feeds the outcome back in, which keeps the
//! guard logic and failure synthesis testable without a network.

use nebula_client::ChatReply;
use nebula_protocol::{ChatTurn, truncate_title};
use nebula_store::MessageStore;

/// Welcome turn shown when a session starts with an empty history.
pub const WELCOME_MESSAGE: &str = "👋 **Welcome to Nebula**\n\n\
    I am an assistant for test automation: I generate Gherkin scenarios, \
    suggest test cases, and help you reason about coverage.\n\n\
    Try asking:\n\
    - `Generate a login scenario`\n\
    - `What test cases should I create for checkout?`";

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDisposition {
    /// The text was accepted and a user turn appended. The caller must
    /// issue exactly one backend request carrying this text.
    Dispatched(String),
    /// Empty input, or a request already in flight. Nothing changed.
    Ignored,
}

/// Outcome of the dispatched backend request.
#[derive(Debug, Clone)]
pub enum ReplyOutcome {
    /// The backend answered.
    Reply(ChatReply),
    /// Transport failure, non-success status, or unparseable body.
    Failed {
        /// Human-readable error detail, shown in the failure turn.
        detail: String,
    },
}

/// What the app should apply after a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Title for a `Done` board card; present only after a successful
    /// reply.
    pub card_title: Option<String>,
    /// Updated credit balance, when the backend reported one.
    pub credits: Option<u64>,
}

/// The chat session: message store plus the single-flight guard.
#[derive(Debug)]
pub struct ChatSession {
    store: MessageStore,
    in_flight: bool,
    pending: Option<String>,
}

impl ChatSession {
    /// Creates a session around the given store, appending the welcome
    /// turn when the history is empty.
    #[must_use]
    pub fn new(store: MessageStore) -> Self {
        let mut session = Self {
            store,
            in_flight: false,
            pending: None,
        };
        session.ensure_welcome();
        session
    }

    /// Returns the underlying message store.
    #[must_use]
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Returns `true` while a request is awaiting its reply.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Returns `true` when the input surface accepts text.
    #[must_use]
    pub fn input_enabled(&self) -> bool {
        !self.in_flight
    }

    /// Submits raw input.
    ///
    /// Whitespace-only input is silently ignored, as is any submission
    /// while a prior one is still in flight. An accepted submission
    /// appends the user turn synchronously and locks the input surface
    /// until [`resolve`](Self::resolve) runs.
    pub fn submit(&mut self, raw: &str) -> SubmitDisposition {
        let text = raw.trim();
        if text.is_empty() || self.in_flight {
            return SubmitDisposition::Ignored;
        }

        let text = text.to_string();
        self.store.append(ChatTurn::user(text.clone()));
        self.in_flight = true;
        self.pending = Some(text.clone());
        SubmitDisposition::Dispatched(text)
    }

    /// Applies the outcome of the in-flight request.
    ///
    /// Appends the assistant turn (the reply, or a synthesized
    /// connection-failure notice carrying the error detail) and releases
    /// the input lock. This is the single place where the lock clears,
    /// on success and failure alike.
    pub fn resolve(&mut self, outcome: ReplyOutcome) -> Resolution {
        self.in_flight = false;
        let pending = self.pending.take();

        match outcome {
            ReplyOutcome::Reply(reply) => {
                self.store.append(ChatTurn::assistant(reply.text));
                Resolution {
                    card_title: pending.map(|text| truncate_title(&text)),
                    credits: reply.credits_remaining,
                }
            }
            ReplyOutcome::Failed { detail } => {
                self.store.append(ChatTurn::assistant(failure_text(&detail)));
                Resolution {
                    card_title: None,
                    credits: None,
                }
            }
        }
    }

    /// Clears the history and restores the welcome turn.
    pub fn clear(&mut self) {
        self.store.clear();
        self.ensure_welcome();
    }

    /// Returns turns whose text contains the query, case-insensitively.
    ///
    /// An empty query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ChatTurn> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.store
            .all()
            .iter()
            .filter(|turn| turn.text.to_lowercase().contains(&query))
            .collect()
    }

    fn ensure_welcome(&mut self) {
        if self.store.is_empty() {
            self.store.append(ChatTurn::assistant(WELCOME_MESSAGE));
        }
    }
}

/// Builds the synthesized assistant turn for a failed round trip.
fn failure_text(detail: &str) -> String {
    format!(
        "⚠️ **Connection error**\n\n\
         Could not reach the Nebula backend. Check that it is running and \
         reachable.\n\n\
         **Details:** {detail}"
    )
}
