//! Terminal UI for the nebula chat client.
//!
//! This crate provides a Ratatui-based interface around the chat session:
//! a transcript with markdown-styled replies, a message input line, local
//! history search, a static scenario library, and a Scrumban board
//! overlay for completed turns.
//!
//! # Overview
//!
//! - [`app`]: main application struct and run loop
//! - [`state`]: the explicit UI state object (view, inputs, board)
//! - [`session`]: the chat session controller (single-flight guard,
//!   failure synthesis)
//! - [`event`]: event polling and mode-aware key mappings
//! - [`terminal`]: terminal setup, teardown, and panic handling
//! - [`export`]: HTML transcript export
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use nebula_client::ChatClient;
//! use nebula_store::MessageStore;
//! use nebula_tui::{App, terminal};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     terminal::install_panic_hook();
//!     let mut terminal = terminal::setup_terminal()?;
//!
//!     let store = MessageStore::in_memory(10);
//!     let client = ChatClient::new("http://localhost:8000", "/chat", Duration::from_secs(30))?;
//!     let mut app = App::new(store, client);
//!     let result = app.run(&mut terminal).await;
//!
//!     terminal::restore_terminal(&mut terminal)?;
//!     result
//! }
//! ```

pub mod app;
pub mod event;
pub mod export;
pub mod layout;
pub mod session;
pub mod state;
pub mod terminal;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export primary types at crate root for convenience
pub use app::{App, AppEvent, Command};
pub use session::{ChatSession, ReplyOutcome, SubmitDisposition};
pub use state::AppState;
