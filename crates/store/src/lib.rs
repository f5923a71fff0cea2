//! Message store for the nebula chat client.
//!
//! The store owns the ordered [`ChatTurn`](nebula_protocol::ChatTurn)
//! sequence for one session. It caps retained history (oldest turns are
//! evicted first) and persists the full sequence to a JSON file after
//! every mutation.
//!
//! Persistence is best-effort: a missing or corrupt history file resets
//! to an empty sequence, and write failures are logged and ignored.
//! In-memory state stays authoritative for the rest of the session, so
//! storage trouble is never fatal to the chat.

mod error;
mod history;

pub use error::{Result, StoreError};
pub use history::{DEFAULT_HISTORY_CAP, MessageStore, default_history_path};
