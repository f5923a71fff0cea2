//! HTTP client for the nebula chat backend.
//!
//! [`ChatClient`] wraps the three calls the TUI makes:
//!
//! - `POST {base}{chat_path}` — send one message, receive a reply
//! - `POST {base}/clear-history` — drop the backend-side conversation
//! - `GET {base}/billing/status` — fetch the credit balance
//!
//! Failure taxonomy follows the session controller's needs: transport
//! failures, non-success statuses, and unparseable bodies are all errors
//! (the UI synthesizes a connection-failure turn from them), while a
//! well-formed body that merely lacks a reply field degrades to a
//! placeholder string.

mod client;
mod error;

pub use client::{ChatClient, ChatReply, REPLY_PLACEHOLDER};
pub use error::{Error, Result};
