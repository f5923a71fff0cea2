//! Error types for backend calls.

use thiserror::Error;

/// Errors that can occur while talking to the chat backend.
///
/// The session controller treats every variant the same way (as a
/// connection failure surfaced to the user inside the transcript), but
/// the variants keep the underlying detail for that message.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    #[error("backend returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The response body was not the expected JSON shape.
    #[error("malformed response body: {0}")]
    MalformedBody(#[source] reqwest::Error),
}

/// A specialized Result type for backend calls.
pub type Result<T> = std::result::Result<T, Error>;
