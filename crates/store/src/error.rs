//! Error types for the message store.

use thiserror::Error;

/// Errors that can occur while locating store files.
///
/// Read and write failures during normal operation are deliberately *not*
/// represented here: persistence is best-effort, logged and swallowed, so
/// the store API stays infallible once constructed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The platform data directory could not be determined.
    #[error("could not determine a data directory for history persistence")]
    NoDataDirectory,
}

/// A specialized Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
