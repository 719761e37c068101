//! Error types for the record store.

use crate::id::IdError;

/// Errors that can occur when working with the record store.
///
/// The API layer is expected to map [`NotFound`](StoreError::NotFound),
/// [`InvalidArgument`](StoreError::InvalidArgument) and
/// [`Corrupt`](StoreError::Corrupt) to client errors, and
/// [`Io`](StoreError::Io) to a server error.
/// [`EntropyExhausted`](StoreError::EntropyExhausted) is the only fatal
/// variant; see [`StoreError::is_fatal`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unknown record, section or edge
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed id text, illegal section name or duplicate edge
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unexpected entry in the storage root or a malformed persisted document
    #[error("corrupt store: {0}")]
    Corrupt(String),

    /// Filesystem failure while reading, writing or removing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The secure random source failed; no more ids can be minted safely
    #[error("entropy source exhausted: {0}")]
    EntropyExhausted(String),
}

impl StoreError {
    /// Whether the process should stop instead of handling this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::EntropyExhausted(_))
    }

    /// Whether the error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound(_) | StoreError::InvalidArgument(_) | StoreError::Corrupt(_)
        )
    }
}

impl From<IdError> for StoreError {
    fn from(err: IdError) -> Self {
        match err {
            IdError::EntropyExhausted(reason) => StoreError::EntropyExhausted(reason),
            other => StoreError::InvalidArgument(other.to_string()),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
