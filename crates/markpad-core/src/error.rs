//! Error types for markpad.

use thiserror::Error;

use crate::filename::FilenameError;

/// Result type alias using markpad's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for markpad operations.
///
/// Every failure is per-operation and recoverable; nothing here is fatal to
/// the process. Variants are specific enough for the caller to render a
/// precise message.
#[derive(Error, Debug)]
pub enum Error {
    /// Filename rejected by the client-side contract.
    #[error("Invalid filename: {0}")]
    Filename(#[from] FilenameError),

    /// Document not found
    #[error("File not found: {0}")]
    NotFound(String),

    /// A document with that name already exists
    #[error("File already exists: {0}")]
    AlreadyExists(String),

    /// Account storage space exhausted
    #[error("User storage space is full")]
    SpaceFull,

    /// Per-account file count limit reached
    #[error("File count limit reached")]
    FileCountLimit,

    /// Session expired and could not be refreshed
    #[error("Session expired")]
    SessionExpired,

    /// Authorization failure that is not an expiry signal (never retried)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A save was requested with no current document and no name supplied
    #[error("A filename is required")]
    NameRequired,

    /// Structured backend error that maps to no specific variant
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Local key-value storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
