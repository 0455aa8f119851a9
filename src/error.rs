//! Error types for Sibyl.

use thiserror::Error;

/// Errors surfaced by suggester builds, lookups, and persistence.
///
/// Each variant corresponds to a distinct failure kind so callers can decide
/// how to react (e.g. a `Persistence` failure for one suggester must not stop
/// others from loading). The core never retries on its own.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// A build source produced malformed or incomplete data.
    #[error("source error: {0}")]
    Source(String),

    /// A build could not complete (empty source, unsupported options).
    #[error("build error: {0}")]
    Build(String),

    /// An analyzer spec could not be resolved into a runnable pipeline.
    #[error("analysis error: {0}")]
    Analysis(String),

    /// A saved blob is corrupt, truncated, or version-incompatible.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A storage backend operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A named suggester (or its saved blob) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A caller-supplied argument is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SuggestError {
    /// Create a source error.
    pub fn source(msg: impl Into<String>) -> Self {
        SuggestError::Source(msg.into())
    }

    /// Create a build error.
    pub fn build(msg: impl Into<String>) -> Self {
        SuggestError::Build(msg.into())
    }

    /// Create an analysis error.
    pub fn analysis(msg: impl Into<String>) -> Self {
        SuggestError::Analysis(msg.into())
    }

    /// Create a persistence error.
    pub fn persistence(msg: impl Into<String>) -> Self {
        SuggestError::Persistence(msg.into())
    }

    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        SuggestError::Storage(msg.into())
    }

    /// Create a not-found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        SuggestError::NotFound(msg.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        SuggestError::InvalidArgument(msg.into())
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, SuggestError>;
