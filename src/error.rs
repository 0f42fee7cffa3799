//! Error types for framewire.

use thiserror::Error;

/// Main error type for all writer operations.
#[derive(Debug, Error)]
pub enum WriterError {
    /// I/O error while writing to or flushing the transport.
    ///
    /// Fatal to the writer loop; frames in the failed batch are not re-queued.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The writer has been shut down and accepts no further calls.
    #[error("Writer has been shut down")]
    ShutDown,

    /// `start()` was called on a writer that is already running.
    #[error("Writer already started")]
    AlreadyStarted,

    /// JSON configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration parsed but holds an unusable value.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl WriterError {
    /// Whether this error is a caller misuse rather than a runtime failure.
    pub fn is_misuse(&self) -> bool {
        matches!(self, WriterError::ShutDown | WriterError::AlreadyStarted)
    }
}

/// Result type alias using WriterError.
pub type Result<T> = std::result::Result<T, WriterError>;
