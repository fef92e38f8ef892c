use std::fmt;

use sample_index::IndexError;

/// Startup and configuration errors for the server crate.
#[derive(Debug, Clone)]
pub enum CoreError {
    /// Invalid input provided by the caller or the configuration file.
    InvalidInput(String),
    /// Internal error.
    Internal(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            CoreError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<IndexError> for CoreError {
    fn from(error: IndexError) -> Self {
        match error {
            IndexError::InvalidInput(msg) => CoreError::InvalidInput(msg),
            other => CoreError::Internal(other.to_string()),
        }
    }
}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
