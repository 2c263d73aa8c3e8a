//! Common error types for zdash

use thiserror::Error;

/// Common result type for zdash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across zdash crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A date or timestamp that could not be parsed
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn invalid_date(value: &str, reason: impl ToString) -> Self {
        Error::InvalidDate {
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
