// ================================================================
// File: botwatch-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session '{name}' failed to start: {reason}")]
    SessionStart { name: String, reason: String },

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// `chunk` is 1-based.
    #[error("Delivery failed at chunk {chunk} of {total}: {reason}")]
    Delivery {
        chunk: usize,
        total: usize,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
