//! Error types for riskpanel operations.

use std::io;
use thiserror::Error;

/// The error type for riskpanel operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced an HTTP response (connection, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        /// HTTP status code
        status: u16,
        /// The `error` field of the response body, if the backend sent one
        message: Option<String>,
    },

    /// A response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No usable bearer credential.
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The viewer may not perform this action on the record.
    #[error("Not permitted: {0}")]
    Forbidden(String),

    /// Record not present in the loaded list.
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// An action needed an open status popover.
    #[error("No status popover is open")]
    NoPopover,
}

impl Error {
    /// Message provided by the backend, when there is one.
    ///
    /// Only API errors carry a server message; transport and parse failures
    /// return `None` so callers fall back to their own wording.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Parse(value.to_string())
        } else {
            Self::Transport(value.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

/// A specialized Result type for riskpanel operations.
pub type Result<T> = std::result::Result<T, Error>;
