//! Error types for the long-command notifier

use thiserror::Error;

/// Main error type for the long-command notifier
#[derive(Error, Debug)]
pub enum LongCommandError {
    /// The target multiplexer session does not exist
    #[error(
        "Not running inside tmux session '{0}'. This tool requires being in a tmux session \
         named '{0}' to wake up the agent upon completion."
    )]
    SessionNotFound(String),

    /// Terminal backend failure (capture, send-keys, missing binary)
    #[error("Terminal backend error: {0}")]
    Backend(String),

    /// Invalid tool arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for notifier operations
pub type Result<T> = std::result::Result<T, LongCommandError>;

impl LongCommandError {
    /// Create a session not found error
    pub fn session_not_found(session: impl Into<String>) -> Self {
        Self::SessionNotFound(session.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Whether this error is a caller-visible precondition failure
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::SessionNotFound(_) | Self::InvalidArguments(_))
    }
}

// Conversion to the MCP protocol error
impl From<LongCommandError> for rmcp::ErrorData {
    fn from(err: LongCommandError) -> Self {
        match err {
            LongCommandError::InvalidArguments(msg) => Self::invalid_params(msg, None),
            LongCommandError::SessionNotFound(_) => Self::invalid_request(err.to_string(), None),
            other => Self::internal_error(other.to_string(), None),
        }
    }
}
