//! CDP error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdpError {
    /// The DevTools endpoint did not answer.
    #[error("DevTools endpoint {endpoint} unreachable: {reason}")]
    Unreachable { endpoint: String, reason: String },

    /// WebSocket or HTTP transport failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Chrome rejected a command.
    #[error("{method} failed: {message} (code {code})")]
    Command {
        method: String,
        code: i64,
        message: String,
    },

    #[error("Malformed CDP message: {0}")]
    Decode(#[from] serde_json::Error),

    /// A reply was missing a field the command guarantees.
    #[error("{method} reply without {field}")]
    MissingField {
        method: &'static str,
        field: &'static str,
    },

    #[error("Navigation to {url} failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    /// Page script threw.
    #[error("Script error: {0}")]
    Script(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// A JavaScript dialog opened while a command was in flight.
    #[error("Dialog opened: {0}")]
    DialogOpened(String),

    /// The browser connection went away.
    #[error("Connection closed")]
    Closed,
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::Transport(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Transport(e.to_string())
    }
}
