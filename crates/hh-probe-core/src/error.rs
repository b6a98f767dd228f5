//! Error types for hh-probe-core

use thiserror::Error;

/// Result type alias for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Probe error types
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HH_API_KEY is not set or empty - export an hh.ru API key before running")]
    MissingCredential,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unknown check: {0}")]
    UnknownCheck(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        let cause = if err.is_timeout() {
            "request timed out"
        } else if err.is_connect() {
            "connection failed"
        } else if err.is_body() || err.is_decode() {
            "failed to read response body"
        } else {
            "request failed"
        };
        ProbeError::Transport(format!("{}: {}", cause, err))
    }
}

impl ProbeError {
    /// Whether this error was raised before any request could be sent
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ProbeError::MissingCredential
                | ProbeError::InvalidConfig(_)
                | ProbeError::UnknownCheck(_)
        )
    }
}
