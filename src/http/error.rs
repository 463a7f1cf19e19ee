use crate::redact::redact_secrets;
use thiserror::Error;

/// Failure below the HTTP status line: nothing came back from the backend.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    TimedOut,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let msg = redact_secrets(&err.to_string()).into_owned();
        if err.is_timeout() {
            Self::TimedOut
        } else if err.is_builder() {
            Self::InvalidRequest(msg)
        } else {
            Self::Network(msg)
        }
    }
}
