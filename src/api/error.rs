use crate::http::{HttpResponse, TransportError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session expired; sign in again at {0}")]
    RedirectRequired(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{message} (status {status})")]
    Upstream { status: u16, message: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Non-2xx response, carrying the backend's `detail` when it sent one.
    pub fn upstream(response: &HttpResponse) -> Self {
        let status = response.status();
        Self::Upstream {
            status,
            message: response
                .detail()
                .unwrap_or_else(|| format!("request failed with status {status}")),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
