use crate::http::{HttpResponse, TransportError};

/// Result of one `execute` call as the UI layer sees it.
#[derive(Debug)]
pub enum Outcome {
    /// A response came back. `refreshed` is set when it is the retry after a renewal.
    Ok {
        response: HttpResponse,
        refreshed: bool,
    },
    /// Session expired and could not be renewed; navigate to this login target.
    RedirectRequired(String),
    /// No response at all. Never triggers a refresh.
    TransportError(TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    /// 401, refresh succeeded, original request retried. The retry's own status is
    /// whatever the backend returned.
    SessionExpiredRecovered,
    SessionExpiredTerminal,
    Transport,
    /// Non-2xx passed through without any refresh.
    Upstream,
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Ok {
                refreshed: true, ..
            } => OutcomeKind::SessionExpiredRecovered,
            Self::Ok { response, .. } if response.is_success() => OutcomeKind::Success,
            Self::Ok { .. } => OutcomeKind::Upstream,
            Self::RedirectRequired(_) => OutcomeKind::SessionExpiredTerminal,
            Self::TransportError(_) => OutcomeKind::Transport,
        }
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Ok { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn into_response(self) -> Option<HttpResponse> {
        match self {
            Self::Ok { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::RedirectRequired(target) => Some(target),
            _ => None,
        }
    }
}
