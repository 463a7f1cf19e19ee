//! Typed operations for the blog backend.
//!
//! Every protected route goes through [`AuthenticatedRequestClient::execute`]; the
//! credential-issuing routes (login, register, logout) are sent once as-is.

mod admin;
mod auth;
mod blogs;
mod error;
mod feedback;

pub use error::ApiError;

use crate::config::Config;
use crate::http::{HttpResponse, PendingRequest, Transport};
use crate::refresh::{AuthenticatedRequestClient, Outcome};
use crate::types::MessageResponse;
use serde::de::DeserializeOwned;

pub struct BlogApi<T> {
    client: AuthenticatedRequestClient<T>,
    page_size: u32,
}

fn settle(outcome: Outcome) -> Result<HttpResponse, ApiError> {
    match outcome {
        Outcome::Ok { response, .. } if response.is_success() => Ok(response),
        Outcome::Ok { response, .. } => Err(ApiError::upstream(&response)),
        Outcome::RedirectRequired(target) => Err(ApiError::RedirectRequired(target)),
        Outcome::TransportError(e) => Err(ApiError::Transport(e)),
    }
}

/// Mutation routes answer `{"message": ...}`, sometimes with an empty body.
fn message_of(response: &HttpResponse) -> MessageResponse {
    response.json().unwrap_or_default()
}

impl<T: Transport> BlogApi<T> {
    pub fn new(client: AuthenticatedRequestClient<T>, page_size: u32) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
        }
    }

    pub fn from_config(transport: T, config: &Config) -> Self {
        Self::new(
            AuthenticatedRequestClient::from_config(transport, config),
            config.page_size,
        )
    }

    pub fn client(&self) -> &AuthenticatedRequestClient<T> {
        &self.client
    }

    fn paged(&self, path: &str, page: u32) -> String {
        format!("{path}?page={}&page_size={}", page.max(1), self.page_size)
    }

    async fn protected(&self, request: PendingRequest) -> Result<HttpResponse, ApiError> {
        settle(self.client.execute(&request).await)
    }

    async fn protected_json<R: DeserializeOwned>(
        &self,
        request: PendingRequest,
    ) -> Result<R, ApiError> {
        Ok(self.protected(request).await?.json()?)
    }

    async fn protected_message(&self, request: PendingRequest) -> Result<MessageResponse, ApiError> {
        Ok(message_of(&self.protected(request).await?))
    }

    async fn direct(&self, request: PendingRequest) -> Result<HttpResponse, ApiError> {
        let response = self.client.transport().send(&request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::upstream(&response))
        }
    }
}
