use super::{HttpResponse, PendingRequest, RequestBody, TransportError};
use crate::config::{AuthMode, Config};
use crate::session::{CookieJar, TokenStore};
use crate::types::TokenResponse;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends one request and buffers the reply. Implementations attach credentials on
/// every call, so a re-sent request always carries the current session.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &PendingRequest) -> Result<HttpResponse, TransportError>;

    /// Called with the refresh endpoint's 2xx response before the retry goes out.
    async fn session_renewed(&self, _refresh: &HttpResponse) {}
}

pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
    auth_mode: AuthMode,
    tokens: TokenStore,
    cookies: Arc<CookieJar>,
}

impl ReqwestTransport {
    pub fn new(config: &Config, tokens: TokenStore) -> Result<Self, TransportError> {
        Self::with_cookie_jar(config, tokens, Arc::new(CookieJar::in_memory()))
    }

    /// Cookie mode sends and collects cookies through `cookies`; bearer mode ignores it.
    pub fn with_cookie_jar(
        config: &Config,
        tokens: TokenStore,
        cookies: Arc<CookieJar>,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);
        if config.auth_mode == AuthMode::Cookie {
            builder = builder.cookie_provider(Arc::clone(&cookies));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_mode: config.auth_mode,
            tokens,
            cookies,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    pub fn resolve(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            return target.to_string();
        }
        if target.starts_with('/') {
            format!("{}{target}", self.base_url)
        } else {
            format!("{}/{target}", self.base_url)
        }
    }

    async fn bearer_token(&self) -> Option<String> {
        match self.tokens.get_current().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "stored credentials unreadable, sending without token");
                None
            }
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &PendingRequest) -> Result<HttpResponse, TransportError> {
        let url = self.resolve(request.target());
        let mut builder = self
            .http
            .request(request.method().clone(), &url)
            .headers(request.headers().clone());

        if self.auth_mode == AuthMode::Bearer {
            if let Some(token) = self.bearer_token().await {
                builder = builder.bearer_auth(token);
            }
        }

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(body) => builder.multipart(body.to_form()?),
        };

        let res = builder.send().await.map_err(|e| {
            let err = TransportError::from(e);
            warn!(method = %request.method(), path = request.target(), error = %err, "request failed");
            err
        })?;

        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let body = res.bytes().await?;
        debug!(method = %request.method(), path = request.target(), status, "response received");
        Ok(HttpResponse::new(status, headers, body))
    }

    async fn session_renewed(&self, refresh: &HttpResponse) {
        if self.auth_mode != AuthMode::Bearer {
            return;
        }
        let Ok(renewed) = refresh.json::<TokenResponse>() else {
            return;
        };
        if let Err(e) = self.tokens.replace(&renewed.access_token).await {
            warn!(error = %e, "failed to persist renewed token");
        }
    }
}
