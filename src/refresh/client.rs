use super::outcome::Outcome;
use super::policy::{classify_status, refresh_succeeded, StatusClass};
use crate::config::Config;
use crate::http::{PendingRequest, Transport};
use tracing::{debug, info, warn};

/// Runs one logical request against a protected route, hiding a single session
/// expiry from the caller: on 401 it refreshes once and re-sends once.
///
/// Calls share nothing. Two calls that both hit 401 each run their own refresh.
pub struct AuthenticatedRequestClient<T> {
    transport: T,
    refresh: PendingRequest,
    login_target: String,
}

impl<T: Transport> AuthenticatedRequestClient<T> {
    pub fn new(
        transport: T,
        refresh_path: impl Into<String>,
        login_target: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            refresh: PendingRequest::post(refresh_path),
            login_target: login_target.into(),
        }
    }

    pub fn from_config(transport: T, config: &Config) -> Self {
        Self::new(transport, config.refresh_path.clone(), config.login_path.clone())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn login_target(&self) -> &str {
        &self.login_target
    }

    pub async fn execute(&self, request: &PendingRequest) -> Outcome {
        let first = match self.transport.send(request).await {
            Ok(res) => res,
            Err(e) => return Outcome::TransportError(e),
        };

        if classify_status(first.status()) == StatusClass::PassThrough {
            return Outcome::Ok {
                response: first,
                refreshed: false,
            };
        }

        debug!(path = request.target(), "access token expired, trying to refresh");
        if !self.refresh_session().await {
            warn!(login = %self.login_target, "session refresh failed, login required");
            return Outcome::RedirectRequired(self.login_target.clone());
        }

        info!(path = request.target(), "session refreshed, retrying request");
        match self.transport.send(request).await {
            Ok(response) => Outcome::Ok {
                response,
                refreshed: true,
            },
            Err(e) => Outcome::TransportError(e),
        }
    }

    async fn refresh_session(&self) -> bool {
        match self.transport.send(&self.refresh).await {
            Ok(res) if refresh_succeeded(res.status()) => {
                self.transport.session_renewed(&res).await;
                true
            }
            Ok(res) => {
                debug!(status = res.status(), "refresh rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "refresh request failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MultipartBody, RequestBody};
    use crate::refresh::OutcomeKind;
    use crate::test_utils::ScriptedTransport;
    use reqwest::header::{HeaderValue, CONTENT_TYPE};
    use serde_json::{json, Value};

    const REFRESH: &str = "/api/refresh/";

    fn client(transport: ScriptedTransport) -> AuthenticatedRequestClient<ScriptedTransport> {
        AuthenticatedRequestClient::new(transport, REFRESH, "/login")
    }

    #[tokio::test]
    async fn non_401_statuses_pass_through_without_refresh() {
        for status in [200, 201, 400, 403, 404, 500] {
            let transport =
                ScriptedTransport::new().reply("/api/landing/", status, json!({"status": status}));
            let client = client(transport);

            let outcome = client.execute(&PendingRequest::get("/api/landing/")).await;
            let response = outcome.response().expect("response");
            assert_eq!(response.status(), status);
            assert_eq!(response.json::<Value>().unwrap()["status"], status);
            assert_eq!(client.transport().calls_to(REFRESH), 0);
            assert_eq!(client.transport().calls_to("/api/landing/"), 1);
        }
    }

    #[tokio::test]
    async fn expired_session_is_refreshed_and_retried_once() {
        let transport = ScriptedTransport::new()
            .reply_status("/api/blogs/5/like", 401)
            .reply_status(REFRESH, 200)
            .reply("/api/blogs/5/like", 200, json!({"message": "liked"}));
        let client = client(transport);

        let outcome = client
            .execute(&PendingRequest::post("/api/blogs/5/like"))
            .await;
        assert_eq!(outcome.kind(), OutcomeKind::SessionExpiredRecovered);
        let body: Value = outcome.response().unwrap().json().unwrap();
        assert_eq!(body, json!({"message": "liked"}));

        let transport = client.transport();
        assert_eq!(transport.calls_to("/api/blogs/5/like"), 2);
        assert_eq!(transport.calls_to(REFRESH), 1);
        assert_eq!(transport.renewals(), 1);

        let calls = transport.calls();
        assert_eq!(calls[1].method, reqwest::Method::POST);
        assert_eq!(calls[1].target, REFRESH);
    }

    #[tokio::test]
    async fn retry_response_is_returned_even_when_still_401() {
        let transport = ScriptedTransport::new()
            .reply_status("/api/blogs/", 401)
            .reply_status(REFRESH, 204)
            .reply("/api/blogs/", 401, json!({"detail": "Token expired"}));
        let client = client(transport);

        let outcome = client.execute(&PendingRequest::get("/api/blogs/")).await;
        let response = outcome.response().unwrap();
        assert_eq!(response.status(), 401);
        assert_eq!(response.detail().as_deref(), Some("Token expired"));
        assert_eq!(client.transport().calls_to(REFRESH), 1);
        assert_eq!(client.transport().calls_to("/api/blogs/"), 2);
    }

    #[tokio::test]
    async fn rejected_refresh_requires_login_without_retry() {
        let transport = ScriptedTransport::new()
            .reply_status("/api/blogs/5/like", 401)
            .reply(REFRESH, 403, json!({"detail": "Refresh token revoked"}));
        let client = client(transport);

        let outcome = client
            .execute(&PendingRequest::post("/api/blogs/5/like"))
            .await;
        assert_eq!(outcome.redirect_target(), Some("/login"));
        assert_eq!(outcome.kind(), OutcomeKind::SessionExpiredTerminal);
        assert_eq!(client.transport().calls_to("/api/blogs/5/like"), 1);
        assert_eq!(client.transport().renewals(), 0);
    }

    #[tokio::test]
    async fn refresh_transport_failure_requires_login() {
        let transport = ScriptedTransport::new()
            .reply_status("/api/admin/list-users/", 401)
            .fail(REFRESH);
        let client = client(transport);

        let outcome = client
            .execute(&PendingRequest::get("/api/admin/list-users/"))
            .await;
        assert!(matches!(outcome, Outcome::RedirectRequired(ref t) if t == "/login"));
        assert_eq!(client.transport().calls_to("/api/admin/list-users/"), 1);
    }

    #[tokio::test]
    async fn transport_failure_never_triggers_refresh() {
        let transport = ScriptedTransport::new().fail("/api/landing/");
        let client = client(transport);

        let outcome = client.execute(&PendingRequest::get("/api/landing/")).await;
        assert_eq!(outcome.kind(), OutcomeKind::Transport);
        assert_eq!(client.transport().calls_to(REFRESH), 0);
    }

    #[tokio::test]
    async fn transport_failure_on_retry_is_reported() {
        let transport = ScriptedTransport::new()
            .reply_status("/api/landing/", 401)
            .reply_status(REFRESH, 200)
            .fail("/api/landing/");
        let client = client(transport);

        let outcome = client.execute(&PendingRequest::get("/api/landing/")).await;
        assert!(matches!(outcome, Outcome::TransportError(_)));
        assert_eq!(client.transport().calls_to(REFRESH), 1);
    }

    #[tokio::test]
    async fn retry_resends_multipart_body_without_content_type() {
        let transport = ScriptedTransport::new()
            .reply_status("/api/blogs/", 401)
            .reply_status(REFRESH, 200)
            .reply("/api/blogs/", 201, json!({"message": "Blog created"}));
        let client = client(transport);

        let request = PendingRequest::post("/api/blogs/")
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .multipart(
                MultipartBody::new()
                    .text("title", "First post")
                    .text("content", "Hello from the client"),
            );
        let outcome = client.execute(&request).await;
        assert_eq!(outcome.response().unwrap().status(), 201);

        let sends: Vec<_> = client
            .transport()
            .calls()
            .into_iter()
            .filter(|c| c.target == "/api/blogs/")
            .collect();
        assert_eq!(sends.len(), 2);
        for call in sends {
            assert_eq!(call.content_type, None);
            match call.body {
                RequestBody::Multipart(body) => {
                    assert_eq!(body.text_fields()[0], ("title".to_string(), "First post".to_string()));
                }
                other => panic!("unexpected body {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn concurrent_expiries_refresh_independently() {
        let transport = ScriptedTransport::new()
            .reply_status("/api/blogs/1/like", 401)
            .reply_status("/api/blogs/2/dislike", 401)
            .reply_status(REFRESH, 200)
            .reply_status(REFRESH, 200)
            .reply("/api/blogs/1/like", 200, json!({"message": "liked"}))
            .reply("/api/blogs/2/dislike", 200, json!({"message": "disliked"}));
        let client = client(transport);

        let like = PendingRequest::post("/api/blogs/1/like");
        let dislike = PendingRequest::post("/api/blogs/2/dislike");
        let (a, b) = tokio::join!(client.execute(&like), client.execute(&dislike));

        assert_eq!(a.kind(), OutcomeKind::SessionExpiredRecovered);
        assert_eq!(b.kind(), OutcomeKind::SessionExpiredRecovered);
        assert_eq!(client.transport().calls_to(REFRESH), 2);
        assert_eq!(client.transport().renewals(), 2);
    }

    #[tokio::test]
    async fn from_config_uses_configured_paths() {
        let config = Config {
            refresh_path: "/auth/renew".to_string(),
            login_path: "/admin/login/".to_string(),
            ..Config::default()
        };
        let transport = ScriptedTransport::new()
            .reply_status("/api/admin/landing/", 401)
            .reply_status("/auth/renew", 401);
        let client = AuthenticatedRequestClient::from_config(transport, &config);

        let outcome = client
            .execute(&PendingRequest::get("/api/admin/landing/"))
            .await;
        assert_eq!(outcome.redirect_target(), Some("/admin/login/"));
        assert_eq!(client.transport().calls_to("/auth/renew"), 1);
        assert_eq!(client.login_target(), "/admin/login/");
    }
}
