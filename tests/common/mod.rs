//! Shared helpers for tests that talk to a local backend over real HTTP.

use axum::Router;
use blogdesk_lib::config::{AuthMode, Config};
use blogdesk_lib::http::ReqwestTransport;
use blogdesk_lib::session::TokenStore;
use blogdesk_lib::AuthenticatedRequestClient;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn test_config(base_url: &str, auth_mode: AuthMode) -> Config {
    Config {
        base_url: base_url.to_string(),
        auth_mode,
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        remember_token: false,
        ..Config::default()
    }
}

pub fn client_for(config: &Config, tokens: TokenStore) -> AuthenticatedRequestClient<ReqwestTransport> {
    let transport = ReqwestTransport::new(config, tokens).unwrap();
    AuthenticatedRequestClient::from_config(transport, config)
}
