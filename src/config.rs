//! Client configuration
//!
//! Loaded from `BLOGDESK_*` environment variables; anything unset or unparsable keeps
//! its default.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown auth mode {0:?} (expected \"cookie\" or \"bearer\")")]
    UnknownAuthMode(String),
}

/// How the session credential travels. One mode per deployment, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// HTTP-only cookies kept in the client's cookie jar.
    Cookie,
    /// `Authorization: Bearer` from the token store.
    Bearer,
}

impl FromStr for AuthMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cookie" | "cookies" => Ok(Self::Cookie),
            "bearer" | "token" => Ok(Self::Bearer),
            other => Err(ConfigError::UnknownAuthMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
    pub auth_mode: AuthMode,
    /// Session refresh endpoint
    pub refresh_path: String,
    /// Where the user is sent when the session cannot be renewed
    pub login_path: String,
    /// Whole-request timeout applied by the transport
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub page_size: u32,
    /// Persist bearer tokens to the credentials file
    pub remember_token: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            auth_mode: AuthMode::Bearer,
            refresh_path: "/api/refresh/".to_string(),
            login_path: "/user/login/".to_string(),
            timeout: Duration::from_secs(40),
            connect_timeout: Duration::from_secs(10),
            page_size: 10,
            remember_token: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get("BLOGDESK_BASE_URL") {
            config.base_url = url;
        }
        if let Some(mode) = get("BLOGDESK_AUTH_MODE") {
            config.auth_mode = mode.parse()?;
        }
        if let Some(path) = get("BLOGDESK_REFRESH_PATH") {
            config.refresh_path = path;
        }
        if let Some(path) = get("BLOGDESK_LOGIN_PATH") {
            config.login_path = path;
        }
        if let Some(secs) = get("BLOGDESK_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) =
            get("BLOGDESK_CONNECT_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok())
        {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(size) = get("BLOGDESK_PAGE_SIZE").and_then(|v| v.parse::<u32>().ok()) {
            if size > 0 {
                config.page_size = size;
            }
        }
        if let Some(flag) = get("BLOGDESK_REMEMBER_TOKEN").and_then(|v| parse_flag(&v)) {
            config.remember_token = flag;
        }

        Ok(config)
    }

    /// Absolute login URL for messages shown to the user.
    pub fn login_url(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), target)
        }
    }
}
