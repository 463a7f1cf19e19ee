use super::token_store::remove_if_present;
use super::CredentialsError;
use reqwest::header::HeaderValue;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Session cookies for cookie-mode deployments. The jar is handed to reqwest as its
/// cookie provider and, when backed by a file, survives across process runs so an
/// HTTP-only session set at login is still sent by the next command.
#[derive(Debug, Default)]
pub struct CookieJar {
    file: Option<PathBuf>,
    store: RwLock<cookie_store::CookieStore>,
}

impl CookieJar {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the jar at `path`. A missing file is an empty jar.
    pub async fn load(path: PathBuf) -> Result<Self, CredentialsError> {
        let store = match tokio::fs::read(&path).await {
            Ok(data) => cookie_store::serde::json::load_all(data.as_slice())
                .map_err(|_| CredentialsError::InvalidJson)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                cookie_store::CookieStore::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            file: Some(path),
            store: RwLock::new(store),
        })
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Writes the jar back to its file. Session cookies without an expiry are kept; the
    /// backend's HTTP-only session cookie is usually one of them.
    pub async fn save(&self) -> Result<(), CredentialsError> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        let mut data = Vec::new();
        cookie_store::serde::json::save_incl_expired_and_nonpersistent(&self.read(), &mut data)
            .map_err(|_| CredentialsError::InvalidJson)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, data).await?;
        debug!(path = %path.display(), "cookie jar saved");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), CredentialsError> {
        self.write().clear();
        match &self.file {
            Some(path) => remove_if_present(path).await,
            None => Ok(()),
        }
    }

    pub fn cookie_value(&self, url: &Url, name: &str) -> Option<String> {
        self.read()
            .get_request_values(url)
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.to_string())
    }

    fn read(&self) -> RwLockReadGuard<'_, cookie_store::CookieStore> {
        self.store.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, cookie_store::CookieStore> {
        self.store.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let mut store = self.write();
        for header in cookie_headers {
            let Ok(raw) = header.to_str() else {
                continue;
            };
            if let Err(e) = store.parse(raw, url) {
                debug!(error = %e, "ignoring unparsable set-cookie");
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let joined = self
            .read()
            .get_request_values(url)
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        if joined.is_empty() {
            return None;
        }
        HeaderValue::from_str(&joined).ok()
    }
}
