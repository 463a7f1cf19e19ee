use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

pub const CREDENTIALS_FILE: &str = "credentials.json";
pub const COOKIES_FILE: &str = "cookies.json";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("HOME is not set")]
    HomeMissing,
    #[error("credentials file i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid credentials json")]
    InvalidJson,
}

#[derive(Debug, Serialize, Deserialize)]
struct CredentialsFile {
    access_token: String,
}

/// `$BLOGDESK_HOME`, else `$HOME/.blogdesk`.
pub fn session_dir() -> Result<PathBuf, CredentialsError> {
    if let Ok(home) = std::env::var("BLOGDESK_HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    let home = std::env::var("HOME").map_err(|_| CredentialsError::HomeMissing)?;
    Ok(PathBuf::from(home).join(".blogdesk"))
}

fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Bearer token holder. The in-memory value wins; the file is only consulted when
/// memory is empty, and the value read from it is cached.
#[derive(Clone)]
pub struct TokenStore {
    file: Option<PathBuf>,
    in_memory: Arc<Mutex<Option<String>>>,
}

impl TokenStore {
    pub fn in_memory() -> Self {
        Self {
            file: None,
            in_memory: Arc::new(Mutex::new(None)),
        }
    }

    pub fn persistent(file: PathBuf) -> Self {
        Self {
            file: Some(file),
            in_memory: Arc::new(Mutex::new(None)),
        }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub async fn set_in_memory(&self, value: Option<String>) {
        let mut guard = self.in_memory.lock().await;
        *guard = value.as_deref().and_then(normalize);
    }

    pub async fn get_current(&self) -> Result<Option<String>, CredentialsError> {
        if let Some(value) = self.in_memory.lock().await.clone() {
            return Ok(Some(value));
        }

        let Some(path) = &self.file else {
            return Ok(None);
        };

        let data = match tokio::fs::read_to_string(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: CredentialsFile =
            serde_json::from_str(&data).map_err(|_| CredentialsError::InvalidJson)?;

        let token = normalize(&stored.access_token);
        if token.is_some() {
            self.set_in_memory(token.clone()).await;
        }
        Ok(token)
    }

    /// Sets the token and writes it through to the credentials file, if any. A blank
    /// token clears both, same as [`TokenStore::forget_all`].
    pub async fn replace(&self, token: &str) -> Result<(), CredentialsError> {
        let Some(token) = normalize(token) else {
            return self.forget_all().await;
        };
        self.set_in_memory(Some(token.clone())).await;
        let Some(path) = &self.file else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_vec_pretty(&CredentialsFile {
            access_token: token,
        })
        .map_err(|_| CredentialsError::InvalidJson)?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }

    pub async fn forget_all(&self) -> Result<(), CredentialsError> {
        self.set_in_memory(None).await;
        match &self.file {
            Some(path) => remove_if_present(path).await,
            None => Ok(()),
        }
    }
}

pub(super) async fn remove_if_present(path: &Path) -> Result<(), CredentialsError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
