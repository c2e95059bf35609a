use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Session, SessionStore};
use crate::error::ClientError;
use crate::models::UserProfile;

/// On-disk layout: one entry per key, each optional so a half-written or
/// partially cleared file still loads.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserProfile>,
}

impl StoredEntries {
    fn into_session(self) -> Option<Session> {
        match (self.access_token, self.refresh_token, self.user) {
            (Some(access_token), refresh_token, Some(user)) => Some(Session {
                access_token,
                refresh_token: refresh_token.unwrap_or_default(),
                user,
            }),
            _ => None,
        }
    }
}

impl From<&Session> for StoredEntries {
    fn from(session: &Session) -> Self {
        Self {
            access_token: Some(session.access_token.clone()),
            refresh_token: Some(session.refresh_token.clone()),
            user: Some(session.user.clone()),
        }
    }
}

/// Keeps the session in a JSON file, the CLI's stand-in for browser
/// local storage.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<StoredEntries, ClientError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(StoredEntries::default()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredEntries::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_entries(&self, entries: &StoredEntries) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let text = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, text).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, ClientError> {
        Ok(self.read_entries().await?.into_session())
    }

    async fn save(&self, session: &Session) -> Result<(), ClientError> {
        self.write_entries(&StoredEntries::from(session)).await
    }

    async fn set_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), ClientError> {
        let mut entries = self.read_entries().await?;
        entries.access_token = Some(access_token.to_string());
        if let Some(refresh_token) = refresh_token {
            entries.refresh_token = Some(refresh_token.to_string());
        }
        self.write_entries(&entries).await
    }

    async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        // A poisoned lock still holds a consistent Option.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, ClientError> {
        Ok(self.lock().clone())
    }

    async fn save(&self, session: &Session) -> Result<(), ClientError> {
        *self.lock() = Some(session.clone());
        Ok(())
    }

    async fn set_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), ClientError> {
        if let Some(session) = self.lock().as_mut() {
            session.access_token = access_token.to_string();
            if let Some(refresh_token) = refresh_token {
                session.refresh_token = refresh_token.to_string();
            }
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        *self.lock() = None;
        Ok(())
    }
}
