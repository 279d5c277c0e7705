//! Persisted Token Slot
//!
//! One durable slot holding the current bearer token. Absence of a token
//! means the client starts anonymous. Only the session store writes it.
//!
//! ## File format
//!
//! ```json
//! {"token": "<opaque bearer token>"}
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::error::TokenStoreError;

/// Durable storage for the session token
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, `None` if there is none
    async fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Replace the persisted token
    async fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the persisted token; succeeds when nothing is stored
    async fn clear(&self) -> Result<(), TokenStoreError>;
}

/// On-disk shape of the token slot
#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Token slot stored as a small JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `<data_local_dir>/datalyn/session.json`
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|p| p.join("datalyn").join("session.json"))
            .unwrap_or_else(|| PathBuf::from("./datalyn_session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let file: TokenFile = serde_json::from_str(&content)?;
        Ok(file.token.filter(|t| !t.is_empty()))
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_vec(&TokenFile {
            token: Some(token.to_string()),
        })?;

        // Write then rename so a crash never leaves a half-written token
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &content).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = ?self.path, "Session token persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = ?self.path, "Session token removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process token slot, for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already persisted
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Current contents of the slot
    pub fn get(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.get())
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_anonymous() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileTokenStore::new(&path);

        store.save("tok1").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("tok1"));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, r#"{"token":"tok1"}"#);

        store.save("tok2").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("tok2"));

        store.clear().await.unwrap();
        assert!(!path.exists());
        assert_eq!(store.load().await.unwrap(), None);

        // Clearing an empty slot is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_or_tokenless_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::new(&path);

        std::fs::write(&path, "").unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        std::fs::write(&path, r#"{"token": ""}"#).unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(
            store.load().await,
            Err(TokenStoreError::Serialization(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileTokenStore::new(&path).save("tok1").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryTokenStore::with_token("tok1");
        assert_eq!(store.load().await.unwrap().as_deref(), Some("tok1"));

        store.clear().await.unwrap();
        assert_eq!(store.get(), None);
    }
}
