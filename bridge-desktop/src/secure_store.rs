//! Secret storage as plain files in a private directory.
//!
//! Each key becomes `<dir>/<key>.txt`. Pairing tokens are only meaningful on
//! the local network, so the directory permissions are the protection.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::SecureStore,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

const SECRET_EXTENSION: &str = "txt";

/// File-per-key secure store rooted at a directory (the token directory).
#[derive(Debug, Clone)]
pub struct FileSecureStore {
    root: PathBuf,
}

impl FileSecureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(BridgeError::OperationFailed(format!(
                "Invalid secret key '{}'",
                key
            )));
        }

        Ok(self.root.join(format!("{}.{}", key, SECRET_EXTENSION)))
    }
}

#[async_trait]
impl SecureStore for FileSecureStore {
    async fn set_secret(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).await?;

        let tmp = path.with_extension("txt.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;

        debug!(key = key, "Stored secret");
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                warn!(key = key, error = %e, "Failed to read secret");
                Err(BridgeError::Io(e))
            }
        }
    }

    async fn delete_secret(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = key, "Deleted secret");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BridgeError::Io(e)),
        }
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut read_dir = match fs::read_dir(&self.root).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(keys),
            Err(e) => return Err(BridgeError::Io(e)),
        };

        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SECRET_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[core_async::test]
    async fn test_secret_lifecycle() {
        let dir = TempDir::new().unwrap();
        let store = FileSecureStore::new(dir.path().join("tokens"));

        assert_eq!(store.get_secret("tv_10_0_0_2").await.unwrap(), None);

        store.set_secret("tv_10_0_0_2", b"12345").await.unwrap();
        store.set_secret("tv_10_0_0_3", b"67890").await.unwrap();

        assert_eq!(
            store.get_secret("tv_10_0_0_2").await.unwrap(),
            Some(b"12345".to_vec())
        );
        assert!(store.has_secret("tv_10_0_0_3").await.unwrap());
        assert_eq!(
            store.list_keys().await.unwrap(),
            vec!["tv_10_0_0_2".to_string(), "tv_10_0_0_3".to_string()]
        );
        assert!(dir.path().join("tokens").join("tv_10_0_0_2.txt").exists());

        store.delete_secret("tv_10_0_0_2").await.unwrap();
        store.delete_secret("tv_10_0_0_2").await.unwrap();
        assert!(!store.has_secret("tv_10_0_0_2").await.unwrap());
    }

    #[core_async::test]
    async fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileSecureStore::new(dir.path());

        assert!(store.set_secret("../escape", b"x").await.is_err());
        assert!(store.get_secret("").await.is_err());
    }

    #[core_async::test]
    async fn test_list_keys_on_missing_dir() {
        let dir = TempDir::new().unwrap();
        let store = FileSecureStore::new(dir.path().join("absent"));
        assert!(store.list_keys().await.unwrap().is_empty());
    }
}
