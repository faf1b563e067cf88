//! # Local Artwork Scanner
//!
//! Enumerates the artwork directory and fingerprints every picture.
//!
//! Only `.jpg`, `.jpeg` and `.png` files directly inside the directory are
//! considered; sub-directories are not walked. The fingerprint (lowercase hex
//! SHA-256 of the file bytes) is the identity used everywhere else, so a
//! rename never looks like a change and an edit under the same name always
//! does.

use crate::{Result, SyncError};
use bridge_traits::art::ImageFormat;
use bridge_traits::storage::FileSystemAccess;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lowercase hex SHA-256 of `bytes`.
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// A picture found in the artwork directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtwork {
    pub fingerprint: String,
    pub file_name: String,
    pub path: PathBuf,
    pub format: ImageFormat,
    pub size: u64,
    /// Unix seconds, when the file system reports it
    pub modified_at: Option<i64>,
}

/// Pictures of one scan, ordered by file name, unique by fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalArtworkSet {
    items: Vec<LocalArtwork>,
}

impl LocalArtworkSet {
    /// Build a set from arbitrary entries: sorts by file name and keeps the
    /// first entry for each fingerprint.
    pub fn from_entries(mut entries: Vec<LocalArtwork>) -> Self {
        entries.sort_by(|a, b| a.file_name.as_bytes().cmp(b.file_name.as_bytes()));

        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            if seen.insert(entry.fingerprint.clone()) {
                items.push(entry);
            } else {
                debug!(
                    file = %entry.file_name,
                    fingerprint = %entry.fingerprint,
                    "Skipping duplicate picture"
                );
            }
        }

        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalArtwork> {
        self.items.iter()
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.items.iter().any(|item| item.fingerprint == fingerprint)
    }

    pub fn get(&self, fingerprint: &str) -> Option<&LocalArtwork> {
        self.items.iter().find(|item| item.fingerprint == fingerprint)
    }
}

/// Scans a directory through the [`FileSystemAccess`] bridge.
pub struct LocalScanner {
    file_system: Arc<dyn FileSystemAccess>,
}

impl LocalScanner {
    pub fn new(file_system: Arc<dyn FileSystemAccess>) -> Self {
        Self { file_system }
    }

    /// Scan `dir` and fingerprint every supported picture.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::LocalScan`] when the directory is missing or
    /// cannot be listed. Individual unreadable files are skipped with a
    /// warning instead.
    pub async fn scan(&self, dir: &Path) -> Result<LocalArtworkSet> {
        let scan_error = |message: String| SyncError::LocalScan {
            path: dir.display().to_string(),
            message,
        };

        let exists = self
            .file_system
            .exists(dir)
            .await
            .map_err(|e| scan_error(e.to_string()))?;
        if !exists {
            return Err(scan_error("directory does not exist".to_string()));
        }

        let paths = self
            .file_system
            .list_directory(dir)
            .await
            .map_err(|e| scan_error(e.to_string()))?;

        let mut entries = Vec::new();
        for path in paths {
            if let Some(entry) = self.inspect(&path).await {
                entries.push(entry);
            }
        }

        let set = LocalArtworkSet::from_entries(entries);
        info!(dir = %dir.display(), count = set.len(), "Scanned artwork directory");
        Ok(set)
    }

    async fn inspect(&self, path: &Path) -> Option<LocalArtwork> {
        let format = ImageFormat::from_path(path)?;
        let file_name = path.file_name()?.to_str()?.to_string();

        let metadata = match self.file_system.metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(file = %file_name, error = %e, "Skipping unreadable picture");
                return None;
            }
        };
        if metadata.is_directory {
            return None;
        }

        let bytes = match self.file_system.read_file(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %file_name, error = %e, "Skipping unreadable picture");
                return None;
            }
        };

        Some(LocalArtwork {
            fingerprint: fingerprint(&bytes),
            file_name,
            path: path.to_path_buf(),
            format,
            size: metadata.size,
            modified_at: metadata.modified_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::TokioFileSystem;
    use tempfile::TempDir;

    fn scanner() -> LocalScanner {
        LocalScanner::new(Arc::new(TokioFileSystem::new()))
    }

    #[test]
    fn test_fingerprint_is_sha256_hex() {
        assert_eq!(
            fingerprint(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[core_async::test]
    async fn test_scan_filters_and_orders() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.JPG"), b"bravo").unwrap();
        std::fs::write(dir.path().join("a.png"), b"alpha").unwrap();
        std::fs::write(dir.path().join("c.jpeg"), b"charlie").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let set = scanner().scan(dir.path()).await.unwrap();
        let names: Vec<&str> = set.iter().map(|a| a.file_name.as_str()).collect();

        assert_eq!(names, vec!["a.png", "b.JPG", "c.jpeg"]);
        assert_eq!(set.iter().next().unwrap().format, ImageFormat::Png);
        assert_eq!(set.get(&fingerprint(b"bravo")).unwrap().size, 5);
    }

    #[core_async::test]
    async fn test_duplicate_content_keeps_first_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("z.jpg"), b"same").unwrap();
        std::fs::write(dir.path().join("m.jpg"), b"same").unwrap();

        let set = scanner().scan(dir.path()).await.unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().file_name, "m.jpg");
    }

    #[core_async::test]
    async fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = scanner()
            .scan(&dir.path().join("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::LocalScan { .. }));
    }

    #[core_async::test]
    async fn test_empty_directory_is_empty_set() {
        let dir = TempDir::new().unwrap();
        let set = scanner().scan(dir.path()).await.unwrap();
        assert!(set.is_empty());
    }
}
