//! # State Store
//!
//! Persists, per TV, which local pictures are believed to be on that TV.
//!
//! ## Overview
//!
//! A [`RecordSet`] maps a local fingerprint to the [`RemoteArtworkRecord`]
//! created when the picture was uploaded. [`FileRecordStore`] keeps one JSON
//! document per TV next to the pairing tokens:
//!
//! ```text
//! TOKEN_DIR/tv_192_168_1_20_records.json
//! {
//!   "version": 1,
//!   "tv": "192.168.1.20",
//!   "records": {
//!     "<fingerprint>": { "remote_id": "MY_F0001", "file_name": "a.jpg", ... }
//!   }
//! }
//! ```
//!
//! Saves go through [`FileSystemAccess::write_file_atomic`], so a crash never
//! leaves a half-written document behind. Loading never fails: a missing file
//! is an empty set, and a corrupt one is logged and treated as empty, which
//! forces a full re-upload rather than trusting partial data.

use crate::{Result, SyncError};
use async_trait::async_trait;
use bridge_traits::art::TvAddress;
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Current on-disk document version.
pub const RECORD_FORMAT_VERSION: u32 = 1;

// ============================================================================
// Records
// ============================================================================

/// One uploaded picture on one TV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteArtworkRecord {
    /// Content id assigned by the TV
    pub remote_id: String,
    /// Local file name at upload time (informational)
    pub file_name: String,
    /// Matte applied at upload time
    pub matte: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Records of one TV keyed by fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: BTreeMap<String, RemoteArtworkRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.records.contains_key(fingerprint)
    }

    pub fn get(&self, fingerprint: &str) -> Option<&RemoteArtworkRecord> {
        self.records.get(fingerprint)
    }

    pub fn insert(&mut self, fingerprint: impl Into<String>, record: RemoteArtworkRecord) {
        self.records.insert(fingerprint.into(), record);
    }

    pub fn remove(&mut self, fingerprint: &str) -> Option<RemoteArtworkRecord> {
        self.records.remove(fingerprint)
    }

    /// Fingerprint/record pairs in fingerprint order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RemoteArtworkRecord)> {
        self.records.iter()
    }

    /// Drop every record for which `keep` returns false; returns the dropped
    /// fingerprints.
    pub fn retain(&mut self, mut keep: impl FnMut(&RemoteArtworkRecord) -> bool) -> Vec<String> {
        let mut dropped = Vec::new();
        self.records.retain(|fingerprint, record| {
            let kept = keep(record);
            if !kept {
                dropped.push(fingerprint.clone());
            }
            kept
        });
        dropped
    }
}

// ============================================================================
// Store Trait
// ============================================================================

/// Durable per-TV record sets.
///
/// At most one writer per TV is expected; the coordinator never overlaps
/// cycles.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Record set of `tv`; empty when nothing was persisted yet.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::StateStore`] only for failures the caller cannot
    /// interpret as "no records".
    async fn load(&self, tv: &TvAddress) -> Result<RecordSet>;

    /// Replace the record set of `tv` atomically.
    async fn save(&self, tv: &TvAddress, records: &RecordSet) -> Result<()>;
}

// ============================================================================
// File Implementation
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct RecordDocument {
    version: u32,
    tv: String,
    #[serde(default)]
    records: RecordSet,
}

/// JSON-file record store.
pub struct FileRecordStore {
    file_system: Arc<dyn FileSystemAccess>,
    dir: PathBuf,
}

impl FileRecordStore {
    /// Store documents under `dir` (usually `TOKEN_DIR`).
    pub fn new(file_system: Arc<dyn FileSystemAccess>, dir: impl Into<PathBuf>) -> Self {
        Self {
            file_system,
            dir: dir.into(),
        }
    }

    /// Location of the document for `tv`.
    pub fn path_for(&self, tv: &TvAddress) -> PathBuf {
        self.dir.join(format!("{}_records.json", tv.storage_key()))
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn load(&self, tv: &TvAddress) -> Result<RecordSet> {
        let path = self.path_for(tv);

        match self.file_system.exists(&path).await {
            Ok(false) => return Ok(RecordSet::new()),
            Ok(true) => {}
            Err(e) => {
                warn!(tv = %tv, path = %path.display(), error = %e, "Cannot check record file, starting empty");
                return Ok(RecordSet::new());
            }
        }

        let bytes = match self.file_system.read_file(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(tv = %tv, path = %path.display(), error = %e, "Unreadable record file, starting empty");
                return Ok(RecordSet::new());
            }
        };

        match serde_json::from_slice::<RecordDocument>(&bytes) {
            Ok(document) => {
                if document.version > RECORD_FORMAT_VERSION {
                    debug!(tv = %tv, version = document.version, "Loading newer record format");
                }
                debug!(tv = %tv, count = document.records.len(), "Loaded records");
                Ok(document.records)
            }
            Err(e) => {
                warn!(tv = %tv, path = %path.display(), error = %e, "Corrupt record file, starting empty");
                Ok(RecordSet::new())
            }
        }
    }

    async fn save(&self, tv: &TvAddress, records: &RecordSet) -> Result<()> {
        let document = RecordDocument {
            version: RECORD_FORMAT_VERSION,
            tv: tv.to_string(),
            records: records.clone(),
        };
        let json = serde_json::to_vec_pretty(&document)
            .map_err(|e| SyncError::StateStore(format!("Cannot encode records for {}: {}", tv, e)))?;

        self.file_system
            .create_dir_all(&self.dir)
            .await
            .map_err(|e| SyncError::StateStore(format!("Cannot create {}: {}", self.dir.display(), e)))?;

        let path = self.path_for(tv);
        self.file_system
            .write_file_atomic(&path, Bytes::from(json))
            .await
            .map_err(|e| SyncError::StateStore(format!("Cannot write {}: {}", path.display(), e)))?;

        debug!(tv = %tv, count = records.len(), "Saved records");
        Ok(())
    }
}
