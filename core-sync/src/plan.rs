//! Diff between the local pictures and a TV's record set.
//!
//! `to_upload = local - keys(records)` and `to_delete = keys(records) - local`,
//! both keyed by fingerprint. Upload order follows the local set (file name
//! order); delete order follows fingerprint order.

use crate::local::{LocalArtwork, LocalArtworkSet};
use crate::repository::RecordSet;
use bridge_traits::art::RemoteArtwork;
use std::collections::HashSet;

/// A record whose picture is gone locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDelete {
    pub fingerprint: String,
    pub remote_id: String,
    pub file_name: String,
}

/// Mutations needed to bring one TV in line with the local set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_upload: Vec<LocalArtwork>,
    pub to_delete: Vec<PlannedDelete>,
    /// Local pictures already on the TV
    pub unchanged: usize,
}

impl SyncPlan {
    /// Compute the diff.
    pub fn compute(local: &LocalArtworkSet, records: &RecordSet) -> Self {
        let to_upload: Vec<LocalArtwork> = local
            .iter()
            .filter(|artwork| !records.contains(&artwork.fingerprint))
            .cloned()
            .collect();

        let to_delete = records
            .iter()
            .filter(|(fingerprint, _)| !local.contains(fingerprint))
            .map(|(fingerprint, record)| PlannedDelete {
                fingerprint: fingerprint.clone(),
                remote_id: record.remote_id.clone(),
                file_name: record.file_name.clone(),
            })
            .collect();

        Self {
            unchanged: local.len() - to_upload.len(),
            to_upload,
            to_delete,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_upload.is_empty() && self.to_delete.is_empty()
    }
}

/// Drop records whose remote id the TV no longer lists.
///
/// Returns the dropped fingerprints; their pictures become upload candidates
/// again if they still exist locally.
pub fn heal_drift(records: &mut RecordSet, remote: &[RemoteArtwork]) -> Vec<String> {
    let present: HashSet<&str> = remote.iter().map(|art| art.content_id.as_str()).collect();
    records.retain(|record| present.contains(record.remote_id.as_str()))
}
