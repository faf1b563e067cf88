//! # Reconciliation Engine
//!
//! Brings a single TV in line with the local artwork set.
//!
//! ## Workflow
//!
//! 1. Check reachability and open a session (skip the TV on failure)
//! 2. Load the TV's record set and heal drift against the TV's own listing
//! 3. Plan uploads and deletes by fingerprint
//! 4. If nothing changes, only re-apply brightness
//! 5. Otherwise capture slideshow settings, upload, then delete, pausing
//!    between consecutive operations
//! 6. Persist the record set once, when it changed
//! 7. Select the first uploaded picture, restore or override the slideshow,
//!    then apply brightness
//!
//! Per-item failures are logged and retried next cycle. A connectivity error
//! or timeout part-way through stops the remaining mutations for the TV; the
//! records of operations that already succeeded are still persisted, and the
//! slideshow and brightness steps are skipped.

use crate::local::{fingerprint, LocalArtwork, LocalArtworkSet};
use crate::plan::{heal_drift, PlannedDelete, SyncPlan};
use crate::policy::{brightness_target, slideshow_to_apply};
use crate::repository::{RecordSet, RecordStore, RemoteArtworkRecord};
use crate::{Result, SyncError};
use bridge_traits::art::{ArtConnector, ArtSession, ImageUpload, PairingTokenStore, TvAddress};
use bridge_traits::matte::Matte;
use bridge_traits::storage::FileSystemAccess;
use bridge_traits::time::{Clock, SystemClock};
use core_async::time::{sleep, timeout, Duration};
use core_runtime::config::{
    BrightnessConfig, FrameSyncConfig, SlideshowOverride, DEFAULT_DELETE_DELAY_MS,
    DEFAULT_TV_TIMEOUT_SECONDS, DEFAULT_UPLOAD_DELAY_MS,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// ============================================================================
// Settings
// ============================================================================

/// Per-cycle inputs of the engine that do not change between cycles.
#[derive(Debug, Clone)]
pub struct ReconcilerSettings {
    pub matte: Matte,
    pub slideshow: SlideshowOverride,
    pub brightness: BrightnessConfig,
    /// Upper bound on every gateway call
    pub call_timeout: Duration,
    pub upload_delay: Duration,
    pub delete_delay: Duration,
}

impl ReconcilerSettings {
    pub fn from_config(config: &FrameSyncConfig) -> Self {
        Self {
            matte: config.matte,
            slideshow: config.slideshow,
            brightness: config.brightness,
            call_timeout: config.tv_timeout,
            upload_delay: config.upload_delay,
            delete_delay: config.delete_delay,
        }
    }
}

impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self {
            matte: Matte::None,
            slideshow: SlideshowOverride::default(),
            brightness: BrightnessConfig::default(),
            call_timeout: Duration::from_secs(DEFAULT_TV_TIMEOUT_SECONDS),
            upload_delay: Duration::from_millis(DEFAULT_UPLOAD_DELAY_MS),
            delete_delay: Duration::from_millis(DEFAULT_DELETE_DELAY_MS),
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

/// How a TV's reconciliation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TvOutcome {
    /// Mutations were attempted and the TV stayed reachable.
    Synced,
    /// Nothing to upload or delete.
    Unchanged,
    /// Not processed this cycle; the record set was not touched.
    Skipped { reason: String },
    /// Connectivity was lost mid-way; completed work was persisted.
    Interrupted { reason: String },
    /// The record set could not be persisted.
    Failed { reason: String },
}

/// What happened to the TV's slideshow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideshowOutcome {
    /// No mutation, so the slideshow was left alone.
    Untouched,
    /// The captured settings were written back.
    Restored,
    /// The configured override was applied.
    Overridden,
    /// Capture failed and no override is configured.
    NotCaptured,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrightnessOutcome {
    NotConfigured,
    Applied(u8),
    Failed { value: u8, reason: String },
    /// The TV was skipped or interrupted before brightness was applied.
    Skipped,
}

/// Result of one TV's reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TvSyncReport {
    pub address: TvAddress,
    pub outcome: TvOutcome,
    pub uploaded: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub failed_uploads: usize,
    pub failed_deletes: usize,
    /// Records dropped because the TV no longer lists them
    pub healed: usize,
    /// Remote id selected as current art
    pub selected: Option<String>,
    pub slideshow: SlideshowOutcome,
    pub brightness: BrightnessOutcome,
}

impl TvSyncReport {
    pub(crate) fn new(address: TvAddress) -> Self {
        Self {
            address,
            outcome: TvOutcome::Unchanged,
            uploaded: 0,
            deleted: 0,
            unchanged: 0,
            failed_uploads: 0,
            failed_deletes: 0,
            healed: 0,
            selected: None,
            slideshow: SlideshowOutcome::Untouched,
            brightness: BrightnessOutcome::Skipped,
        }
    }

    pub(crate) fn skipped(address: TvAddress, reason: String) -> Self {
        Self {
            outcome: TvOutcome::Skipped { reason },
            ..Self::new(address)
        }
    }

    /// Per-item failures of this TV.
    pub fn failed(&self) -> usize {
        self.failed_uploads + self.failed_deletes
    }
}

// ============================================================================
// Reconciler
// ============================================================================

/// Reconciliation engine shared by every TV of a cycle.
pub struct Reconciler {
    connector: Arc<dyn ArtConnector>,
    tokens: Arc<dyn PairingTokenStore>,
    records: Arc<dyn RecordStore>,
    file_system: Arc<dyn FileSystemAccess>,
    clock: Arc<dyn Clock>,
    settings: ReconcilerSettings,
}

impl Reconciler {
    /// # Arguments
    ///
    /// * `connector` - Device Gateway used to open sessions
    /// * `tokens` - Pairing token store handed to the gateway
    /// * `records` - Per-TV state store
    /// * `file_system` - Used to read picture bytes at upload time
    /// * `settings` - Matte, slideshow, brightness and timing
    pub fn new(
        connector: Arc<dyn ArtConnector>,
        tokens: Arc<dyn PairingTokenStore>,
        records: Arc<dyn RecordStore>,
        file_system: Arc<dyn FileSystemAccess>,
        settings: ReconcilerSettings,
    ) -> Self {
        Self {
            connector,
            tokens,
            records,
            file_system,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    /// Replace the clock used for record timestamps and solar brightness.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &ReconcilerSettings {
        &self.settings
    }

    /// Reconcile one TV. Never fails: every problem ends up in the report.
    #[instrument(skip(self, local), fields(tv = %tv, local = local.len()))]
    pub async fn reconcile(&self, tv: &TvAddress, local: &LocalArtworkSet) -> TvSyncReport {
        let reachable = timeout(self.settings.call_timeout, self.connector.is_reachable(tv))
            .await
            .unwrap_or(false);
        if !reachable {
            warn!(tv = %tv, "TV unreachable, skipping this cycle");
            return TvSyncReport::skipped(tv.clone(), "unreachable".to_string());
        }

        let session = match self
            .call(
                tv,
                "connect",
                self.connector.connect(tv, Arc::clone(&self.tokens)),
                |message| SyncError::Connectivity {
                    tv: tv.to_string(),
                    message,
                },
            )
            .await
        {
            Ok(session) => session,
            Err(e) => {
                warn!(tv = %tv, error = %e, "Cannot connect to TV, skipping this cycle");
                return TvSyncReport::skipped(tv.clone(), e.to_string());
            }
        };

        let report = self.reconcile_session(tv, session.as_ref(), local).await;

        match timeout(self.settings.call_timeout, session.close()).await {
            Ok(Err(e)) => debug!(tv = %tv, error = %e, "Ignoring session close error"),
            Err(_) => debug!(tv = %tv, "Session close timed out"),
            Ok(Ok(())) => {}
        }

        report
    }

    async fn reconcile_session(
        &self,
        tv: &TvAddress,
        session: &dyn ArtSession,
        local: &LocalArtworkSet,
    ) -> TvSyncReport {
        let mut report = TvSyncReport::new(tv.clone());

        let mut records = match self.records.load(tv).await {
            Ok(records) => records,
            Err(e) => {
                warn!(tv = %tv, error = %e, "Cannot load records, starting empty");
                RecordSet::new()
            }
        };
        let persisted = records.clone();

        match self
            .call(tv, "list art", session.list_remote_art(), SyncError::RemoteListing)
            .await
        {
            Ok(remote) => {
                let healed = heal_drift(&mut records, &remote);
                if !healed.is_empty() {
                    info!(tv = %tv, count = healed.len(), "Dropped records missing from the TV");
                }
                report.healed = healed.len();
            }
            Err(e) if e.is_connectivity() => {
                warn!(tv = %tv, error = %e, "Lost TV while listing artwork, skipping this cycle");
                report.outcome = TvOutcome::Skipped {
                    reason: e.to_string(),
                };
                return report;
            }
            Err(e) => {
                warn!(tv = %tv, error = %e, "Cannot list artwork, using stored records as-is");
            }
        }

        let plan = SyncPlan::compute(local, &records);
        report.unchanged = plan.unchanged;
        info!(
            tv = %tv,
            uploads = plan.to_upload.len(),
            deletes = plan.to_delete.len(),
            unchanged = plan.unchanged,
            "Planned sync"
        );

        if plan.is_empty() {
            if records != persisted {
                self.persist(tv, &records, &mut report).await;
            }
            report.brightness = self.apply_brightness(tv, session).await;
            return report;
        }

        let captured = if self.settings.slideshow.is_set() {
            None
        } else {
            match self
                .call(
                    tv,
                    "get slideshow",
                    session.get_slideshow_settings(),
                    SyncError::Capture,
                )
                .await
            {
                Ok(settings) => {
                    debug!(tv = %tv, ?settings, "Captured slideshow settings");
                    Some(settings)
                }
                Err(e) => {
                    warn!(tv = %tv, error = %e, "Proceeding without slideshow restore");
                    None
                }
            }
        };

        let mut interrupted: Option<SyncError> = None;
        let mut first_uploaded: Option<String> = None;

        for (index, artwork) in plan.to_upload.iter().enumerate() {
            if index > 0 {
                sleep(self.settings.upload_delay).await;
            }

            match self.upload(tv, session, artwork).await {
                Ok(remote_id) => {
                    info!(tv = %tv, file = %artwork.file_name, remote_id = %remote_id, "Uploaded");
                    records.insert(
                        artwork.fingerprint.clone(),
                        RemoteArtworkRecord {
                            remote_id: remote_id.clone(),
                            file_name: artwork.file_name.clone(),
                            matte: self.settings.matte.wire_id(),
                            uploaded_at: self.clock.now(),
                        },
                    );
                    report.uploaded += 1;
                    first_uploaded.get_or_insert(remote_id);
                }
                Err(e) if e.is_connectivity() => {
                    interrupted = Some(e);
                    break;
                }
                Err(e) => {
                    warn!(tv = %tv, file = %artwork.file_name, error = %e, "Upload failed, retrying next cycle");
                    report.failed_uploads += 1;
                }
            }
        }

        if interrupted.is_none() {
            for (index, planned) in plan.to_delete.iter().enumerate() {
                if index > 0 {
                    sleep(self.settings.delete_delay).await;
                }

                match self.delete(tv, session, planned).await {
                    Ok(()) => {
                        info!(tv = %tv, file = %planned.file_name, remote_id = %planned.remote_id, "Deleted");
                        records.remove(&planned.fingerprint);
                        report.deleted += 1;
                    }
                    Err(e) if e.is_connectivity() => {
                        interrupted = Some(e);
                        break;
                    }
                    Err(e) => {
                        warn!(tv = %tv, remote_id = %planned.remote_id, error = %e, "Delete failed, retrying next cycle");
                        report.failed_deletes += 1;
                    }
                }
            }
        }

        report.outcome = TvOutcome::Synced;
        if records != persisted {
            self.persist(tv, &records, &mut report).await;
        }

        if let Some(e) = interrupted {
            warn!(tv = %tv, error = %e, "Lost TV mid-sync, remaining work deferred to next cycle");
            if matches!(report.outcome, TvOutcome::Synced) {
                report.outcome = TvOutcome::Interrupted {
                    reason: e.to_string(),
                };
            }
            return report;
        }

        if let Some(remote_id) = first_uploaded {
            match self
                .call(tv, "select art", session.select_art(&remote_id), |message| {
                    SyncError::SettingFailed {
                        setting: "current art".to_string(),
                        message,
                    }
                })
                .await
            {
                Ok(()) => {
                    debug!(tv = %tv, remote_id = %remote_id, "Selected current art");
                    report.selected = Some(remote_id);
                }
                Err(e) if e.is_connectivity() => {
                    warn!(tv = %tv, error = %e, "Lost TV while selecting art, skipping slideshow and brightness");
                    if matches!(report.outcome, TvOutcome::Synced) {
                        report.outcome = TvOutcome::Interrupted {
                            reason: e.to_string(),
                        };
                    }
                    return report;
                }
                Err(e) => warn!(tv = %tv, error = %e, "Cannot select current art"),
            }
        }

        report.slideshow = self.apply_slideshow(tv, session, captured).await;
        report.brightness = self.apply_brightness(tv, session).await;

        report
    }

    async fn upload(
        &self,
        tv: &TvAddress,
        session: &dyn ArtSession,
        artwork: &LocalArtwork,
    ) -> Result<String> {
        let upload_error = |message: String| SyncError::Upload {
            file: artwork.file_name.clone(),
            message,
        };

        let bytes = self
            .file_system
            .read_file(&artwork.path)
            .await
            .map_err(|e| upload_error(e.to_string()))?;

        if fingerprint(&bytes) != artwork.fingerprint {
            return Err(upload_error("file changed since scan".to_string()));
        }

        let image = ImageUpload {
            file_name: artwork.file_name.clone(),
            format: artwork.format,
            bytes,
        };

        self.call(
            tv,
            "upload",
            session.upload(image, self.settings.matte),
            upload_error,
        )
        .await
    }

    async fn delete(
        &self,
        tv: &TvAddress,
        session: &dyn ArtSession,
        planned: &PlannedDelete,
    ) -> Result<()> {
        self.call(
            tv,
            "delete",
            session.delete(&planned.remote_id),
            |message| SyncError::Delete {
                remote_id: planned.remote_id.clone(),
                message,
            },
        )
        .await
    }

    async fn persist(&self, tv: &TvAddress, records: &RecordSet, report: &mut TvSyncReport) {
        if let Err(e) = self.records.save(tv, records).await {
            error!(tv = %tv, error = %e, "Cannot persist records");
            report.outcome = TvOutcome::Failed {
                reason: e.to_string(),
            };
        }
    }

    async fn apply_slideshow(
        &self,
        tv: &TvAddress,
        session: &dyn ArtSession,
        captured: Option<bridge_traits::art::SlideshowSettings>,
    ) -> SlideshowOutcome {
        let Some(settings) = slideshow_to_apply(&self.settings.slideshow, captured.as_ref()) else {
            return SlideshowOutcome::NotCaptured;
        };

        let result = self
            .call(
                tv,
                "set slideshow",
                session.set_slideshow_settings(&settings),
                |message| SyncError::SettingFailed {
                    setting: "slideshow".to_string(),
                    message,
                },
            )
            .await;

        match result {
            Ok(()) if self.settings.slideshow.is_set() => {
                info!(tv = %tv, ?settings, "Applied slideshow override");
                SlideshowOutcome::Overridden
            }
            Ok(()) => {
                info!(tv = %tv, ?settings, "Restored slideshow settings");
                SlideshowOutcome::Restored
            }
            Err(e) => {
                warn!(tv = %tv, error = %e, "Cannot set slideshow");
                SlideshowOutcome::Failed(e.to_string())
            }
        }
    }

    async fn apply_brightness(&self, tv: &TvAddress, session: &dyn ArtSession) -> BrightnessOutcome {
        let Some(value) = brightness_target(&self.settings.brightness, self.clock.now()) else {
            return BrightnessOutcome::NotConfigured;
        };

        let result = self
            .call(
                tv,
                "set brightness",
                session.set_brightness(value),
                |message| SyncError::SettingFailed {
                    setting: "brightness".to_string(),
                    message,
                },
            )
            .await;

        match result {
            Ok(()) => {
                debug!(tv = %tv, value, "Applied brightness");
                BrightnessOutcome::Applied(value)
            }
            Err(e) => {
                warn!(tv = %tv, value, error = %e, "Cannot set brightness");
                BrightnessOutcome::Failed {
                    value,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Run a gateway call under the configured timeout.
    async fn call<T, F>(
        &self,
        tv: &TvAddress,
        operation: &str,
        future: F,
        otherwise: impl FnOnce(String) -> SyncError,
    ) -> Result<T>
    where
        F: Future<Output = bridge_traits::error::Result<T>>,
    {
        match timeout(self.settings.call_timeout, future).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(SyncError::from_gateway(tv.as_str(), e, otherwise)),
            Err(_) => Err(SyncError::Timeout {
                operation: operation.to_string(),
                seconds: self.settings.call_timeout.as_secs(),
            }),
        }
    }
}
