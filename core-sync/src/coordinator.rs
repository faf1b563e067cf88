//! # Sync Coordinator
//!
//! Runs the reconciliation engine across every configured TV, cycle after
//! cycle.
//!
//! ## Overview
//!
//! Each cycle:
//! 1. Scans the artwork directory once (shared by all TVs)
//! 2. Reconciles TVs one at a time, in configured order
//! 3. Publishes progress on the `EventBus`
//! 4. Returns a [`CycleReport`]
//!
//! [`SyncCoordinator::run_until`] repeats cycles, sleeping for the sync
//! interval in between, until the cancellation token fires. A new cycle never
//! starts before the previous one finished, so a TV's record set is never
//! written by two cycles at once. Shutdown is honored between TVs and during
//! the pause; an in-flight TV always runs to completion.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_async::sync::CancellationToken;
//!
//! let coordinator = SyncCoordinator::new(tvs, artwork_dir, interval, scanner, reconciler, event_bus);
//! let shutdown = CancellationToken::new();
//! let cycles = coordinator.run_until(shutdown.clone()).await;
//! ```

use crate::local::LocalScanner;
use crate::reconciler::{Reconciler, TvOutcome, TvSyncReport};
use bridge_traits::art::TvAddress;
use core_async::sync::CancellationToken;
use core_async::time::{sleep_or_cancelled, Duration, Instant};
use core_runtime::events::{CoreEvent, CycleId, EventBus, SyncEvent};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

/// Outcome of one cycle across all TVs.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_id: CycleId,
    /// One entry per configured TV, in configured order
    pub tvs: Vec<TvSyncReport>,
    /// Set when the artwork directory could not be scanned
    pub scan_error: Option<String>,
    pub duration: Duration,
}

impl CycleReport {
    /// TVs that finished, with or without changes.
    pub fn synced(&self) -> usize {
        self.count(|outcome| matches!(outcome, TvOutcome::Synced | TvOutcome::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, TvOutcome::Skipped { .. }))
    }

    /// TVs interrupted mid-way or whose records could not be saved.
    pub fn failed(&self) -> usize {
        self.count(|outcome| {
            matches!(
                outcome,
                TvOutcome::Interrupted { .. } | TvOutcome::Failed { .. }
            )
        })
    }

    /// Report for a given TV, if it was configured.
    pub fn tv(&self, address: &TvAddress) -> Option<&TvSyncReport> {
        self.tvs.iter().find(|report| &report.address == address)
    }

    fn count(&self, predicate: impl Fn(&TvOutcome) -> bool) -> usize {
        self.tvs
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

/// Cycle orchestrator.
pub struct SyncCoordinator {
    tvs: Vec<TvAddress>,
    artwork_dir: PathBuf,
    sync_interval: Duration,
    scanner: LocalScanner,
    reconciler: Reconciler,
    event_bus: EventBus,
}

impl SyncCoordinator {
    /// # Arguments
    ///
    /// * `tvs` - TVs to reconcile, in order
    /// * `artwork_dir` - Directory scanned at the start of each cycle
    /// * `sync_interval` - Pause between the end of a cycle and the next one
    /// * `scanner` - Local artwork scanner
    /// * `reconciler` - Per-TV engine
    /// * `event_bus` - Destination of cycle and TV events
    pub fn new(
        tvs: Vec<TvAddress>,
        artwork_dir: impl Into<PathBuf>,
        sync_interval: Duration,
        scanner: LocalScanner,
        reconciler: Reconciler,
        event_bus: EventBus,
    ) -> Self {
        Self {
            tvs,
            artwork_dir: artwork_dir.into(),
            sync_interval,
            scanner,
            reconciler,
            event_bus,
        }
    }

    pub fn tvs(&self) -> &[TvAddress] {
        &self.tvs
    }

    pub fn sync_interval(&self) -> Duration {
        self.sync_interval
    }

    /// Run a single cycle over every TV.
    pub async fn run_cycle(&self) -> CycleReport {
        self.cycle(None).await
    }

    /// Run cycles until `shutdown` is cancelled. Returns the number of cycles
    /// that were started.
    pub async fn run_until(&self, shutdown: CancellationToken) -> u64 {
        let mut cycles = 0u64;

        while !shutdown.is_cancelled() {
            let report = self.cycle(Some(&shutdown)).await;
            cycles += 1;

            if shutdown.is_cancelled() {
                break;
            }

            info!(
                cycle_id = %report.cycle_id,
                minutes = self.sync_interval.as_secs() / 60,
                "Waiting until next sync"
            );
            if !sleep_or_cancelled(self.sync_interval, &shutdown).await {
                break;
            }
        }

        info!(cycles, "Sync loop stopped");
        cycles
    }

    #[instrument(skip(self, shutdown), fields(tvs = self.tvs.len()))]
    async fn cycle(&self, shutdown: Option<&CancellationToken>) -> CycleReport {
        let cycle_id = CycleId::new();
        let started = Instant::now();

        info!(cycle_id = %cycle_id, tvs = self.tvs.len(), "Starting sync cycle");
        self.emit(SyncEvent::CycleStarted {
            cycle_id,
            tv_count: self.tvs.len(),
        });

        let mut reports = Vec::with_capacity(self.tvs.len());
        let mut scan_error = None;

        match self.scanner.scan(&self.artwork_dir).await {
            Ok(local) => {
                for tv in &self.tvs {
                    let report = if shutdown.is_some_and(CancellationToken::is_cancelled) {
                        skipped_report(tv, "shutting down")
                    } else {
                        self.reconcile_isolated(tv, &local).await
                    };
                    self.emit_tv(cycle_id, &report);
                    reports.push(report);
                }
            }
            Err(e) => {
                error!(cycle_id = %cycle_id, error = %e, "Cannot scan artwork, skipping all TVs");
                self.emit(SyncEvent::ScanFailed {
                    cycle_id,
                    message: e.to_string(),
                });
                for tv in &self.tvs {
                    let report = skipped_report(tv, "artwork directory unavailable");
                    self.emit_tv(cycle_id, &report);
                    reports.push(report);
                }
                scan_error = Some(e.to_string());
            }
        }

        let report = CycleReport {
            cycle_id,
            tvs: reports,
            scan_error,
            duration: started.elapsed(),
        };

        info!(
            cycle_id = %cycle_id,
            synced = report.synced(),
            skipped = report.skipped(),
            failed = report.failed(),
            duration_ms = report.duration.as_millis() as u64,
            "Sync cycle completed"
        );
        self.emit(SyncEvent::CycleCompleted {
            cycle_id,
            synced: report.synced(),
            skipped: report.skipped(),
            failed: report.failed(),
            duration_ms: report.duration.as_millis() as u64,
        });

        report
    }

    /// A panic inside one TV's reconciliation becomes a failed report.
    async fn reconcile_isolated(
        &self,
        tv: &TvAddress,
        local: &crate::local::LocalArtworkSet,
    ) -> TvSyncReport {
        match AssertUnwindSafe(self.reconciler.reconcile(tv, local))
            .catch_unwind()
            .await
        {
            Ok(report) => report,
            Err(_) => {
                error!(tv = %tv, "Reconciliation panicked");
                TvSyncReport {
                    outcome: TvOutcome::Failed {
                        reason: "reconciliation panicked".to_string(),
                    },
                    ..skipped_report(tv, "")
                }
            }
        }
    }

    fn emit_tv(&self, cycle_id: CycleId, report: &TvSyncReport) {
        let tv = report.address.to_string();
        let event = match &report.outcome {
            TvOutcome::Synced | TvOutcome::Unchanged => SyncEvent::TvSynced {
                cycle_id,
                tv,
                uploaded: report.uploaded,
                deleted: report.deleted,
                unchanged: report.unchanged,
                failed: report.failed(),
            },
            TvOutcome::Skipped { reason } => SyncEvent::TvSkipped {
                cycle_id,
                tv,
                reason: reason.clone(),
            },
            TvOutcome::Interrupted { reason } | TvOutcome::Failed { reason } => {
                warn!(tv = %report.address, reason = %reason, "TV sync failed");
                SyncEvent::TvFailed {
                    cycle_id,
                    tv,
                    message: reason.clone(),
                }
            }
        };
        self.emit(event);
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine.
        let _ = self.event_bus.emit(CoreEvent::Sync(event));
    }
}

fn skipped_report(tv: &TvAddress, reason: &str) -> TvSyncReport {
    TvSyncReport::skipped(tv.clone(), reason.to_string())
}
