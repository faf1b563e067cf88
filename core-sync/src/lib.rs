//! # Sync Module
//!
//! Keeps the Art Mode galleries of one or more TVs in line with a local
//! artwork directory.
//!
//! ## Overview
//!
//! - Scanning the artwork directory and fingerprinting pictures
//! - Persisting, per TV, which pictures were uploaded
//! - Diffing local pictures against those records, healing drift against
//!   the TV's own listing
//! - Applying uploads and deletes with per-item failure isolation
//! - Restoring or overriding the slideshow and applying brightness
//! - Running all of the above for every TV, cycle after cycle
//!
//! ## Components
//!
//! - **Local Scanner** (`local`): SHA-256 fingerprints of `.jpg`/`.jpeg`/`.png` files
//! - **State Store** (`repository`): `RecordStore` trait and JSON-file implementation
//! - **Planner** (`plan`): fingerprint diff and drift healing
//! - **Policies** (`policy`): slideshow restore/override and brightness target
//! - **Reconciliation Engine** (`reconciler`): per-TV state machine
//! - **Sync Coordinator** (`coordinator`): per-cycle orchestration and the run loop

pub mod coordinator;
pub mod error;
pub mod local;
pub mod plan;
pub mod policy;
pub mod reconciler;
pub mod repository;

pub use coordinator::{CycleReport, SyncCoordinator};
pub use error::{Result, SyncError};
pub use local::{fingerprint, LocalArtwork, LocalArtworkSet, LocalScanner};
pub use plan::{heal_drift, PlannedDelete, SyncPlan};
pub use policy::{brightness_target, slideshow_to_apply};
pub use reconciler::{
    BrightnessOutcome, Reconciler, ReconcilerSettings, SlideshowOutcome, TvOutcome, TvSyncReport,
};
pub use repository::{FileRecordStore, RecordSet, RecordStore, RemoteArtworkRecord};
