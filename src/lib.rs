//! Workspace entry crate.
//!
//! Re-exports the service façade so hosts can depend on `frame-sync` alone,
//! inject their TV gateway and run the sync loop. The `frame-sync` binary in
//! this crate only offers the diagnostic modes (`test-solar`, `check-config`).

pub use core_runtime::config::FrameSyncConfig;
pub use core_service::{CoreDependencies, CoreError, FrameSyncService};
