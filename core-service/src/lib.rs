//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (TV gateway,
//! filesystem, secure storage, clock) and a validated
//! [`FrameSyncConfig`] into a running sync service. Plain-process hosts
//! typically keep the default `desktop-shims` feature, which supplies the
//! filesystem and token storage from `bridge-desktop`; the TV gateway is
//! always injected by the host.
//!
//! ```ignore
//! use core_service::{CoreDependencies, FrameSyncService};
//! use core_runtime::config::{FrameSyncConfig, ProcessEnv};
//!
//! let config = FrameSyncConfig::from_env(&ProcessEnv)?;
//! let deps = CoreDependencies::desktop(connector, &config.token_dir);
//! let service = FrameSyncService::new(config, deps)?;
//! service.run_until_signal().await;
//! ```

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{
    art::{ArtConnector, TvAddress},
    storage::{FileSystemAccess, SecureStore},
    time::{Clock, SystemClock},
};
use core_async::signal::cancel_on_shutdown;
use core_async::sync::CancellationToken;
use core_auth::TvTokenStore;
use core_runtime::config::FrameSyncConfig;
use core_runtime::events::{CoreEvent, EventBus, ServiceEvent};
use core_sync::{
    CycleReport, FileRecordStore, LocalScanner, Reconciler, ReconcilerSettings, SyncCoordinator,
};
use tracing::info;

#[cfg(feature = "desktop-shims")]
use bridge_desktop::{FileSecureStore, TokioFileSystem};
#[cfg(feature = "desktop-shims")]
use std::path::Path;

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub art_connector: Arc<dyn ArtConnector>,
    pub filesystem: Arc<dyn FileSystemAccess>,
    pub secure_store: Arc<dyn SecureStore>,
    pub clock: Arc<dyn Clock>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        art_connector: Arc<dyn ArtConnector>,
        filesystem: Arc<dyn FileSystemAccess>,
        secure_store: Arc<dyn SecureStore>,
    ) -> Self {
        Self {
            art_connector,
            filesystem,
            secure_store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Desktop file system plus pairing tokens stored under `token_dir`.
    #[cfg(feature = "desktop-shims")]
    pub fn desktop(art_connector: Arc<dyn ArtConnector>, token_dir: &Path) -> Self {
        Self::new(
            art_connector,
            Arc::new(TokioFileSystem::new()),
            Arc::new(FileSecureStore::new(token_dir)),
        )
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Primary façade exposed to host applications.
pub struct FrameSyncService {
    config: Arc<FrameSyncConfig>,
    tokens: Arc<TvTokenStore>,
    coordinator: SyncCoordinator,
    event_bus: EventBus,
}

impl FrameSyncService {
    /// Wire the service together.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if `config` does not validate.
    pub fn new(config: FrameSyncConfig, deps: CoreDependencies) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::default();
        let tokens = Arc::new(TvTokenStore::new(Arc::clone(&deps.secure_store)));
        let records = Arc::new(FileRecordStore::new(
            Arc::clone(&deps.filesystem),
            config.token_dir.clone(),
        ));

        let reconciler = Reconciler::new(
            Arc::clone(&deps.art_connector),
            tokens.clone(),
            records,
            Arc::clone(&deps.filesystem),
            ReconcilerSettings::from_config(&config),
        )
        .with_clock(Arc::clone(&deps.clock));

        let coordinator = SyncCoordinator::new(
            config.tvs.clone(),
            config.artwork_dir.clone(),
            config.sync_interval,
            LocalScanner::new(Arc::clone(&deps.filesystem)),
            reconciler,
            event_bus.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            tokens,
            coordinator,
            event_bus,
        })
    }

    pub fn config(&self) -> &FrameSyncConfig {
        &self.config
    }

    /// Bus carrying cycle and service events.
    pub fn events(&self) -> &EventBus {
        &self.event_bus
    }

    /// Run exactly one cycle.
    pub async fn sync_once(&self) -> CycleReport {
        self.coordinator.run_cycle().await
    }

    /// Run cycles until `shutdown` fires. Returns the number of cycles run.
    pub async fn run(&self, shutdown: CancellationToken) -> u64 {
        info!(
            tvs = self.config.tvs.len(),
            artwork_dir = %self.config.artwork_dir.display(),
            interval_minutes = self.config.sync_interval.as_secs() / 60,
            matte = %self.config.matte,
            "Frame sync service starting"
        );
        let _ = self
            .event_bus
            .emit(CoreEvent::Service(ServiceEvent::Started {
                tv_count: self.config.tvs.len(),
                interval_minutes: self.config.sync_interval.as_secs() / 60,
            }));

        let cycles = self.coordinator.run_until(shutdown).await;

        info!(cycles, "Frame sync service stopped");
        let _ = self
            .event_bus
            .emit(CoreEvent::Service(ServiceEvent::Stopped {
                cycles_run: cycles,
            }));
        cycles
    }

    /// Run until the process receives Ctrl-C or SIGTERM.
    ///
    /// A cycle in progress finishes its current TV before the loop exits.
    pub async fn run_until_signal(&self) -> u64 {
        let shutdown = CancellationToken::new();
        let listener = cancel_on_shutdown(shutdown.clone());
        let cycles = self.run(shutdown).await;
        listener.abort();
        cycles
    }

    /// Configured TVs that already hold a pairing token.
    pub async fn paired_tvs(&self) -> Result<Vec<TvAddress>> {
        let keys = self.tokens.list_paired().await?;
        Ok(self
            .config
            .tvs
            .iter()
            .filter(|tv| keys.contains(&tv.storage_key()))
            .cloned()
            .collect())
    }

    /// Forget the pairing token of `tv`; the TV will prompt again on next
    /// connect.
    pub async fn unpair(&self, tv: &TvAddress) -> Result<()> {
        self.tokens.delete_token(tv).await?;
        Ok(())
    }
}
