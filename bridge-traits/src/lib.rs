//! # Host Bridge Traits
//!
//! Capabilities the sync core needs but does not implement itself.
//!
//! ## Traits
//!
//! ### Devices
//! - [`ArtConnector`](art::ArtConnector) / [`ArtSession`](art::ArtSession) - Art Mode control of a TV
//! - [`PairingTokenStore`](art::PairingTokenStore) - Durable pairing tokens per TV
//!
//! ### Storage
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Artwork directory and state files
//! - [`SecureStore`](storage::SecureStore) - Secret persistence
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Fail-Fast Strategy
//!
//! The service refuses to start when a required capability is missing:
//!
//! ```ignore
//! let deps = CoreDependencies::desktop(connector, &config.token_dir);
//! let service = FrameSyncService::new(config, deps)?; // validates first
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should map transport failures to `BridgeError::Connectivity` and keep the
//! TV's own error text in `BridgeError::OperationFailed`.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so sessions and stores can
//! be shared across async tasks.

pub mod art;
pub mod error;
pub mod matte;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use art::{
    AddressParseError, ArtConnector, ArtSession, ImageFormat, ImageUpload, PairingTokenStore,
    RemoteArtwork, SlideshowKind, SlideshowSettings, TvAddress, USER_ART_CATEGORY,
};
pub use matte::{Matte, MatteColor, MatteParseError, MatteStyle};
pub use storage::{FileMetadata, FileSystemAccess, SecureStore};
pub use time::{Clock, FixedClock, LogLevel, SystemClock};
