//! # Desktop Bridge Implementations
//!
//! Default implementations of the storage bridge traits for hosts that run
//! as a plain process (a container, a NAS, a desktop):
//! - `FileSystemAccess` using `tokio::fs`
//! - `SecureStore` as one file per key inside the token directory
//!
//! The TV gateway itself is not provided here; hosts inject their own
//! `ArtConnector`.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{FileSecureStore, TokioFileSystem};
//!
//! let fs = TokioFileSystem::new();
//! let secrets = FileSecureStore::new("/tokens");
//! ```

mod filesystem;
mod secure_store;

pub use filesystem::TokioFileSystem;
pub use secure_store::FileSecureStore;
