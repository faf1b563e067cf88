//! Synchronization primitives.
//!
//! All primitives are async-aware and `Send + Sync`, so they can be shared
//! between the orchestrator loop and the shutdown listener.
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::{CancellationToken, Mutex};
//!
//! async fn example() {
//!     let counter = Mutex::new(0);
//!     *counter.lock().await += 1;
//!
//!     let token = CancellationToken::new();
//!     let child = token.child_token();
//!     token.cancel();
//!     assert!(child.is_cancelled());
//! }
//! ```

pub use tokio::sync::{broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, RwLock};
pub use tokio_util::sync::CancellationToken;
