//! Runtime abstraction layer for the frame sync core.
//!
//! Core crates depend on this crate instead of naming Tokio directly, so the
//! executor choice lives in exactly one place.
//!
//! # Modules
//!
//! - `task`: Task spawning
//! - `time`: Sleep, timeouts, durations and instants
//! - `sync`: Async-aware locks, channels and cancellation
//! - `runtime`: Runtime construction and `block_on`
//! - `signal`: Process shutdown signals
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = core_async::spawn(async {
//!         sleep(Duration::from_millis(5)).await;
//!         42
//!     });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

// Re-export the async test macro so downstream crates never need
// direct Tokio dependencies.
pub use core_async_macros::test;

pub mod runtime;
pub mod signal;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
