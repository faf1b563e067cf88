//! Time-related abstractions.
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{sleep, timeout, Duration, Instant};
//!
//! async fn example() {
//!     let start = Instant::now();
//!     sleep(Duration::from_millis(10)).await;
//!     assert!(start.elapsed() >= Duration::from_millis(10));
//!
//!     let quick = timeout(Duration::from_secs(1), async { 7 }).await;
//!     assert_eq!(quick.ok(), Some(7));
//! }
//! ```

pub use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
pub use tokio::time::{error::Elapsed, interval, sleep, sleep_until, timeout, Interval, Sleep};

use crate::sync::CancellationToken;

/// Sleeps for `duration` unless `token` is cancelled first.
///
/// Returns `true` when the full duration elapsed and `false` when the sleep
/// was interrupted by cancellation.
pub async fn sleep_or_cancelled(duration: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        _ = sleep(duration) => true,
        _ = token.cancelled() => false,
    }
}
