//! # Event Bus System
//!
//! Typed events published by the sync core over a `tokio::sync::broadcast`
//! channel. Hosts subscribe to drive dashboards or health checks without the
//! core knowing about them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     emit      ┌───────────┐     subscribe    ┌────────────┐
//! │ Coordinator  ├──────────────>│ EventBus  ├─────────────────>│ Subscriber │
//! └──────────────┘               │ (broadcast│                  └────────────┘
//! ┌──────────────┐     emit      │  channel) │     subscribe    ┌────────────┐
//! │ Service loop ├──────────────>│           ├─────────────────>│ Subscriber │
//! └──────────────┘               └───────────┘                  └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, CycleId, EventBus, SyncEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Sync(SyncEvent::TvSkipped {
//!         cycle_id: CycleId::new(),
//!         tv: "192.168.1.20".to_string(),
//!         reason: "unreachable".to_string(),
//!     }))
//!     .ok();
//!
//! assert!(subscriber.try_recv().is_ok());
//! ```
//!
//! Emitting with no subscribers returns an error that publishers ignore.

use serde::{Deserialize, Serialize};
use std::fmt;
use core_async::sync::broadcast::{self, error::SendError, Receiver};
use uuid::Uuid;

/// Default buffer size for the event bus.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 256;

/// Identifier of a single sync cycle, shared by every event it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleId(Uuid);

impl CycleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Sync cycle progress
    Sync(SyncEvent),
    /// Service lifecycle
    Service(ServiceEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Sync(e) => e.description(),
            CoreEvent::Service(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Sync(SyncEvent::TvFailed { .. }) => EventSeverity::Error,
            CoreEvent::Sync(SyncEvent::ScanFailed { .. }) => EventSeverity::Error,
            CoreEvent::Sync(SyncEvent::TvSkipped { .. }) => EventSeverity::Warning,
            CoreEvent::Sync(SyncEvent::CycleCompleted { .. }) => EventSeverity::Info,
            CoreEvent::Service(_) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Sync Events
// ============================================================================

/// Events emitted while reconciling TVs with the artwork directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SyncEvent {
    /// A cycle began.
    CycleStarted {
        cycle_id: CycleId,
        /// Number of configured TVs.
        tv_count: usize,
    },
    /// The artwork directory could not be read; every TV is skipped.
    ScanFailed { cycle_id: CycleId, message: String },
    /// A TV was not processed this cycle.
    TvSkipped {
        cycle_id: CycleId,
        tv: String,
        reason: String,
    },
    /// A TV was reconciled (possibly with per-item failures).
    TvSynced {
        cycle_id: CycleId,
        tv: String,
        uploaded: usize,
        deleted: usize,
        unchanged: usize,
        failed: usize,
    },
    /// A TV stopped mid-reconciliation.
    TvFailed {
        cycle_id: CycleId,
        tv: String,
        message: String,
    },
    /// Every TV has been handled.
    CycleCompleted {
        cycle_id: CycleId,
        synced: usize,
        skipped: usize,
        failed: usize,
        duration_ms: u64,
    },
}

impl SyncEvent {
    fn description(&self) -> &str {
        match self {
            SyncEvent::CycleStarted { .. } => "Sync cycle started",
            SyncEvent::ScanFailed { .. } => "Artwork directory scan failed",
            SyncEvent::TvSkipped { .. } => "TV skipped",
            SyncEvent::TvSynced { .. } => "TV synced",
            SyncEvent::TvFailed { .. } => "TV sync failed",
            SyncEvent::CycleCompleted { .. } => "Sync cycle completed",
        }
    }
}

// ============================================================================
// Service Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ServiceEvent {
    Started {
        tv_count: usize,
        interval_minutes: u64,
    },
    Stopped {
        cycles_run: u64,
    },
}

impl ServiceEvent {
    fn description(&self) -> &str {
        match self {
            ServiceEvent::Started { .. } => "Service started",
            ServiceEvent::Stopped { .. } => "Service stopped",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Cloning is cheap; all clones share the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   A subscriber that falls further behind receives `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
