//! # Lifecycle events emitted by services and their workers.
//!
//! The [`EventKind`] enum classifies events across two sources:
//! - **Controller events**: emitted from the caller's context (`init`, `run`, `stop`)
//! - **Worker events**: emitted from inside the background worker
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the order when events of several services share one bus.
//!
//! ## Example
//! ```rust
//! use servicekit::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::WorkerPanicked)
//!     .with_service("ingest")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::WorkerPanicked);
//! assert_eq!(ev.service.as_deref(), Some("ingest"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Controller events ===
    /// `init` was called.
    Initialized,

    /// `run` spawned the worker.
    Started,

    /// `run` was called again (or without a runtime) and did nothing.
    ///
    /// Sets:
    /// - `reason`: why the call was ignored
    RunIgnored,

    /// `stop` was called. Published on **every** call.
    StopRequested,

    /// The one-time guard fired the stop signal. Published at most once per service.
    StopSignalFired,

    // === Worker events ===
    /// Periodic tick elapsed while no stop was pending.
    Heartbeat,

    /// Worker observed the stop signal and is cleaning up.
    WorkerStopping,

    /// Worker terminated (normally or after a panic).
    WorkerExited,

    /// Worker panicked; it will not run again.
    ///
    /// Sets:
    /// - `reason`: panic payload rendered as text
    WorkerPanicked,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the emitting service.
    pub service: Option<Arc<str>>,
    /// Human-readable detail (panic info, ignore reason).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            service: None,
            reason: None,
        }
    }

    /// Attaches the emitting service name.
    #[inline]
    pub fn with_service(mut self, service: impl Into<Arc<str>>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for events published from inside the worker task.
    #[inline]
    pub fn is_worker_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::Heartbeat
                | EventKind::WorkerStopping
                | EventKind::WorkerExited
                | EventKind::WorkerPanicked
        )
    }
}
