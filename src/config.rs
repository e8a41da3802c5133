//! # Service configuration.
//!
//! Provides [`ServiceConfig`] the settings a [`Service`](crate::Service) reads at construction.
//!
//! ## Sentinel values
//! - `tick_interval = 0s` → clamped to [`MIN_TICK`] (a zero interval would spin the executor)
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

/// Smallest tick interval the worker loop will honour.
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// Per-service configuration.
///
/// ## Field semantics
/// - `tick_interval`: delay between heartbeats of the worker loop
/// - `grace`: how long [`Service::stop_and_wait`](crate::Service::stop_and_wait) waits for the worker to drain
/// - `bus_capacity`: ring buffer size of the event bus created for the service (min 1)
///
/// All fields are public; prefer the accessors below over sprinkling sentinel checks.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Interval between worker heartbeats.
    pub tick_interval: Duration,

    /// Maximum time to wait for the worker to exit after the stop signal fired.
    pub grace: Duration,

    /// Capacity of the lifecycle event bus.
    ///
    /// Only used when the service creates its own bus; a shared bus passed to
    /// the builder keeps whatever capacity it was created with.
    pub bus_capacity: usize,
}

impl ServiceConfig {
    /// Returns the tick interval, never shorter than [`MIN_TICK`].
    #[inline]
    pub fn tick_interval_clamped(&self) -> Duration {
        self.tick_interval.max(MIN_TICK)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a copy with a different tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, tick: Duration) -> Self {
        self.tick_interval = tick;
        self
    }

    /// Returns a copy with a different drain grace period.
    #[must_use]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }
}

impl Default for ServiceConfig {
    /// Default configuration:
    ///
    /// - `tick_interval = 1s`
    /// - `grace = 5s`
    /// - `bus_capacity = 64`
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            grace: Duration::from_secs(5),
            bus_capacity: 64,
        }
    }
}
