//! # One-time shutdown guard.
//!
//! [`ShutdownGuard`] bundles the three pieces of shutdown state every service owns:
//! - the **stop signal** (a [`CancellationToken`]),
//! - the **fired flag** making the signal single-use,
//! - the **state lock** serializing `stop` against the worker's cleanup path.
//!
//! ## Rules
//! - [`fire`](ShutdownGuard::fire) returns `true` for exactly one caller over the guard's lifetime.
//! - The flag is swapped and the token cancelled while the state lock is held.
//! - The state lock is never held across an `.await` and never nested.
//! - The lock guards no data yet; callers take it to keep the acquisition order
//!   in place for state that `stop` and the worker cleanup will share.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

/// Single-fire stop signal with its mutual-exclusion region.
#[derive(Debug)]
pub(crate) struct ShutdownGuard {
    state: Mutex<()>,
    fired: AtomicBool,
    signal: CancellationToken,
}

impl ShutdownGuard {
    /// Creates a guard around a fresh, unfired signal.
    pub(crate) fn new(signal: CancellationToken) -> Self {
        Self {
            state: Mutex::new(()),
            fired: AtomicBool::new(false),
            signal,
        }
    }

    /// Fires the stop signal unless it was fired before.
    ///
    /// Returns `true` only for the call that actually fired it.
    pub(crate) fn fire(&self) -> bool {
        let _state = self.lock_state();
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.signal.cancel();
        true
    }

    /// Acquires the state lock.
    ///
    /// Poisoning is ignored: the region holds no data that a panic could leave half-written.
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, ()> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True once [`fire`](Self::fire) succeeded.
    pub(crate) fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// True once the signal is cancelled, either by [`fire`](Self::fire) or by a parent token.
    pub(crate) fn is_signalled(&self) -> bool {
        self.signal.is_cancelled()
    }

    /// The stop signal observed by the worker.
    pub(crate) fn signal(&self) -> &CancellationToken {
        &self.signal
    }
}
