//! # Worker: the background loop started by `Service::run`.
//!
//! ## Loop
//! ```text
//! Worker::into_task()          drop guard armed on WorkerExit::exited before spawn
//!   └─► Worker::run()          (guard fires however the future ends, even unpolled)
//!         catch_unwind(run_loop):
//!         loop {
//!           select! (biased) {
//!             stop signal ─► log "stopping service"
//!                            ├─► publish WorkerStopping
//!                            ├─► lock state → cleanup → unlock
//!                            └─► return
//!             sleep(tick) ─► log "service is running.."
//!                            └─► publish Heartbeat, loop
//!           }
//!         }
//!       on panic ─► record info, publish WorkerPanicked, log it
//!   publish WorkerExited
//! ```
//!
//! ## Rules
//! - The select is **biased** toward the stop signal: once the signal is fired,
//!   the next poll always takes the stop branch even if a tick is also ready.
//! - A heartbeat whose branch body is already executing when `stop` fires on another
//!   thread completes first. At most one such heartbeat follows a stop.
//! - Cancellation is cooperative. Nothing aborts the task from outside.
//! - A runtime that shuts down and drops the task still marks the worker as exited.
//! - A panic ends the worker for good; later `stop` calls get no `stopping service` line.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures::FutureExt;
use tokio::{select, time};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::core::guard::ShutdownGuard;
use crate::events::{Bus, Event, EventKind};
use crate::loggers::Logger;

/// Line logged on every tick.
pub(crate) const HEARTBEAT_LINE: &str = "service is running..";
/// Line logged once when the worker observes the stop signal.
pub(crate) const STOPPING_LINE: &str = "stopping service";

/// Exit record shared between the worker and the service's drain path.
#[derive(Debug, Default)]
pub(crate) struct WorkerExit {
    exited: CancellationToken,
    panic: OnceLock<String>,
}

impl WorkerExit {
    /// Resolves once the worker task has ended, for any reason.
    pub(crate) async fn wait(&self) {
        self.exited.cancelled().await;
    }

    /// Returns a guard that marks the worker as exited when dropped.
    fn arm(&self) -> DropGuard {
        self.exited.clone().drop_guard()
    }

    pub(crate) fn has_exited(&self) -> bool {
        self.exited.is_cancelled()
    }

    /// Panic info, if the worker ended by panicking.
    pub(crate) fn panic_info(&self) -> Option<&str> {
        self.panic.get().map(String::as_str)
    }
}

/// State moved into the spawned worker task.
pub(crate) struct Worker {
    pub(crate) name: Arc<str>,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) bus: Bus,
    pub(crate) shutdown: Arc<ShutdownGuard>,
    pub(crate) tick: Duration,
    pub(crate) exit: Arc<WorkerExit>,
}

impl Worker {
    /// Turns the worker into the future to spawn.
    ///
    /// The exit guard is armed here, before the runtime ever sees the future, so
    /// dropping it unpolled (runtime shutdown) still records the exit.
    pub(crate) fn into_task(self) -> impl Future<Output = ()> + Send + 'static {
        let exited = self.exit.arm();
        async move {
            let _exited = exited;
            self.run().await;
        }
    }

    /// Runs until the stop signal is observed or the loop panics.
    async fn run(self) {
        if let Err(payload) = AssertUnwindSafe(self.run_loop()).catch_unwind().await {
            let info = panic_message(&*payload);
            let _ = self.exit.panic.set(info.clone());
            self.publish(EventKind::WorkerPanicked, Some(info.as_str()));
            self.logger
                .log_fmt(format_args!("worker of {} panicked: {}", self.name, info));
        }

        self.publish(EventKind::WorkerExited, None);
    }

    async fn run_loop(&self) {
        let stop = self.shutdown.signal();
        loop {
            select! {
                biased;

                _ = stop.cancelled() => {
                    self.logger.log(STOPPING_LINE);
                    self.publish(EventKind::WorkerStopping, None);
                    self.cleanup();
                    return;
                }
                _ = time::sleep(self.tick) => {
                    self.logger.log(HEARTBEAT_LINE);
                    self.publish(EventKind::Heartbeat, None);
                }
            }
        }
    }

    /// Loop-local cleanup, serialized against `Service::stop`.
    fn cleanup(&self) {
        let _state = self.shutdown.lock_state();
        // Nothing loop-local outlives the loop yet.
    }

    fn publish(&self, kind: EventKind, reason: Option<&str>) {
        let mut ev = Event::new(kind).with_service(Arc::clone(&self.name));
        if let Some(reason) = reason {
            ev = ev.with_reason(reason);
        }
        self.bus.publish(ev);
    }
}

/// Renders a panic payload as text.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
