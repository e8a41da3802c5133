//! # Service: a managed background unit with exactly-once shutdown.
//!
//! A [`Service`] owns a name, an injected [`Logger`], a single-use stop signal and
//! the state lock serializing shutdown. It exposes three infallible lifecycle calls
//! plus an explicit drain.
//!
//! ## Lifecycle
//! ```text
//! Service::new(name, logger)            stop signal allocated, nothing spawned
//!   ├─► init()        log "initializing : <name>"            (optional, repeatable)
//!   ├─► run()         spawn Worker, return immediately      (idempotent)
//!   │                   └─► worker ticks until the signal fires
//!   ├─► stop()        lock state → guard.fire() → unlock
//!   │                 log "shutting down: <name>", "shutdown successful"
//!   │                 (every call; the signal fires once)
//!   └─► wait_stopped(grace)   join the worker, bounded by `grace`
//! ```
//!
//! ## `stop` does not join
//! `stop` returns as soon as the signal is delivered. The worker observes it
//! *eventually*; its `stopping service` line may appear after `stop` returned.
//! Callers that need the worker gone must call [`Service::wait_stopped`]
//! (or [`Service::stop_and_wait`]).
//!
//! ## Concurrency
//! - `Service` is `Send + Sync`; wrap it in an `Arc` to call `stop` from several threads.
//! - `stop` never awaits and can be called from synchronous code, including `Drop`.
//! - Log order between concurrent `stop` callers is unspecified.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::{runtime::Handle, time};
use tokio_util::sync::CancellationToken;

use crate::config::ServiceConfig;
use crate::core::builder::ServiceBuilder;
use crate::core::guard::ShutdownGuard;
use crate::core::worker::{Worker, WorkerExit};
use crate::error::ServiceError;
use crate::events::{Bus, Event, EventKind};
use crate::loggers::Logger;

/// Coarse lifecycle position of a service, derived from its shutdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Built, `init` not called yet.
    Constructed,
    /// `init` called, no worker spawned.
    Initialized,
    /// Worker spawned and no stop requested.
    Running,
    /// Stop requested, worker still alive.
    Stopping,
    /// Stop requested and no worker alive (never started, or exited).
    Stopped,
}

/// A managed background service.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use servicekit::{MemoryLogger, Service};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let log = Arc::new(MemoryLogger::new());
///     let svc = Service::new("example", log.clone());
///
///     svc.init();
///     svc.run();
///     svc.stop();
///     svc.wait_stopped(std::time::Duration::from_secs(1)).await.unwrap();
///
///     assert_eq!(log.count("stopping service"), 1);
/// }
/// ```
pub struct Service {
    name: Arc<str>,
    logger: Arc<dyn Logger>,
    cfg: ServiceConfig,
    bus: Bus,
    shutdown: Arc<ShutdownGuard>,
    initialized: AtomicBool,
    spawned: AtomicBool,
    exit: Arc<WorkerExit>,
}

impl Service {
    /// Creates a service with default configuration and a private event bus.
    ///
    /// Allocates the stop signal; nothing is spawned and nothing is logged.
    pub fn new(name: impl Into<Arc<str>>, logger: Arc<dyn Logger>) -> Self {
        let cfg = ServiceConfig::default();
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::from_parts(name.into(), logger, cfg, bus, CancellationToken::new())
    }

    /// Starts a [`ServiceBuilder`] for a service with custom config, bus or parent token.
    pub fn builder(name: impl Into<Arc<str>>, logger: Arc<dyn Logger>) -> ServiceBuilder {
        ServiceBuilder::new(name, logger)
    }

    pub(crate) fn from_parts(
        name: Arc<str>,
        logger: Arc<dyn Logger>,
        cfg: ServiceConfig,
        bus: Bus,
        signal: CancellationToken,
    ) -> Self {
        Self {
            name,
            logger,
            cfg,
            bus,
            shutdown: Arc::new(ShutdownGuard::new(signal)),
            initialized: AtomicBool::new(false),
            spawned: AtomicBool::new(false),
            exit: Arc::new(WorkerExit::default()),
        }
    }

    /// Logs readiness. Does not start the worker.
    pub fn init(&self) {
        self.initialized.store(true, Ordering::Release);
        self.logger
            .log_fmt(format_args!("initializing : {}", self.name));
        self.publish(Event::new(EventKind::Initialized));
    }

    /// Spawns the worker loop on the current tokio runtime and returns immediately.
    ///
    /// Only the first successful call spawns; later calls log and do nothing.
    /// Without a runtime the call is logged and ignored (a later call inside a
    /// runtime can still start the worker).
    pub fn run(&self) {
        let Ok(handle) = Handle::try_current() else {
            self.ignore_run(format_args!(
                "cannot run {}: no tokio runtime available",
                self.name
            ));
            return;
        };
        if self.spawned.swap(true, Ordering::AcqRel) {
            self.ignore_run(format_args!(
                "run ignored: worker of {} already started",
                self.name
            ));
            return;
        }

        let worker = Worker {
            name: Arc::clone(&self.name),
            logger: Arc::clone(&self.logger),
            bus: self.bus.clone(),
            shutdown: Arc::clone(&self.shutdown),
            tick: self.cfg.tick_interval_clamped(),
            exit: Arc::clone(&self.exit),
        };
        self.publish(Event::new(EventKind::Started));
        // Detached: the exit record, not the join handle, tracks termination.
        drop(handle.spawn(worker.into_task()));
    }

    /// Requests shutdown.
    ///
    /// Fires the stop signal through the one-time guard (at most once per service),
    /// then logs the shutdown confirmation. Safe to call any number of times from
    /// any number of threads, before or after `run`. Does not wait for the worker.
    pub fn stop(&self) {
        self.publish(Event::new(EventKind::StopRequested));
        if self.shutdown.fire() {
            self.publish(Event::new(EventKind::StopSignalFired));
        }
        self.logger
            .log_fmt(format_args!("shutting down: {}", self.name));
        self.logger.log("shutdown successful");
    }

    /// Waits up to `grace` for the worker task to exit.
    ///
    /// Returns `Ok(())` immediately if no worker was ever spawned.
    /// This does not request shutdown; pair it with [`stop`](Self::stop).
    ///
    /// ### Errors
    /// - [`ServiceError::GraceExceeded`] if the worker is still alive after `grace`.
    /// - [`ServiceError::WorkerPanicked`] if the worker ended by panicking.
    pub async fn wait_stopped(&self, grace: Duration) -> Result<(), ServiceError> {
        if !self.spawned.load(Ordering::Acquire) {
            return Ok(());
        }
        if time::timeout(grace, self.exit.wait()).await.is_err() {
            return Err(ServiceError::GraceExceeded {
                service: self.name.to_string(),
                grace,
            });
        }
        match self.exit.panic_info() {
            Some(info) => Err(ServiceError::WorkerPanicked {
                service: self.name.to_string(),
                info: info.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// [`stop`](Self::stop), then [`wait_stopped`](Self::wait_stopped) with the configured grace.
    pub async fn stop_and_wait(&self) -> Result<(), ServiceError> {
        self.stop();
        self.wait_stopped(self.cfg.grace).await
    }

    /// Service name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration the service was built with.
    pub fn config(&self) -> &ServiceConfig {
        &self.cfg
    }

    /// Bus the service publishes lifecycle events to.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// True once the stop signal is delivered (by `stop` or by a parent token).
    pub fn is_stop_requested(&self) -> bool {
        self.shutdown.is_signalled()
    }

    /// True while a spawned worker has not exited.
    pub fn is_running(&self) -> bool {
        self.spawned.load(Ordering::Acquire) && !self.exit.has_exited()
    }

    /// Current lifecycle position.
    pub fn state(&self) -> ServiceState {
        let spawned = self.spawned.load(Ordering::Acquire);
        let alive = spawned && !self.exit.has_exited();
        match (self.is_stop_requested(), alive) {
            (true, true) => ServiceState::Stopping,
            (true, false) => ServiceState::Stopped,
            (false, true) => ServiceState::Running,
            // A worker that exited without a stop can only have panicked.
            (false, false) if spawned => ServiceState::Stopped,
            (false, false) if self.initialized.load(Ordering::Acquire) => {
                ServiceState::Initialized
            }
            (false, false) => ServiceState::Constructed,
        }
    }

    fn ignore_run(&self, args: std::fmt::Arguments<'_>) {
        let reason = args.to_string();
        self.logger.log(&reason);
        self.publish(Event::new(EventKind::RunIgnored).with_reason(reason));
    }

    fn publish(&self, ev: Event) {
        self.bus.publish(ev.with_service(Arc::clone(&self.name)));
    }
}

impl Drop for Service {
    /// Fires the stop signal so a detached worker cannot outlive its service.
    ///
    /// Silent: the shutdown confirmation lines belong to explicit `stop` calls.
    fn drop(&mut self) {
        if self.shutdown.fire() {
            self.publish(Event::new(EventKind::StopSignalFired));
        }
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::worker::{HEARTBEAT_LINE, STOPPING_LINE};
    use crate::loggers::MemoryLogger;
    use std::fmt;
    use std::time::Instant;
    use tokio::sync::broadcast;

    const SHUTTING_DOWN: &str = "shutting down: example";
    const SHUTDOWN_OK: &str = "shutdown successful";

    fn service(log: &Arc<MemoryLogger>) -> Service {
        Service::new("example", log.clone())
    }

    fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    fn count(events: &[Event], kind: EventKind) -> usize {
        events.iter().filter(|e| e.kind == kind).count()
    }

    #[test]
    fn test_init_logs_one_line() {
        let log = Arc::new(MemoryLogger::new());
        let svc = service(&log);
        assert_eq!(svc.state(), ServiceState::Constructed);

        svc.init();

        assert_eq!(log.lines(), vec!["initializing : example".to_string()]);
        assert_eq!(svc.state(), ServiceState::Initialized);
        assert!(!svc.is_running());
        assert!(!svc.is_stop_requested());
    }

    #[test]
    fn test_stop_before_run_without_runtime() {
        let log = Arc::new(MemoryLogger::new());
        let svc = service(&log);

        svc.stop();
        svc.stop();

        assert!(svc.is_stop_requested());
        assert_eq!(svc.state(), ServiceState::Stopped);
        assert_eq!(log.count(SHUTTING_DOWN), 2);
        assert_eq!(log.count(SHUTDOWN_OK), 2);
        assert_eq!(log.count(STOPPING_LINE), 0);
    }

    #[test]
    fn test_run_without_runtime_is_logged() {
        let log = Arc::new(MemoryLogger::new());
        let svc = service(&log);

        svc.run();

        assert_eq!(log.count_containing("no tokio runtime"), 1);
        assert!(!svc.is_running());
        assert_eq!(svc.state(), ServiceState::Constructed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_example_scenario() {
        let log = Arc::new(MemoryLogger::new());
        let svc = service(&log);
        let mut rx = svc.bus().subscribe();

        svc.init();
        svc.run();
        assert_eq!(svc.state(), ServiceState::Running);

        time::sleep(Duration::from_millis(1100)).await;
        assert!(log.count(HEARTBEAT_LINE) >= 1);

        svc.stop();
        svc.stop();
        svc.wait_stopped(Duration::from_secs(1))
            .await
            .expect("worker drains");

        assert_eq!(log.lines()[0], "initializing : example");
        let first_down = log.position(SHUTTING_DOWN).expect("shutting down logged");
        assert_eq!(log.lines()[first_down + 1], SHUTDOWN_OK);
        assert_eq!(log.count(SHUTTING_DOWN), 2);
        assert_eq!(log.count(SHUTDOWN_OK), 2);
        assert_eq!(log.count(STOPPING_LINE), 1);
        assert_eq!(svc.state(), ServiceState::Stopped);

        let events = drain(&mut rx);
        assert_eq!(count(&events, EventKind::StopRequested), 2);
        assert_eq!(count(&events, EventKind::StopSignalFired), 1);
        assert_eq!(count(&events, EventKind::WorkerStopping), 1);
        assert_eq!(count(&events, EventKind::WorkerExited), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_stop_fires_once() {
        let log = Arc::new(MemoryLogger::new());
        let svc = Arc::new(service(&log));
        let mut rx = svc.bus().subscribe();
        svc.run();

        std::thread::scope(|s| {
            for _ in 0..16 {
                let svc = Arc::clone(&svc);
                s.spawn(move || svc.stop());
            }
        });
        svc.wait_stopped(Duration::from_secs(5))
            .await
            .expect("worker drains");

        assert_eq!(log.count(SHUTTING_DOWN), 16);
        assert_eq!(log.count(SHUTDOWN_OK), 16);
        assert_eq!(log.count(STOPPING_LINE), 1);

        let events = drain(&mut rx);
        assert_eq!(count(&events, EventKind::StopRequested), 16);
        assert_eq!(count(&events, EventKind::StopSignalFired), 1);
        assert_eq!(count(&events, EventKind::WorkerStopping), 1);
    }

    #[tokio::test]
    async fn test_stop_does_not_wait_for_tick() {
        let log = Arc::new(MemoryLogger::new());
        let svc = Service::builder("example", log.clone())
            .with_config(ServiceConfig::default().with_tick_interval(Duration::from_secs(3600)))
            .build()
            .expect("valid service");
        svc.run();
        tokio::task::yield_now().await;

        let started = Instant::now();
        svc.stop();
        assert!(started.elapsed() < Duration::from_secs(1));

        svc.wait_stopped(Duration::from_secs(5))
            .await
            .expect("worker drains without waiting for the hour-long tick");
        assert_eq!(log.count(HEARTBEAT_LINE), 0);
        assert_eq!(log.count(STOPPING_LINE), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_heartbeat_after_stop() {
        let log = Arc::new(MemoryLogger::new());
        let svc = service(&log);
        svc.run();

        time::sleep(Duration::from_millis(1500)).await;
        svc.stop();
        svc.wait_stopped(Duration::from_secs(1))
            .await
            .expect("worker drains");
        let beats = log.count(HEARTBEAT_LINE);
        assert_eq!(beats, 1);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(log.count(HEARTBEAT_LINE), beats);
        let stop_at = log.position(STOPPING_LINE).expect("worker stopped");
        assert!(
            log.lines()[stop_at..]
                .iter()
                .all(|l| l.as_str() != HEARTBEAT_LINE)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_is_idempotent() {
        let log = Arc::new(MemoryLogger::new());
        let svc = service(&log);
        let mut rx = svc.bus().subscribe();

        svc.run();
        svc.run();
        time::sleep(Duration::from_millis(1500)).await;

        // Two workers would have logged two heartbeats by now.
        assert_eq!(log.count(HEARTBEAT_LINE), 1);
        assert_eq!(log.count_containing("already started"), 1);

        svc.stop();
        svc.wait_stopped(Duration::from_secs(1))
            .await
            .expect("worker drains");
        assert_eq!(log.count(STOPPING_LINE), 1);

        let events = drain(&mut rx);
        assert_eq!(count(&events, EventKind::Started), 1);
        assert_eq!(count(&events, EventKind::RunIgnored), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_after_stop_exits_immediately() {
        let log = Arc::new(MemoryLogger::new());
        let svc = service(&log);

        svc.stop();
        svc.run();
        svc.wait_stopped(Duration::from_secs(1))
            .await
            .expect("worker drains");

        assert_eq!(log.count(HEARTBEAT_LINE), 0);
        assert_eq!(log.count(STOPPING_LINE), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_services_stop_independently() {
        let log_a = Arc::new(MemoryLogger::new());
        let log_b = Arc::new(MemoryLogger::new());
        let a = Service::new("a", log_a.clone());
        let b = Service::new("b", log_b.clone());
        a.run();
        b.run();

        a.stop();
        a.wait_stopped(Duration::from_secs(1))
            .await
            .expect("a drains");
        time::sleep(Duration::from_millis(2500)).await;

        assert!(!b.is_stop_requested());
        assert_eq!(b.state(), ServiceState::Running);
        assert_eq!(log_b.count(HEARTBEAT_LINE), 2);
        assert_eq!(log_a.count(HEARTBEAT_LINE), 0);

        b.stop();
        b.wait_stopped(Duration::from_secs(1))
            .await
            .expect("b drains");
        assert_eq!(log_a.count(STOPPING_LINE), 1);
        assert_eq!(log_b.count(STOPPING_LINE), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_without_stop_exceeds_grace() {
        let log = Arc::new(MemoryLogger::new());
        let svc = service(&log);
        svc.run();

        let err = svc
            .wait_stopped(Duration::from_secs(2))
            .await
            .expect_err("worker keeps running");
        assert_eq!(
            err,
            ServiceError::GraceExceeded {
                service: "example".into(),
                grace: Duration::from_secs(2),
            }
        );
        assert_eq!(svc.state(), ServiceState::Running);

        svc.stop_and_wait().await.expect("worker drains");
        assert_eq!(svc.state(), ServiceState::Stopped);
    }

    #[tokio::test]
    async fn test_wait_without_run_is_immediate() {
        let log = Arc::new(MemoryLogger::new());
        let svc = service(&log);
        svc.wait_stopped(Duration::ZERO)
            .await
            .expect("nothing to drain");
    }

    struct BrokenHeartbeat(MemoryLogger);

    impl Logger for BrokenHeartbeat {
        fn log_fmt(&self, args: fmt::Arguments<'_>) {
            let line = args.to_string();
            if line == HEARTBEAT_LINE {
                panic!("heartbeat sink broke");
            }
            self.0.log(&line);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_panic_is_contained() {
        let logger = Arc::new(BrokenHeartbeat(MemoryLogger::new()));
        let svc = Service::new("example", logger.clone());
        svc.run();

        let err = svc
            .wait_stopped(Duration::from_secs(5))
            .await
            .expect_err("worker panicked");
        assert_eq!(err.as_label(), "service_worker_panicked");
        assert_eq!(
            logger.0.count("worker of example panicked: heartbeat sink broke"),
            1
        );
        assert_eq!(svc.state(), ServiceState::Stopped);

        // Stopping a service whose worker already died is still a clean no-op:
        // nothing is left to log "stopping service".
        svc.stop();
        assert_eq!(logger.0.count(SHUTDOWN_OK), 1);
        assert_eq!(logger.0.count(STOPPING_LINE), 0);
        assert_eq!(svc.state(), ServiceState::Stopped);
    }

    #[test]
    fn test_runtime_shutdown_before_first_poll_marks_worker_exited() {
        let log = Arc::new(MemoryLogger::new());
        let svc = service(&log);

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime builds");
        // `block_on` returns before the spawned worker is ever polled.
        rt.block_on(async { svc.run() });
        drop(rt);

        assert!(!svc.is_running());
        assert_eq!(svc.state(), ServiceState::Stopped);

        svc.stop();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime builds");
        rt.block_on(svc.wait_stopped(Duration::from_millis(200)))
            .expect("dropped worker counts as exited");
        assert_eq!(log.count(STOPPING_LINE), 0);
        assert_eq!(log.count(HEARTBEAT_LINE), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_worker() {
        let log = Arc::new(MemoryLogger::new());
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let svc = Service::builder("example", log.clone())
            .with_bus(bus)
            .build()
            .expect("valid service");
        svc.run();
        drop(svc);

        let exited = time::timeout(Duration::from_secs(1), async {
            loop {
                match rx.recv().await {
                    Ok(ev) if ev.kind == EventKind::WorkerExited => break,
                    Ok(_) => continue,
                    Err(e) => panic!("bus closed early: {e}"),
                }
            }
        })
        .await;

        assert!(exited.is_ok());
        assert_eq!(log.count(STOPPING_LINE), 1);
        assert_eq!(log.count(SHUTDOWN_OK), 0);
    }
}
