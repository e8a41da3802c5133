//! # servicekit
//!
//! **servicekit** runs managed background services: long-lived units of work
//! that tick on their own schedule and can be told to stop exactly once.
//!
//! A foreground caller coordinates with a background worker loop:
//! shutdown is fired exactly once, it is race-free, and the caller can observe
//! it before `stop` returns.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller (process entry point)
//!     │ new(name, logger)   init()   run()            stop() ×N, any thread
//!     ▼                       │        │                 │
//! ┌───────────────────────────┴────────┴─────────────────┴──────────┐
//! │  Service                                                        │
//! │  - name, Arc<dyn Logger>, ServiceConfig                         │
//! │  - ShutdownGuard { state lock, fired flag, stop signal }        │
//! │  - WorkerExit    { exited token, panic info }                   │
//! └──────┬───────────────────────────────────────┬──────────────────┘
//!        │ spawn (once)                          │ publish
//!        ▼                                       ▼
//!   ┌──────────────┐   heartbeat / stopping   ┌─────────────────┐
//!   │    Worker    │ ───────────────────────► │   Bus (events)  │
//!   │ (tick loop)  │ ──► Logger               └─────────────────┘
//!   └──────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! run() ──► Worker::run()
//!
//! loop {
//!   select! (biased) {
//!     stop signal  ─► log "stopping service"
//!                     lock state → cleanup → unlock
//!                     exit
//!     tick elapsed ─► log "service is running.."
//!   }
//! }
//!
//! stop():
//!   lock state → guard fires signal (first call only) → unlock
//!   log "shutting down: <name>", "shutdown successful"   (every call)
//! ```
//!
//! `stop` does **not** join the worker. Use [`Service::wait_stopped`] or
//! [`Service::stop_and_wait`] when the worker must be gone.
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                   |
//! |-------------------|--------------------------------------------------------------|--------------------------------------|
//! | **Service**       | Init/run/stop lifecycle with exactly-once shutdown.          | [`Service`], [`ServiceBuilder`]      |
//! | **Logging**       | Injected logging capability and ready-made sinks.            | [`Logger`], [`LogWriter`], [`TracingLogger`], [`MemoryLogger`] |
//! | **Events**        | Broadcast lifecycle events with global sequence numbers.     | [`Bus`], [`Event`], [`EventKind`]    |
//! | **Errors**        | Typed errors for building and draining.                      | [`ServiceError`]                     |
//! | **Configuration** | Tick interval, drain grace, bus capacity.                    | [`ServiceConfig`]                    |
//! | **Signals**       | Wait for SIGINT/SIGTERM/SIGQUIT in process entry points.     | [`wait_for_shutdown_signal`]         |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use servicekit::{LogWriter, Service, ServiceConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let svc = Service::builder("example", Arc::new(LogWriter::with_prefix("[service] ")))
//!         .with_config(ServiceConfig::default().with_tick_interval(Duration::from_millis(100)))
//!         .build()?;
//!
//!     svc.init();
//!     svc.run();
//!     tokio::time::sleep(Duration::from_millis(350)).await;
//!
//!     svc.stop();
//!     svc.wait_stopped(Duration::from_secs(1)).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod loggers;

// ---- Public re-exports ----

pub use config::{MIN_TICK, ServiceConfig};
pub use self::core::{
    Service, ServiceBuilder, ServiceState, TerminationSignal, wait_for_shutdown_signal,
};
pub use error::ServiceError;
pub use events::{Bus, Event, EventKind};
pub use loggers::{LogWriter, Logger, MemoryLogger, TracingLogger};
