//! # Logger capability and built-in sinks.
//!
//! A [`Service`](crate::Service) never owns a logging backend. It receives an
//! `Arc<dyn Logger>` at construction and writes every observable line through it.
//!
//! ## Architecture
//! ```text
//! Service::init/stop ──┐
//!                      ├──► Arc<dyn Logger> ──► LogWriter     (stdout, prefixed)
//! worker loop ─────────┘                    ├─► TracingLogger (tracing::info!)
//!                                           └─► MemoryLogger  (tests)
//! ```
//!
//! ## Implementing custom loggers
//! ```no_run
//! use std::fmt;
//! use servicekit::Logger;
//!
//! struct Stderr;
//!
//! impl Logger for Stderr {
//!     fn log_fmt(&self, args: fmt::Arguments<'_>) {
//!         eprintln!("{args}");
//!     }
//! }
//! ```

mod logger;
mod memory;
mod trace;
mod writer;

pub use logger::Logger;
pub use memory::MemoryLogger;
pub use trace::TracingLogger;
pub use writer::LogWriter;
