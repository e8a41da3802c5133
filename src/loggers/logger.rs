//! # Logger trait.
//!
//! Provides [`Logger`] the narrow capability a service logs through.
//!
//! ## Rules
//! - Calls come from both the caller's context and the worker task, possibly at
//!   the same time; implementations must be safe for concurrent use.
//! - Calls are treated as infallible. A sink that can fail handles that internally.
//! - Calls should not block for long: the worker logs from inside its loop.

use std::fmt;

/// Line-oriented logging sink injected into a service.
///
/// Only [`log_fmt`](Logger::log_fmt) is required; [`log`](Logger::log) forwards to it.
pub trait Logger: Send + Sync + 'static {
    /// Writes one formatted line.
    fn log_fmt(&self, args: fmt::Arguments<'_>);

    /// Writes one plain line.
    fn log(&self, line: &str) {
        self.log_fmt(format_args!("{line}"));
    }
}
