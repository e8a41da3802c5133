//! # TracingLogger — adapter onto `tracing`
//!
//! Forwards every line to [`tracing::info!`] with the configured label attached
//! as the `logger` field. Installing a subscriber (e.g. `tracing-subscriber`)
//! is left to the embedding application.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::loggers::Logger;

/// Logger that emits `tracing` events.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    label: Arc<str>,
}

impl TracingLogger {
    /// Creates an adapter tagging events with `label`.
    #[must_use]
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Returns the label attached to every event.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Logger for TracingLogger {
    fn log_fmt(&self, args: fmt::Arguments<'_>) {
        info!(logger = %self.label, "{}", args);
    }
}
