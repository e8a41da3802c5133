//! # LogWriter — simple line printer
//!
//! A minimal [`Logger`] that prints lines to stdout behind a fixed prefix.
//!
//! ## Example output
//! ```text
//! [service] initializing : VIS service
//! [service] service is running..
//! [service] shutting down: VIS service
//! [service] shutdown successful
//! [service] stopping service
//! ```

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

use crate::loggers::Logger;

/// Stdout writer with a line prefix.
#[derive(Debug, Default, Clone)]
pub struct LogWriter {
    prefix: Cow<'static, str>,
}

impl LogWriter {
    /// Construct a writer without prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a writer that prepends `prefix` to every line.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<Cow<'static, str>>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn write_line(&self, out: &mut impl Write, args: fmt::Arguments<'_>) -> io::Result<()> {
        writeln!(out, "{}{}", self.prefix(), args)
    }
}

impl Logger for LogWriter {
    fn log_fmt(&self, args: fmt::Arguments<'_>) {
        // stdout going away (closed pipe) is not the service's problem.
        let _ = self.write_line(&mut io::stdout().lock(), args);
    }
}
