//! # MemoryLogger — line recorder
//!
//! Keeps every logged line in memory, in the order the calls completed.
//! Meant for assertions in tests and for embedding applications that want to
//! inspect recent output.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::loggers::Logger;

/// Logger recording lines into a vector.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded lines.
    pub fn lines(&self) -> Vec<String> {
        self.guard().clone()
    }

    /// Counts recorded lines equal to `line`.
    pub fn count(&self, line: &str) -> usize {
        self.guard().iter().filter(|l| l.as_str() == line).count()
    }

    /// Counts recorded lines containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.guard().iter().filter(|l| l.contains(needle)).count()
    }

    /// Returns the index of the first line equal to `line`.
    pub fn position(&self, line: &str) -> Option<usize> {
        self.guard().iter().position(|l| l.as_str() == line)
    }

    /// Drops all recorded lines.
    pub fn clear(&self) {
        self.guard().clear();
    }

    fn guard(&self) -> MutexGuard<'_, Vec<String>> {
        // A panicking writer cannot leave a half-pushed line behind.
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Logger for MemoryLogger {
    fn log_fmt(&self, args: fmt::Arguments<'_>) {
        let line = args.to_string();
        self.guard().push(line);
    }
}
