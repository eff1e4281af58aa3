//! Test support utilities
//!
//! [`CaptureLogger`] keeps every line in memory so tests can assert on what
//! was logged without touching the filesystem.

use crate::{Level, Logger, Record};
use parking_lot::Mutex;
use std::fmt::Write as FmtWrite;
use std::sync::Arc;

/// A logger that captures all logs in memory for testing
#[derive(Clone)]
pub struct CaptureLogger {
    logs: Arc<Mutex<String>>,
    min_level: Level,
}

impl CaptureLogger {
    /// Create a new capture logger
    #[must_use]
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(String::new())),
            min_level: Level::Debug,
        }
    }

    /// Create with a specific level
    #[must_use]
    pub const fn with_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Get all captured logs
    #[must_use]
    pub fn logs(&self) -> String {
        self.logs.lock().clone()
    }

    /// Clear captured logs
    pub fn clear(&self) {
        self.logs.lock().clear();
    }

    /// Check if logs contain a specific string
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.logs.lock().contains(text)
    }
}

impl Default for CaptureLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for CaptureLogger {
    fn log(&self, record: Record) {
        if !self.is_enabled(record.level) {
            return;
        }

        let _ = writeln!(
            self.logs.lock(),
            "[{:<5}] {}",
            record.level,
            record.message
        );
    }

    fn flush(&self) {
        // No-op for in-memory logger
    }

    #[inline(always)]
    fn is_enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }
}

