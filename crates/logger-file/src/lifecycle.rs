//! Start and end of logging.

use crate::writer::LogWriter;

/// Initializes logging on creation and shuts it down when dropped.
///
/// ```no_run
/// let _guard = proven_logger_file::LoggerGuard::new();
/// let _ = proven_logger_file::info_log!("/var/log/app.log", "running");
/// // everything is flushed when `_guard` goes out of scope
/// ```
#[must_use = "logging shuts down as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoggerGuard<'a> {
    writer: &'a LogWriter,
}

impl LoggerGuard<'static> {
    /// Guard over the process-wide writer.
    pub fn new() -> Self {
        Self::for_writer(crate::global())
    }
}

impl Default for LoggerGuard<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> LoggerGuard<'a> {
    /// Guard over `writer`.
    pub fn for_writer(writer: &'a LogWriter) -> Self {
        writer.initialize();
        Self { writer }
    }
}

impl Drop for LoggerGuard<'_> {
    fn drop(&mut self) {
        self.writer.shutdown();
    }
}

/// Initializes the process-wide writer.
pub fn initialize() {
    crate::global().initialize();
}

/// Shuts down the process-wide writer. Later writes are dropped.
pub fn shutdown() {
    crate::global().shutdown();
}
