//! A configured logger bound to one log file.

use std::path::Path;

use proven_logger::{Level, Logger, Record};
use tracing::warn;

use crate::error::Result;
use crate::sink::{FileSink, LogSink};

/// Logger for one requested path, as handed out by the registry.
pub struct FileLogger {
    name: String,
    sink: FileSink,
    min_level: Level,
    flush_level: Option<Level>,
}

impl FileLogger {
    /// Creates a logger that drops records below `min_level` and flushes
    /// after any record at or above `flush_level`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        sink: FileSink,
        min_level: Level,
        flush_level: Option<Level>,
    ) -> Self {
        Self {
            name: name.into(),
            sink,
            min_level,
            flush_level,
        }
    }

    /// The path this logger was requested under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active file on disk, with the application tag applied.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.sink.path()
    }

    /// Whether records are delivered by the background writer.
    #[must_use]
    pub const fn is_async(&self) -> bool {
        matches!(self.sink, FileSink::Async(_))
    }

    /// Records lost to a full asynchronous queue.
    #[must_use]
    pub fn overrun_count(&self) -> u64 {
        self.sink.overrun_count()
    }

    /// Flushes and reports failures instead of logging them.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying file flush.
    pub fn try_flush(&self) -> Result<()> {
        self.sink.flush()
    }
}

impl Logger for FileLogger {
    fn log(&self, record: Record) {
        if !self.is_enabled(record.level) {
            return;
        }

        let level = record.level;
        if let Err(e) = self.sink.append(record) {
            warn!(logger = %self.name, error = %e, "failed to write log record");
        }

        if self.flush_level.is_some_and(|flush_level| level >= flush_level) {
            self.flush();
        }
    }

    fn flush(&self) {
        if let Err(e) = self.try_flush() {
            warn!(logger = %self.name, error = %e, "failed to flush log file");
        }
    }

    #[inline(always)]
    fn is_enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }
}

impl std::fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLogger")
            .field("name", &self.name)
            .field("path", &self.path())
            .field("async", &self.is_async())
            .field("min_level", &self.min_level)
            .field("flush_level", &self.flush_level)
            .finish()
    }
}
