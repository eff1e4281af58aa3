//! The call surface applications write through.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use proven_logger::{Level, Logger, Record};
use tracing::trace;

use crate::bounded::{Width, format_bounded};
use crate::config::LogConfig;
use crate::error::{Error, Result};
use crate::logger::FileLogger;
use crate::registry::LoggerRegistry;
use crate::wide::from_wide;

/// Writes messages to the logger registered for each path.
///
/// An empty path, a message that does not fit its bounded buffer and writes
/// after shutdown are dropped silently. The only error a write reports is a
/// logger that could not be created, e.g. because its directory cannot be
/// made.
#[derive(Clone, Debug, Default)]
pub struct LogWriter {
    registry: LoggerRegistry,
}

impl LogWriter {
    /// Writer with an explicit configuration.
    #[must_use]
    pub fn new(config: LogConfig) -> Self {
        Self::from_registry(LoggerRegistry::new(config))
    }

    /// Writer reading its configuration from `path` on first use.
    #[must_use]
    pub fn from_config_file(path: impl Into<PathBuf>) -> Self {
        Self::from_registry(LoggerRegistry::from_config_file(path))
    }

    /// Writer reading the well-known configuration file on first use.
    #[must_use]
    pub fn from_default_config() -> Self {
        Self::from_registry(LoggerRegistry::from_default_config())
    }

    /// Writer over an existing registry.
    #[must_use]
    pub const fn from_registry(registry: LoggerRegistry) -> Self {
        Self { registry }
    }

    /// The registry holding this writer's loggers.
    #[must_use]
    pub const fn registry(&self) -> &LoggerRegistry {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &LogConfig {
        self.registry.config()
    }

    /// The logger for `path`, created on first use.
    ///
    /// # Errors
    ///
    /// See [`LoggerRegistry::get_logger`].
    pub fn logger(&self, path: &str) -> Result<Arc<FileLogger>> {
        self.registry.get_logger(path)
    }

    /// Writes `message` at `level` to the file for `path`.
    ///
    /// # Errors
    ///
    /// Returns the error that prevented the logger for `path` from being
    /// created.
    pub fn write(&self, path: &str, level: Level, message: &str) -> Result<()> {
        self.dispatch(path, level, message.to_string())
    }

    /// Writes a UTF-16 message, which ends at the first NUL if any.
    ///
    /// # Errors
    ///
    /// See [`LogWriter::write`].
    pub fn write_wide(&self, path: &str, level: Level, message: &[u16]) -> Result<()> {
        self.dispatch(path, level, from_wide(message))
    }

    /// Writes a formatted message without a length limit.
    ///
    /// # Errors
    ///
    /// See [`LogWriter::write`].
    pub fn write_args(&self, path: &str, level: Level, args: fmt::Arguments<'_>) -> Result<()> {
        let message = args
            .as_str()
            .map_or_else(|| args.to_string(), ToString::to_string);
        self.dispatch(path, level, message)
    }

    /// Writes a formatted message only if it fits the `width` buffer.
    ///
    /// # Errors
    ///
    /// See [`LogWriter::write`]. A message that does not fit is not an error.
    pub fn write_bounded(
        &self,
        path: &str,
        level: Level,
        width: Width,
        args: fmt::Arguments<'_>,
    ) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        match format_bounded(width, args) {
            Some(message) => self.dispatch(path, level, message),
            None => Ok(()),
        }
    }

    /// Formats and writes at debug level, if debug output is enabled.
    ///
    /// The arguments are not formatted when it is disabled.
    ///
    /// # Errors
    ///
    /// See [`LogWriter::write`].
    pub fn debug(&self, path: &str, args: fmt::Arguments<'_>) -> Result<()> {
        if !self.is_debug_enabled() {
            return Ok(());
        }
        self.write_args(path, Level::Debug, args)
    }

    /// Formats and writes at info level.
    ///
    /// # Errors
    ///
    /// See [`LogWriter::write`].
    pub fn info(&self, path: &str, args: fmt::Arguments<'_>) -> Result<()> {
        self.write_args(path, Level::Info, args)
    }

    /// Formats and writes at warn level.
    ///
    /// # Errors
    ///
    /// See [`LogWriter::write`].
    pub fn warn(&self, path: &str, args: fmt::Arguments<'_>) -> Result<()> {
        self.write_args(path, Level::Warn, args)
    }

    /// Formats and writes at error level.
    ///
    /// # Errors
    ///
    /// See [`LogWriter::write`].
    pub fn error(&self, path: &str, args: fmt::Arguments<'_>) -> Result<()> {
        self.write_args(path, Level::Error, args)
    }

    /// Formats and writes at fatal level.
    ///
    /// # Errors
    ///
    /// See [`LogWriter::write`].
    pub fn fatal(&self, path: &str, args: fmt::Arguments<'_>) -> Result<()> {
        self.write_args(path, Level::Fatal, args)
    }

    /// Whether the configuration enables debug output.
    pub fn is_debug_enabled(&self) -> bool {
        self.config().enable_debug
    }

    /// Marks the start of logging. Loggers are created lazily, so this only
    /// records the event.
    pub fn initialize(&self) {
        trace!(shut_down = self.registry.is_shut_down(), "log writer initialized");
    }

    /// Flushes every logger and stops background delivery. Idempotent.
    pub fn shutdown(&self) {
        self.registry.shutdown();
    }

    fn dispatch(&self, path: &str, level: Level, message: String) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }

        let logger = match self.registry.get_logger(path) {
            Ok(logger) => logger,
            Err(Error::ShutDown) => return Ok(()),
            Err(e) => return Err(e),
        };

        logger.log(Record::new(level, message));
        if self.config().instant_flush {
            logger.flush();
        }
        Ok(())
    }
}
