//! Path-keyed rotating file logging
//!
//! Applications name a log file per call; the first write to a path creates
//! a logger for it and later writes reuse that logger. Behaviour is read
//! from an INI file:
//! - Size-based rotation with a bounded number of kept segments
//! - Asynchronous delivery through a shared bounded queue, or synchronous
//!   writes on the calling thread
//! - Debug output and instant flushing switched on per deployment
//! - An application tag added to every file name
//!
//! ```no_run
//! use proven_logger_file::{Level, LoggerGuard, info_log, write};
//!
//! # fn main() -> proven_logger_file::Result<()> {
//! let _guard = LoggerGuard::new();
//! write("/var/log/app.log", Level::Info, "service started")?;
//! info_log!("/var/log/app.log", "listening on port {}", 8080)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, unreachable_pub)]
#![forbid(unsafe_code)]

mod bounded;
mod config;
mod error;
mod flusher;
mod formatter;
mod lifecycle;
mod logger;
mod macros;
mod naming;
mod registry;
mod sink;
mod wide;
mod writer;

use std::fmt;
use std::sync::LazyLock;

pub use bounded::{NARROW_CAPACITY, WIDE_CAPACITY, Width, format_bounded};
pub use config::{
    CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, DEFAULT_FILE_SIZE_MB, DEFAULT_FLUSH_INTERVAL,
    DEFAULT_MAX_FILES, DEFAULT_QUEUE_CAPACITY, LogConfig, app_tag_from_current_exe,
};
pub use error::{Error, Result};
pub use formatter::{PatternFormatter, TIMESTAMP_FORMAT};
pub use lifecycle::{LoggerGuard, initialize, shutdown};
pub use logger::FileLogger;
pub use naming::{rotated_file_name, tagged_file_name};
pub use proven_logger::Level;
pub use registry::LoggerRegistry;
pub use sink::{AsyncSink, AsyncWorker, FileSink, LogSink, RotatingFileSink};
pub use wide::{from_wide, to_wide};
pub use writer::LogWriter;

static GLOBAL: LazyLock<LogWriter> = LazyLock::new(LogWriter::from_default_config);

/// The process-wide writer, configured from the well-known INI file.
pub fn global() -> &'static LogWriter {
    &GLOBAL
}

/// Writes `message` at `level` to the file for `path`.
///
/// # Errors
///
/// Returns the error that prevented the logger for `path` from being created.
pub fn write(path: &str, level: Level, message: &str) -> Result<()> {
    global().write(path, level, message)
}

/// Writes a UTF-16 message to the file for `path`.
///
/// # Errors
///
/// See [`write`].
pub fn write_wide(path: &str, level: Level, message: &[u16]) -> Result<()> {
    global().write_wide(path, level, message)
}

/// Writes a formatted message to the file for `path`.
///
/// # Errors
///
/// See [`write`].
pub fn write_args(path: &str, level: Level, args: fmt::Arguments<'_>) -> Result<()> {
    global().write_args(path, level, args)
}

/// Writes a formatted message if it fits the `width` buffer.
///
/// # Errors
///
/// See [`write`].
pub fn write_bounded(
    path: &str,
    level: Level,
    width: Width,
    args: fmt::Arguments<'_>,
) -> Result<()> {
    global().write_bounded(path, level, width, args)
}

/// Whether the process-wide configuration enables debug output.
pub fn is_debug_enabled() -> bool {
    global().is_debug_enabled()
}
