//! Formatting macros over the process-wide writer.
//!
//! Each macro evaluates to the [`crate::Result`] of the write.

/// Writes a message of at most 511 bytes; longer messages are dropped.
///
/// ```no_run
/// use proven_logger_file::{Level, write_log};
///
/// # fn main() -> proven_logger_file::Result<()> {
/// write_log!("/var/log/app.log", Level::Info, "started in {} ms", 42)?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! write_log {
    ($path:expr, $level:expr, $($arg:tt)+) => {
        $crate::write_bounded(
            $path,
            $level,
            $crate::Width::Narrow,
            ::std::format_args!($($arg)+),
        )
    };
}

/// Writes a message of at most 1023 UTF-16 units; longer messages are
/// dropped.
#[macro_export]
macro_rules! write_log_w {
    ($path:expr, $level:expr, $($arg:tt)+) => {
        $crate::write_bounded(
            $path,
            $level,
            $crate::Width::Wide,
            ::std::format_args!($($arg)+),
        )
    };
}

/// Writes a debug message. Nothing is formatted unless debug output is
/// enabled.
#[macro_export]
macro_rules! debug_log {
    ($path:expr, $($arg:tt)+) => {
        $crate::global().debug($path, ::std::format_args!($($arg)+))
    };
}

/// Writes an info message.
#[macro_export]
macro_rules! info_log {
    ($path:expr, $($arg:tt)+) => {
        $crate::global().info($path, ::std::format_args!($($arg)+))
    };
}

/// Writes a warning.
#[macro_export]
macro_rules! warn_log {
    ($path:expr, $($arg:tt)+) => {
        $crate::global().warn($path, ::std::format_args!($($arg)+))
    };
}

/// Writes an error. Error messages are flushed immediately.
#[macro_export]
macro_rules! error_log {
    ($path:expr, $($arg:tt)+) => {
        $crate::global().error($path, ::std::format_args!($($arg)+))
    };
}

/// Writes a fatal message.
#[macro_export]
macro_rules! fatal_log {
    ($path:expr, $($arg:tt)+) => {
        $crate::global().fatal($path, ::std::format_args!($($arg)+))
    };
}
