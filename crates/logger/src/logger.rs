//! Core logger trait

use crate::{Level, Record};
use std::borrow::Cow;

/// Core logger trait - designed for performance
pub trait Logger: Send + Sync + 'static {
    /// Log a record
    fn log(&self, record: Record);

    /// Flush any buffered logs
    fn flush(&self);

    /// Check if a level is enabled (for fast filtering)
    #[inline(always)]
    fn is_enabled(&self, _level: Level) -> bool {
        true
    }
}

/// Extension trait for convenient logging methods
pub trait LoggerExt: Logger {
    /// Log debug
    #[inline(always)]
    fn debug<'a>(&self, msg: impl Into<Cow<'a, str>>) {
        if self.is_enabled(Level::Debug) {
            self.log(Record::new(Level::Debug, msg));
        }
    }

    /// Log info
    #[inline(always)]
    fn info<'a>(&self, msg: impl Into<Cow<'a, str>>) {
        if self.is_enabled(Level::Info) {
            self.log(Record::new(Level::Info, msg));
        }
    }

    /// Log a warning
    #[inline(always)]
    fn warn<'a>(&self, msg: impl Into<Cow<'a, str>>) {
        if self.is_enabled(Level::Warn) {
            self.log(Record::new(Level::Warn, msg));
        }
    }

    /// Log an error
    #[inline(always)]
    fn error<'a>(&self, msg: impl Into<Cow<'a, str>>) {
        if self.is_enabled(Level::Error) {
            self.log(Record::new(Level::Error, msg));
        }
    }

    /// Log a fatal error
    #[inline(always)]
    fn fatal<'a>(&self, msg: impl Into<Cow<'a, str>>) {
        if self.is_enabled(Level::Fatal) {
            self.log(Record::new(Level::Fatal, msg));
        }
    }

    /// Log at a level chosen at runtime
    #[inline(always)]
    fn log_at<'a>(&self, level: Level, msg: impl Into<Cow<'a, str>>) {
        if self.is_enabled(level) {
            self.log(Record::new(level, msg));
        }
    }
}

// Implement for all loggers
impl<T: Logger + ?Sized> LoggerExt for T {}
