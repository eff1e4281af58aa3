//! Log severities

use std::fmt;

/// Severity of a log message.
///
/// Each variant carries a numeric severity, spaced 10000 apart, so raw values
/// coming from older callers can still be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum Level {
    /// Diagnostic output, only emitted when debug logging is enabled
    Debug = 10_000,
    /// Normal operational messages
    Info = 20_000,
    /// Something unexpected that the caller recovered from
    Warn = 30_000,
    /// A failed operation
    Error = 40_000,
    /// A failure the process is unlikely to survive
    Fatal = 50_000,
}

impl Level {
    /// All levels, least severe first.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
    ];

    /// Numeric severity of this level.
    #[must_use]
    pub const fn severity(self) -> i32 {
        self as i32
    }

    /// Maps a raw severity back to a level.
    ///
    /// Anything that is not one of the five known values is treated as `Info`.
    #[must_use]
    pub const fn from_severity(severity: i32) -> Self {
        match severity {
            10_000 => Self::Debug,
            30_000 => Self::Warn,
            40_000 => Self::Error,
            50_000 => Self::Fatal,
            _ => Self::Info,
        }
    }

    /// Lowercase name used in output lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl From<i32> for Level {
    fn from(severity: i32) -> Self {
        Self::from_severity(severity)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so callers can align with `{:<5}`
        f.pad(self.as_str())
    }
}
