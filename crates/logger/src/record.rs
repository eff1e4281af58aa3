//! Log record type optimized for performance

use crate::{Level, thread_id};
use chrono::{DateTime, Local};
use std::borrow::Cow;

/// A log record - designed to minimize allocations
#[derive(Debug, Clone)]
pub struct Record<'a> {
    /// Log level
    pub level: Level,
    /// The log message
    pub message: Cow<'a, str>,
    /// When the log was created
    pub timestamp: DateTime<Local>,
    /// Numeric id of the thread that created the record
    pub thread_id: u64,
}

impl<'a> Record<'a> {
    /// Create a new record stamped with the current time and thread
    #[inline]
    pub fn new(level: Level, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            thread_id: thread_id::current(),
        }
    }

    /// Convert to owned version (for sending across threads)
    #[must_use]
    pub fn into_owned(self) -> OwnedRecord {
        OwnedRecord {
            level: self.level,
            message: self.message.into_owned(),
            timestamp: self.timestamp,
            thread_id: self.thread_id,
        }
    }
}

/// Owned version of Record for cross-thread sending
#[derive(Debug, Clone)]
pub struct OwnedRecord {
    /// Log level
    pub level: Level,
    /// The log message
    pub message: String,
    /// When the log was created
    pub timestamp: DateTime<Local>,
    /// Numeric id of the thread that created the record
    pub thread_id: u64,
}

impl OwnedRecord {
    /// Borrow this record without copying the message.
    #[must_use]
    pub fn as_record(&self) -> Record<'_> {
        Record {
            level: self.level,
            message: Cow::Borrowed(&self.message),
            timestamp: self.timestamp,
            thread_id: self.thread_id,
        }
    }
}
