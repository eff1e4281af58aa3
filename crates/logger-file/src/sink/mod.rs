//! Destinations that accept records.

mod async_sink;
mod rotating;

pub use async_sink::{AsyncSink, AsyncWorker};
pub use rotating::RotatingFileSink;

use std::path::Path;

use proven_logger::Record;

use crate::error::Result;

/// Something records can be appended to and flushed.
pub trait LogSink: Send + Sync {
    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written or handed off.
    fn append(&self, record: Record<'_>) -> Result<()>;

    /// Makes everything appended so far durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying file could not be flushed.
    fn flush(&self) -> Result<()>;
}

/// The sink behind a [`crate::FileLogger`], chosen once from the configuration.
pub enum FileSink {
    /// Records are queued for the shared background writer
    Async(AsyncSink),
    /// Records are written on the calling thread
    Sync(RotatingFileSink),
}

impl FileSink {
    /// Active file this sink writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Async(sink) => sink.path(),
            Self::Sync(sink) => sink.path(),
        }
    }

    /// Records evicted from a full asynchronous queue; always 0 when synchronous.
    #[must_use]
    pub fn overrun_count(&self) -> u64 {
        match self {
            Self::Async(sink) => sink.overrun_count(),
            Self::Sync(_) => 0,
        }
    }
}

impl LogSink for FileSink {
    fn append(&self, record: Record<'_>) -> Result<()> {
        match self {
            Self::Async(sink) => sink.append(record),
            Self::Sync(sink) => sink.append(record),
        }
    }

    fn flush(&self) -> Result<()> {
        match self {
            Self::Async(sink) => sink.flush(),
            Self::Sync(sink) => LogSink::flush(sink),
        }
    }
}
