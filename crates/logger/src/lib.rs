//! Core logging types shared by the file logger and its callers.
//!
//! This crate only defines the vocabulary: severities, records, and the
//! [`Logger`] trait. Destinations live in their own crates.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

mod level;
mod logger;
mod record;
pub mod test_support;
pub mod thread_id;

pub use level::Level;
pub use logger::{Logger, LoggerExt};
pub use record::{OwnedRecord, Record};

/// Logger that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn log(&self, _record: Record) {}

    fn flush(&self) {}

    #[inline(always)]
    fn is_enabled(&self, _level: Level) -> bool {
        false
    }
}
