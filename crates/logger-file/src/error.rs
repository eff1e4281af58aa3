//! Error types for file-based logging

use std::io;
use std::path::PathBuf;

/// Result type for file logger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during file logging
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to create log directory
    #[error("Failed to create log directory at {path}: {source}")]
    CreateDirectory {
        /// The path that failed to be created
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Failed to open the active log file
    #[error("Failed to open log file {path}: {source}")]
    OpenFile {
        /// The file that could not be opened
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Failed to rotate log file
    #[error("Failed to rotate {from} to {to}: {source}")]
    Rotation {
        /// Segment being renamed
        from: PathBuf,
        /// Name it was being renamed to
        to: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to start a background thread
    #[error("Failed to spawn {name} thread: {source}")]
    Spawn {
        /// Name given to the thread
        name: &'static str,
        /// The underlying error
        source: io::Error,
    },

    /// The registry has been shut down and hands out no more loggers
    #[error("Logger registry has been shut down")]
    ShutDown,
}
