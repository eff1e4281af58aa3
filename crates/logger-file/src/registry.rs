//! Path-keyed cache of configured loggers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;
use tracing::debug;

use crate::config::LogConfig;
use crate::error::{Error, Result};
use crate::flusher::PeriodicFlusher;
use crate::logger::FileLogger;
use crate::naming::tagged_file_name;
use crate::sink::{AsyncSink, AsyncWorker, FileSink, RotatingFileSink};
use proven_logger::Logger;

/// Hands out one [`FileLogger`] per requested path.
///
/// Lookups take a shared lock, so concurrent writers to existing loggers
/// never wait on each other. A missing logger is built under the exclusive
/// lock after re-checking the map, which guarantees a single instance per
/// path even when many threads ask for it at once.
#[derive(Clone)]
pub struct LoggerRegistry {
    inner: Arc<Inner>,
}

struct Inner {
    config: OnceLock<LogConfig>,
    /// `None` means the well-known location
    config_path: Option<PathBuf>,
    state: RwLock<State>,
    shut_down: AtomicBool,
}

#[derive(Default)]
struct State {
    loggers: HashMap<String, Arc<FileLogger>>,
    worker: Option<Arc<AsyncWorker>>,
    flusher: Option<PeriodicFlusher>,
}

impl LoggerRegistry {
    /// Registry using an already loaded configuration.
    #[must_use]
    pub fn new(config: LogConfig) -> Self {
        Self::with_source(OnceLock::from(config), None)
    }

    /// Registry that reads `path` when the first logger is created.
    #[must_use]
    pub fn from_config_file(path: impl Into<PathBuf>) -> Self {
        Self::with_source(OnceLock::new(), Some(path.into()))
    }

    /// Registry that reads the well-known configuration file when the first
    /// logger is created.
    #[must_use]
    pub fn from_default_config() -> Self {
        Self::with_source(OnceLock::new(), None)
    }

    fn with_source(config: OnceLock<LogConfig>, config_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                config_path,
                state: RwLock::new(State::default()),
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    /// The configuration, loading it on first use.
    pub fn config(&self) -> &LogConfig {
        self.inner.config()
    }

    /// Returns the logger for `path`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShutDown`] after [`LoggerRegistry::shutdown`], or the
    /// error that prevented the file from being opened. A failed path is not
    /// cached; the next call tries again.
    pub fn get_logger(&self, path: &str) -> Result<Arc<FileLogger>> {
        if let Some(logger) = self.inner.state.read().loggers.get(path) {
            return Ok(Arc::clone(logger));
        }

        if self.is_shut_down() {
            return Err(Error::ShutDown);
        }

        // Load before taking the write lock so readers don't wait on disk
        let config = self.inner.config();

        let mut state = self.inner.state.write();
        if let Some(logger) = state.loggers.get(path) {
            return Ok(Arc::clone(logger));
        }
        // Shutdown may have run while we waited for the lock
        if self.is_shut_down() {
            return Err(Error::ShutDown);
        }

        if !config.instant_flush && state.flusher.is_none() {
            state.flusher = Some(self.start_flusher(config)?);
        }

        let logger = Arc::new(build_logger(&mut state, path, config)?);
        state.loggers.insert(path.to_string(), Arc::clone(&logger));
        drop(state);

        debug!(
            path,
            file = %logger.path().display(),
            async_mode = config.async_mode,
            "created logger"
        );
        Ok(logger)
    }

    /// Whether a logger exists for `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.inner.state.read().loggers.contains_key(path)
    }

    /// Number of loggers created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.read().loggers.len()
    }

    /// Whether no logger has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records evicted from the shared asynchronous queue.
    #[must_use]
    pub fn overrun_count(&self) -> u64 {
        self.inner
            .state
            .read()
            .worker
            .as_ref()
            .map_or(0, |worker| worker.overrun_count())
    }

    /// Flushes every logger.
    pub fn flush_all(&self) {
        self.inner.flush_all();
    }

    /// Whether [`LoggerRegistry::shutdown`] has run.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::Acquire)
    }

    /// Flushes and releases every logger and stops the background threads.
    ///
    /// Only the first call does anything. Afterwards the registry hands out
    /// no loggers.
    pub fn shutdown(&self) {
        if self.inner.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }

        let State {
            loggers,
            worker,
            flusher,
        } = std::mem::take(&mut *self.inner.state.write());

        if let Some(flusher) = flusher {
            flusher.stop();
        }
        for logger in loggers.values() {
            logger.flush();
        }
        if let Some(worker) = worker {
            worker.shutdown();
        }

        debug!(loggers = loggers.len(), "logger registry shut down");
    }

    fn start_flusher(&self, config: &LogConfig) -> Result<PeriodicFlusher> {
        let registry: Weak<Inner> = Arc::downgrade(&self.inner);
        PeriodicFlusher::start(config.flush_interval, move || {
            registry.upgrade().is_some_and(|inner| {
                inner.flush_all();
                true
            })
        })
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::from_default_config()
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("config", &self.inner.config.get())
            .field("config_path", &self.inner.config_path)
            .field("loggers", &self.len())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

impl Inner {
    fn config(&self) -> &LogConfig {
        self.config.get_or_init(|| match &self.config_path {
            Some(path) => LogConfig::from_file(path),
            None => LogConfig::load(),
        })
    }

    fn flush_all(&self) {
        // Flush outside the lock; async flushes wait for the writer thread
        let loggers: Vec<_> = self.state.read().loggers.values().cloned().collect();
        for logger in loggers {
            logger.flush();
        }
    }
}

fn build_logger(state: &mut State, path: &str, config: &LogConfig) -> Result<FileLogger> {
    let file_name = tagged_file_name(path, &config.app_tag);
    let file = RotatingFileSink::new(file_name, config.max_file_size, config.max_files)?;

    let sink = if config.async_mode {
        let worker = match &state.worker {
            Some(worker) => Arc::clone(worker),
            None => {
                let worker = Arc::new(AsyncWorker::spawn(config.queue_capacity)?);
                state.worker = Some(Arc::clone(&worker));
                worker
            }
        };
        FileSink::Async(AsyncSink::new(Arc::new(file), worker))
    } else {
        FileSink::Sync(file)
    };

    Ok(FileLogger::new(
        path,
        sink,
        config.min_level(),
        config.flush_level(),
    ))
}
