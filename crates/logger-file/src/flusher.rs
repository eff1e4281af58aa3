//! Periodic background flush used when instant flushing is off.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError, Sender};

use crate::error::{Error, Result};

const THREAD_NAME: &str = "log-flusher";

/// Calls a flush callback every `interval` until stopped.
pub(crate) struct PeriodicFlusher {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicFlusher {
    /// Starts the flusher thread.
    ///
    /// `flush_all` returns `false` once there is nothing left to flush, which
    /// also ends the thread.
    pub(crate) fn start<F>(interval: Duration, flush_all: F) -> Result<Self>
    where
        F: Fn() -> bool + Send + 'static,
    {
        let (stop, stopped) = channel::bounded::<()>(0);
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                while let Err(RecvTimeoutError::Timeout) = stopped.recv_timeout(interval) {
                    if !flush_all() {
                        break;
                    }
                }
            })
            .map_err(|source| Error::Spawn {
                name: THREAD_NAME,
                source,
            })?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Stops the thread and waits for it to exit.
    pub(crate) fn stop(mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PeriodicFlusher {
    fn drop(&mut self) {
        // Disconnecting wakes the thread; no join since the last owner may be
        // the flusher thread itself
        drop(self.stop.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_flushes_periodically_until_stopped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let flusher = PeriodicFlusher::start(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        })
        .unwrap();

        thread::sleep(Duration::from_millis(100));
        flusher.stop();
        let after_stop = calls.load(Ordering::SeqCst);

        assert!(after_stop >= 2, "only {after_stop} flushes");
        thread::sleep(Duration::from_millis(50));
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_callback_can_end_the_thread() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let flusher = PeriodicFlusher::start(Duration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        })
        .unwrap();

        thread::sleep(Duration::from_millis(60));
        flusher.stop();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
