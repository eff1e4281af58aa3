//! Background delivery through a bounded queue.
//!
//! All asynchronous loggers of a registry share one [`AsyncWorker`]: a
//! fixed-capacity queue drained by a single thread. Producers never block;
//! when the queue is full the oldest queued record is evicted and counted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use crossbeam::queue::ArrayQueue;
use crossbeam::sync::{Parker, Unparker};
use parking_lot::Mutex;
use proven_logger::{OwnedRecord, Record};
use tracing::warn;

use super::{LogSink, RotatingFileSink};
use crate::error::{Error, Result};

const THREAD_NAME: &str = "log-writer";

struct Envelope {
    sink: Arc<RotatingFileSink>,
    record: OwnedRecord,
}

enum Control {
    /// Write everything queued so far, flush `sink`, then signal `done`
    Flush {
        sink: Arc<RotatingFileSink>,
        done: Sender<()>,
    },
    Terminate,
}

struct Shared {
    queue: ArrayQueue<Envelope>,
    unparker: Unparker,
    overruns: AtomicU64,
    running: AtomicBool,
}

impl Shared {
    fn new(capacity: usize, unparker: Unparker) -> Self {
        Self {
            queue: ArrayQueue::new(capacity.max(1)),
            unparker,
            overruns: AtomicU64::new(0),
            running: AtomicBool::new(true),
        }
    }

    fn push(&self, envelope: Envelope) {
        if self.queue.force_push(envelope).is_some() {
            self.overruns.fetch_add(1, Ordering::Relaxed);
        }
        self.unparker.unpark();
    }

    /// Pushes, then drains on the caller's thread if the worker stopped in
    /// the meantime and may already have done its final drain.
    fn submit(&self, envelope: Envelope) {
        self.push(envelope);
        if !self.is_running() {
            self.drain();
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn drain(&self) {
        while let Some(envelope) = self.queue.pop() {
            if let Err(e) = envelope.sink.write_record(&envelope.record.as_record()) {
                warn!(
                    path = %envelope.sink.path().display(),
                    error = %e,
                    "failed to write log record"
                );
            }
        }
    }
}

/// The shared queue and its writer thread.
pub struct AsyncWorker {
    shared: Arc<Shared>,
    control: Sender<Control>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl AsyncWorker {
    /// Starts the writer thread with a queue of `capacity` slots.
    ///
    /// # Errors
    ///
    /// Fails if the thread cannot be spawned.
    pub fn spawn(capacity: usize) -> Result<Self> {
        let parker = Parker::new();
        let shared = Arc::new(Shared::new(capacity, parker.unparker().clone()));
        let (control, requests) = channel::unbounded();

        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run(&worker_shared, &parker, &requests))
            .map_err(|source| Error::Spawn {
                name: THREAD_NAME,
                source,
            })?;

        Ok(Self {
            shared,
            control,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Records evicted from the full queue since the worker started.
    #[must_use]
    pub fn overrun_count(&self) -> u64 {
        self.shared.overruns.load(Ordering::Relaxed)
    }

    /// Whether the writer thread is still accepting records.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    fn enqueue(&self, sink: &Arc<RotatingFileSink>, record: OwnedRecord) {
        self.shared.submit(Envelope {
            sink: Arc::clone(sink),
            record,
        });
    }

    /// Blocks until every record queued before this call is written and
    /// `sink` is flushed.
    fn flush(&self, sink: &Arc<RotatingFileSink>) -> Result<()> {
        let (done, finished) = channel::bounded(1);
        let request = Control::Flush {
            sink: Arc::clone(sink),
            done,
        };
        if self.control.send(request).is_ok() {
            self.shared.unparker.unpark();
            if finished.recv().is_ok() {
                return Ok(());
            }
        }
        // Worker is gone and has drained the queue already
        LogSink::flush(sink.as_ref())
    }

    /// Drains the queue and stops the writer thread. Later calls do nothing.
    pub fn shutdown(&self) {
        let _ = self.control.send(Control::Terminate);
        self.shared.unparker.unpark();
        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                warn!("log writer thread panicked");
            }
        }
        // Producers that saw `running` just before it flipped
        self.shared.drain();
    }
}

impl Drop for AsyncWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(shared: &Shared, parker: &Parker, requests: &Receiver<Control>) {
    loop {
        shared.drain();
        match requests.try_recv() {
            Ok(Control::Flush { sink, done }) => {
                shared.drain();
                if let Err(e) = LogSink::flush(sink.as_ref()) {
                    warn!(path = %sink.path().display(), error = %e, "failed to flush log file");
                }
                let _ = done.send(());
            }
            Ok(Control::Terminate) | Err(TryRecvError::Disconnected) => break,
            // Producers unpark after every push, so nothing is missed
            Err(TryRecvError::Empty) => parker.park(),
        }
    }

    shared.running.store(false, Ordering::SeqCst);
    shared.drain();
}

/// A file sink whose writes happen on the [`AsyncWorker`] thread.
pub struct AsyncSink {
    file: Arc<RotatingFileSink>,
    worker: Arc<AsyncWorker>,
}

impl AsyncSink {
    /// Routes records for `file` through `worker`.
    #[must_use]
    pub const fn new(file: Arc<RotatingFileSink>, worker: Arc<AsyncWorker>) -> Self {
        Self { file, worker }
    }

    /// Active file.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    /// Records evicted from the shared queue, across all loggers using it.
    #[must_use]
    pub fn overrun_count(&self) -> u64 {
        self.worker.overrun_count()
    }
}

impl LogSink for AsyncSink {
    fn append(&self, record: Record<'_>) -> Result<()> {
        if self.worker.is_running() {
            self.worker.enqueue(&self.file, record.into_owned());
            Ok(())
        } else {
            self.file.write_record(&record)
        }
    }

    fn flush(&self) -> Result<()> {
        self.worker.flush(&self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proven_logger::Level;
    use std::fs;
    use tempfile::tempdir;

    fn file_sink(dir: &std::path::Path) -> Arc<RotatingFileSink> {
        Arc::new(RotatingFileSink::new(dir.join("app.log"), 1024 * 1024, 1).unwrap())
    }

    #[test]
    fn test_full_queue_evicts_oldest() {
        let dir = tempdir().unwrap();
        let sink = file_sink(dir.path());
        let parker = Parker::new();
        let shared = Shared::new(2, parker.unparker().clone());

        for i in 0..3 {
            shared.push(Envelope {
                sink: Arc::clone(&sink),
                record: Record::new(Level::Info, format!("message {i}")).into_owned(),
            });
        }

        assert_eq!(shared.overruns.load(Ordering::Relaxed), 1);
        assert_eq!(shared.queue.len(), 2);

        shared.drain();
        LogSink::flush(sink.as_ref()).unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        assert!(!content.contains("message 0"));
        assert!(content.contains("message 1"));
        assert!(content.contains("message 2"));
    }

    #[test]
    fn test_flush_waits_for_queued_records() {
        let dir = tempdir().unwrap();
        let file = file_sink(dir.path());
        let worker = Arc::new(AsyncWorker::spawn(8192).unwrap());
        let sink = AsyncSink::new(Arc::clone(&file), Arc::clone(&worker));

        for i in 0..100 {
            sink.append(Record::new(Level::Info, format!("message {i:03}")))
                .unwrap();
        }
        sink.flush().unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        let messages: Vec<_> = content
            .lines()
            .map(|line| line.rsplit(" - ").next().unwrap().to_string())
            .collect();
        let expected: Vec<_> = (0..100).map(|i| format!("message {i:03}")).collect();
        assert_eq!(messages, expected);
        assert_eq!(sink.overrun_count(), 0);
    }

    #[test]
    fn test_shutdown_drains_and_falls_back_to_direct_writes() {
        let dir = tempdir().unwrap();
        let file = file_sink(dir.path());
        let worker = Arc::new(AsyncWorker::spawn(16).unwrap());
        let sink = AsyncSink::new(Arc::clone(&file), Arc::clone(&worker));

        sink.append(Record::new(Level::Info, "before")).unwrap();
        worker.shutdown();
        worker.shutdown();
        assert!(!worker.is_running());

        sink.append(Record::new(Level::Info, "after")).unwrap();
        sink.flush().unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("before"));
        assert!(content.contains("after"));
    }

    #[test]
    fn test_submit_after_worker_stopped_is_written() {
        let dir = tempdir().unwrap();
        let sink = file_sink(dir.path());
        let parker = Parker::new();
        let shared = Shared::new(8, parker.unparker().clone());
        // The producer saw a running worker, which then finished its last drain
        shared.running.store(false, Ordering::SeqCst);

        shared.submit(Envelope {
            sink: Arc::clone(&sink),
            record: Record::new(Level::Info, "late record").into_owned(),
        });

        assert!(shared.queue.is_empty());
        LogSink::flush(sink.as_ref()).unwrap();
        assert!(fs::read_to_string(sink.path()).unwrap().contains("late record"));
    }

    #[test]
    fn test_submit_while_running_leaves_record_to_worker() {
        let dir = tempdir().unwrap();
        let sink = file_sink(dir.path());
        let parker = Parker::new();
        let shared = Shared::new(8, parker.unparker().clone());

        shared.submit(Envelope {
            sink: Arc::clone(&sink),
            record: Record::new(Level::Info, "queued").into_owned(),
        });

        assert_eq!(shared.queue.len(), 1);
    }
}
