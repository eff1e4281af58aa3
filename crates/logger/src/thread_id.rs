//! Small numeric thread ids for output lines.
//!
//! `std::thread::ThreadId` has no stable integer form, so each thread is
//! assigned the next value of a process-wide counter the first time it logs.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Id of the calling thread. Stable for the thread's lifetime, never reused.
#[must_use]
pub fn current() -> u64 {
    THREAD_ID.with(|id| *id)
}
