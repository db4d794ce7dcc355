//! Sink counters.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;

/// Counters the producer side and the consumer thread update concurrently.
#[derive(Debug, Default)]
pub(crate) struct SharedStats {
    pub received: AtomicU64,
    pub committed: AtomicU64,
    pub failed: AtomicU64,
    pub retries: AtomicU64,
    pub backpressure: AtomicU64,
    pub rejected: AtomicU64,
    pub flush_failed: AtomicBool,
}

impl SharedStats {
    pub fn snapshot(&self, timed_out: bool) -> WriteStats {
        WriteStats {
            received: self.received.load(Ordering::SeqCst),
            committed: self.committed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            retries: self.retries.load(Ordering::SeqCst),
            backpressure: self.backpressure.load(Ordering::SeqCst),
            rejected: self.rejected.load(Ordering::SeqCst),
            flush_failed: self.flush_failed.load(Ordering::SeqCst),
            timed_out,
        }
    }
}

/// What the sink did over its lifetime, returned by `FindingWriter::shutdown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    /// Findings accepted by `send`.
    pub received: u64,
    pub committed: u64,
    /// Findings given up on after every retry failed.
    pub failed: u64,
    pub retries: u64,
    /// Sends that found the queue full and had to wait.
    pub backpressure: u64,
    /// Findings `send` gave up on: the queue stayed full past
    /// `sink.send_timeout_ms`, or the consumer was gone.
    pub rejected: u64,
    /// The committer's final flush returned an error.
    pub flush_failed: bool,
    /// Shutdown stopped waiting before the consumer finished.
    pub timed_out: bool,
}

impl WriteStats {
    /// Findings still queued or in flight when the stats were taken.
    pub fn outstanding(&self) -> u64 {
        self.received
            .saturating_sub(self.committed)
            .saturating_sub(self.failed)
    }
}
