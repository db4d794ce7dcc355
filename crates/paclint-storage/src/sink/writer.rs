//! FindingWriter: bounded channel, one dedicated consumer thread.
//!
//! Analysis workers call `send` concurrently and return as soon as the
//! finding is queued. Only the consumer thread touches the committer.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{
    bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender, TrySendError,
};
use paclint_core::config::SinkConfig;
use paclint_core::errors::StorageError;
use paclint_core::types::Finding;
use tracing::{debug, error, warn};

use super::committer::FindingCommitter;
use super::stats::{SharedStats, WriteStats};

const THREAD_NAME: &str = "paclint-finding-sink";

/// First retry delay; doubles per attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(10);
const MAX_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// How often `shutdown` checks whether the consumer has exited.
const JOIN_POLL: Duration = Duration::from_millis(10);

/// Asynchronous finding sink.
///
/// `send` waits only while the queue is full, and never longer than
/// `sink.send_timeout_ms`. `shutdown` stops intake,
/// waits (bounded) for the consumer to drain the queue and returns the
/// sink's counters.
pub struct FindingWriter {
    tx: Option<Sender<Finding>>,
    probe: Receiver<Finding>,
    shutdown: Arc<AtomicBool>,
    stats: Arc<SharedStats>,
    handle: Option<JoinHandle<()>>,
    poll: Duration,
    send_timeout: Duration,
    shutdown_timeout: Duration,
}

impl FindingWriter {
    /// Spawn the consumer thread around `committer`.
    pub fn new(
        committer: Box<dyn FindingCommitter>,
        config: &SinkConfig,
    ) -> Result<Self, StorageError> {
        let (tx, rx) = bounded(config.effective_channel_capacity());
        let probe = rx.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(SharedStats::default());

        let consumer = Consumer {
            rx,
            committer,
            shutdown: Arc::clone(&shutdown),
            stats: Arc::clone(&stats),
            poll: config.effective_poll_interval(),
            max_retries: config.effective_max_commit_retries(),
        };
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || consumer.run())?;

        Ok(Self {
            tx: Some(tx),
            probe,
            shutdown,
            stats,
            handle: Some(handle),
            poll: config.effective_poll_interval(),
            send_timeout: config.effective_send_timeout(),
            shutdown_timeout: config.effective_shutdown_timeout(),
        })
    }

    /// Queue one finding.
    ///
    /// On a full queue the caller waits in `poll`-sized slices, re-checking
    /// that the consumer is still alive, for at most `sink.send_timeout_ms`.
    /// A finding that cannot be queued is counted in `rejected` and reported
    /// as an error, never dropped silently.
    pub fn send(&self, finding: Finding) -> Result<(), StorageError> {
        let tx = self.tx.as_ref().ok_or(StorageError::ChannelClosed)?;
        let mut finding = match tx.try_send(finding) {
            Ok(()) => {
                self.stats.received.fetch_add(1, Ordering::SeqCst);
                return Ok(());
            }
            Err(TrySendError::Full(finding)) => finding,
            Err(TrySendError::Disconnected(_)) => return Err(StorageError::ChannelClosed),
        };

        self.stats.backpressure.fetch_add(1, Ordering::Relaxed);
        debug!(queued = tx.len(), "finding queue full, waiting");
        let start = Instant::now();
        loop {
            match tx.send_timeout(finding, self.poll) {
                Ok(()) => break,
                Err(SendTimeoutError::Disconnected(_)) => {
                    return Err(StorageError::ChannelClosed)
                }
                Err(SendTimeoutError::Timeout(pending)) => {
                    let waited_ms = start.elapsed().as_millis() as u64;
                    if self.consumer_exited() {
                        self.reject(
                            &pending,
                            waited_ms,
                            "finding consumer exited while the queue was full",
                        );
                        return Err(StorageError::WriterThread {
                            message: "consumer exited".to_string(),
                        });
                    }
                    if start.elapsed() >= self.send_timeout {
                        self.reject(
                            &pending,
                            waited_ms,
                            "finding queue stayed full, giving up on finding",
                        );
                        return Err(StorageError::QueueStalled { waited_ms });
                    }
                    warn!(queued = tx.len(), waited_ms, "finding queue still full");
                    finding = pending;
                }
            }
        }
        self.stats.received.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn consumer_exited(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
            || self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    fn reject(&self, finding: &Finding, waited_ms: u64, reason: &str) {
        self.stats.rejected.fetch_add(1, Ordering::SeqCst);
        error!(
            file = %finding.file,
            line = finding.line,
            rule = %finding.rule,
            waited_ms,
            "{reason}"
        );
    }

    /// Findings currently waiting for the consumer.
    pub fn queue_len(&self) -> usize {
        self.probe.len()
    }

    /// Current counters, without stopping the sink.
    pub fn stats(&self) -> WriteStats {
        self.stats.snapshot(false)
    }

    /// Stop accepting findings and wait for the queue to drain.
    ///
    /// Waiting is bounded by `sink.shutdown_timeout_ms`. Past it the consumer
    /// is left to finish on its own, the queue depth is logged and the
    /// partial stats come back with `timed_out` set. A consumer thread that
    /// died is reported as `StorageError::WriterThread`.
    pub fn shutdown(mut self) -> Result<WriteStats, StorageError> {
        self.shutdown.store(true, Ordering::SeqCst);
        drop(self.tx.take());

        let Some(handle) = self.handle.take() else {
            return Ok(self.stats.snapshot(false));
        };

        let deadline = Instant::now() + self.shutdown_timeout;
        while !handle.is_finished() {
            let now = Instant::now();
            if now >= deadline {
                let stats = self.stats.snapshot(true);
                warn!(
                    queued = self.queue_len(),
                    committed = stats.committed,
                    failed = stats.failed,
                    timeout_ms = self.shutdown_timeout.as_millis() as u64,
                    "finding sink did not drain before the shutdown timeout"
                );
                return Ok(stats);
            }
            thread::sleep(JOIN_POLL.min(deadline - now));
        }

        handle.join().map_err(|payload| StorageError::WriterThread {
            message: panic_message(payload.as_ref()),
        })?;
        Ok(self.stats.snapshot(false))
    }
}

impl Drop for FindingWriter {
    fn drop(&mut self) {
        // Without an explicit shutdown the consumer still drains and exits
        // once the sender is gone; nobody waits for it.
        self.shutdown.store(true, Ordering::SeqCst);
        self.tx.take();
    }
}

impl std::fmt::Debug for FindingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FindingWriter")
            .field("queued", &self.queue_len())
            .field("stats", &self.stats.snapshot(false))
            .finish()
    }
}

struct Consumer {
    rx: Receiver<Finding>,
    committer: Box<dyn FindingCommitter>,
    shutdown: Arc<AtomicBool>,
    stats: Arc<SharedStats>,
    poll: Duration,
    max_retries: u32,
}

impl Consumer {
    fn run(mut self) {
        loop {
            match self.rx.recv_timeout(self.poll) {
                Ok(finding) => self.commit(&finding),
                Err(RecvTimeoutError::Timeout) => {
                    if self.shutdown.load(Ordering::SeqCst) && self.rx.is_empty() {
                        break;
                    }
                }
                // Every sender is gone and the queue is empty.
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if let Err(e) = self.committer.flush() {
            self.stats.flush_failed.store(true, Ordering::SeqCst);
            error!(error = %e, "finding committer failed to flush");
        }
        debug!(
            committed = self.stats.committed.load(Ordering::SeqCst),
            failed = self.stats.failed.load(Ordering::SeqCst),
            "finding sink drained"
        );
    }

    fn commit(&mut self, finding: &Finding) {
        let mut backoff = RETRY_BACKOFF;
        for attempt in 0..=self.max_retries {
            match self.try_commit(finding) {
                Ok(()) => {
                    self.stats.committed.fetch_add(1, Ordering::SeqCst);
                    return;
                }
                Err(e) if attempt < self.max_retries => {
                    self.stats.retries.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        file = %finding.file,
                        line = finding.line,
                        attempt = attempt + 1,
                        error = %e,
                        "finding commit failed, retrying"
                    );
                    thread::sleep(backoff);
                    backoff = (backoff * 2).min(MAX_RETRY_BACKOFF);
                }
                Err(e) => {
                    self.stats.failed.fetch_add(1, Ordering::SeqCst);
                    error!(
                        file = %finding.file,
                        line = finding.line,
                        rule = %finding.rule,
                        error = %e,
                        "giving up on finding after {} attempts",
                        attempt + 1
                    );
                }
            }
        }
    }

    /// A panicking committer counts as a failed attempt.
    fn try_commit(&mut self, finding: &Finding) -> Result<(), StorageError> {
        let committer = &mut self.committer;
        match panic::catch_unwind(AssertUnwindSafe(|| committer.commit(finding))) {
            Ok(result) => result,
            Err(payload) => Err(StorageError::CommitFailed {
                file: finding.file.clone(),
                line: finding.line,
                message: format!("committer panicked: {}", panic_message(payload.as_ref())),
            }),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
