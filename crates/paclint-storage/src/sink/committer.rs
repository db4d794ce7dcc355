//! Committers: the final destination of a finding.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use paclint_core::errors::StorageError;
use paclint_core::types::Finding;
use tracing::info;

/// Persists findings one at a time on the sink's consumer thread.
///
/// Only the consumer thread calls `commit`, so implementations need `Send`
/// but not `Sync`. A failed commit is retried by the writer.
pub trait FindingCommitter: Send {
    fn commit(&mut self, finding: &Finding) -> Result<(), StorageError>;

    /// Called once after the queue is drained.
    fn flush(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Collects findings in memory. Clones share the same buffer, so a caller
/// can keep one clone and hand the other to the writer.
#[derive(Debug, Clone, Default)]
pub struct MemoryCommitter {
    findings: Arc<Mutex<Vec<Finding>>>,
}

impl MemoryCommitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything committed so far, in commit order.
    pub fn findings(&self) -> Vec<Finding> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Finding>> {
        // A panic while holding the lock cannot leave a half-pushed Vec.
        self.findings.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FindingCommitter for MemoryCommitter {
    fn commit(&mut self, finding: &Finding) -> Result<(), StorageError> {
        self.lock().push(finding.clone());
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonLinesCommitter<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinesCommitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> FindingCommitter for JsonLinesCommitter<W> {
    fn commit(&mut self, finding: &Finding) -> Result<(), StorageError> {
        serde_json::to_writer(&mut self.out, finding).map_err(|e| StorageError::CommitFailed {
            file: finding.file.clone(),
            line: finding.line,
            message: e.to_string(),
        })?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Emits every finding as a structured `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCommitter;

impl FindingCommitter for LogCommitter {
    fn commit(&mut self, finding: &Finding) -> Result<(), StorageError> {
        info!(
            file = %finding.file,
            line = finding.line,
            rule = %finding.rule,
            "{}",
            finding.message
        );
        Ok(())
    }
}
