//! FindingWriter tests: no lost findings, backpressure, retries, bounded shutdown.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use paclint_core::config::SinkConfig;
use paclint_core::errors::StorageError;
use paclint_core::types::{Finding, RuleId};
use paclint_storage::{FindingCommitter, FindingWriter, JsonLinesCommitter, MemoryCommitter};

fn finding(file: &str, line: u32) -> Finding {
    Finding::new(file, line, RuleId::CircularPackageDependency, "cycle")
}

fn config(capacity: usize) -> SinkConfig {
    SinkConfig {
        channel_capacity: Some(capacity),
        poll_interval_ms: Some(5),
        ..Default::default()
    }
}

/// Sleeps before every commit, then forwards to memory.
struct SlowCommitter {
    delay: Duration,
    inner: MemoryCommitter,
}

impl FindingCommitter for SlowCommitter {
    fn commit(&mut self, finding: &Finding) -> Result<(), StorageError> {
        thread::sleep(self.delay);
        self.inner.commit(finding)
    }
}

/// Fails the first `failures` attempts, then succeeds.
struct FlakyCommitter {
    failures: Arc<AtomicU32>,
    inner: MemoryCommitter,
}

impl FindingCommitter for FlakyCommitter {
    fn commit(&mut self, finding: &Finding) -> Result<(), StorageError> {
        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StorageError::CommitFailed {
                file: finding.file.clone(),
                line: finding.line,
                message: "host busy".to_string(),
            });
        }
        self.inner.commit(finding)
    }
}

/// Blocks every commit until the gate's sender is dropped.
struct GatedCommitter {
    gate: crossbeam_channel::Receiver<()>,
    inner: MemoryCommitter,
}

impl FindingCommitter for GatedCommitter {
    fn commit(&mut self, finding: &Finding) -> Result<(), StorageError> {
        let _ = self.gate.recv();
        self.inner.commit(finding)
    }
}

struct BrokenCommitter;

impl FindingCommitter for BrokenCommitter {
    fn commit(&mut self, finding: &Finding) -> Result<(), StorageError> {
        Err(StorageError::CommitFailed {
            file: finding.file.clone(),
            line: finding.line,
            message: "host gone".to_string(),
        })
    }
}

struct PanickingCommitter;

impl FindingCommitter for PanickingCommitter {
    fn commit(&mut self, _finding: &Finding) -> Result<(), StorageError> {
        panic!("host API blew up");
    }
}

#[test]
fn slow_committer_loses_nothing() {
    let memory = MemoryCommitter::new();
    let committer = SlowCommitter {
        delay: Duration::from_millis(1),
        inner: memory.clone(),
    };
    let writer = FindingWriter::new(Box::new(committer), &config(8)).unwrap();

    let n = 200;
    for i in 0..n {
        writer.send(finding("slow.m", i + 1)).unwrap();
    }
    let stats = writer.shutdown().unwrap();

    assert_eq!(stats.received, n as u64);
    assert_eq!(stats.committed, n as u64);
    assert_eq!(stats.failed, 0);
    assert_eq!(memory.len(), n as usize);
}

#[test]
fn full_queue_blocks_instead_of_dropping() {
    let memory = MemoryCommitter::new();
    let committer = SlowCommitter {
        delay: Duration::from_millis(2),
        inner: memory.clone(),
    };
    let writer = FindingWriter::new(Box::new(committer), &config(1)).unwrap();

    for i in 0..20 {
        writer.send(finding("bp.m", i + 1)).unwrap();
    }
    let stats = writer.shutdown().unwrap();

    assert!(stats.backpressure > 0, "capacity 1 with a slow consumer must fill up");
    assert_eq!(stats.committed, 20);
    assert_eq!(memory.len(), 20);
}

#[test]
fn concurrent_producers_all_land() {
    let memory = MemoryCommitter::new();
    let writer = Arc::new(FindingWriter::new(Box::new(memory.clone()), &config(16)).unwrap());

    let producers: Vec<_> = (0..8)
        .map(|t| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                for line in 1..=250 {
                    writer.send(finding(&format!("worker{t}.m"), line)).unwrap();
                }
            })
        })
        .collect();
    for p in producers {
        p.join().unwrap();
    }

    let writer = Arc::try_unwrap(writer).unwrap_or_else(|_| panic!("producers still hold the writer"));
    let stats = writer.shutdown().unwrap();
    assert_eq!(stats.committed, 2000);

    // Per-producer order is preserved even though producers interleave.
    let committed = memory.findings();
    for t in 0..8 {
        let file = format!("worker{t}.m");
        let lines: Vec<u32> = committed
            .iter()
            .filter(|f| f.file == file)
            .map(|f| f.line)
            .collect();
        assert_eq!(lines, (1..=250).collect::<Vec<_>>());
    }
}

#[test]
fn transient_failures_are_retried() {
    let memory = MemoryCommitter::new();
    let committer = FlakyCommitter {
        failures: Arc::new(AtomicU32::new(2)),
        inner: memory.clone(),
    };
    let writer = FindingWriter::new(Box::new(committer), &config(4)).unwrap();
    writer.send(finding("flaky.m", 7)).unwrap();
    let stats = writer.shutdown().unwrap();

    assert_eq!(stats.retries, 2);
    assert_eq!(stats.committed, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(memory.findings()[0].line, 7);
}

#[test]
fn permanent_failures_are_counted_not_hidden() {
    let cfg = SinkConfig {
        max_commit_retries: Some(1),
        ..config(4)
    };
    let writer = FindingWriter::new(Box::new(BrokenCommitter), &cfg).unwrap();
    writer.send(finding("a.m", 1)).unwrap();
    writer.send(finding("b.m", 2)).unwrap();
    let stats = writer.shutdown().unwrap();

    assert_eq!(stats.received, 2);
    assert_eq!(stats.committed, 0);
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.retries, 2);
    assert_eq!(stats.outstanding(), 0);
}

#[test]
fn panicking_committer_does_not_kill_the_consumer() {
    let cfg = SinkConfig {
        max_commit_retries: Some(0),
        ..config(4)
    };
    let writer = FindingWriter::new(Box::new(PanickingCommitter), &cfg).unwrap();
    for i in 0..3 {
        writer.send(finding("p.m", i + 1)).unwrap();
    }
    let stats = writer.shutdown().unwrap();
    assert_eq!(stats.failed, 3);
    assert!(!stats.timed_out);
}

#[test]
fn send_gives_up_when_the_committer_hangs() {
    let (release, gate) = crossbeam_channel::bounded::<()>(0);
    let memory = MemoryCommitter::new();
    let committer = GatedCommitter {
        gate,
        inner: memory.clone(),
    };
    let cfg = SinkConfig {
        send_timeout_ms: Some(100),
        ..config(1)
    };
    let writer = FindingWriter::new(Box::new(committer), &cfg).unwrap();

    let start = Instant::now();
    let mut stalled = None;
    let mut accepted = 0u64;
    for i in 0..5 {
        match writer.send(finding("hung.m", i + 1)) {
            Ok(()) => accepted += 1,
            Err(e) => {
                stalled = Some(e);
                break;
            }
        }
    }
    assert!(start.elapsed() < Duration::from_secs(2), "send waited {:?}", start.elapsed());
    assert!(matches!(stalled, Some(StorageError::QueueStalled { waited_ms }) if waited_ms >= 100));

    drop(release);
    let stats = writer.shutdown().unwrap();
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.received, accepted);
    assert_eq!(stats.committed, accepted);
    assert_eq!(memory.len() as u64, accepted);
}

#[test]
fn shutdown_timeout_is_soft() {
    let memory = MemoryCommitter::new();
    let committer = SlowCommitter {
        delay: Duration::from_millis(200),
        inner: memory.clone(),
    };
    let cfg = SinkConfig {
        shutdown_timeout_ms: Some(50),
        ..config(16)
    };
    let writer = FindingWriter::new(Box::new(committer), &cfg).unwrap();
    for i in 0..5 {
        writer.send(finding("stuck.m", i + 1)).unwrap();
    }
    let stats = writer.shutdown().unwrap();

    assert!(stats.timed_out);
    assert_eq!(stats.received, 5);
    assert!(stats.committed < 5);
    assert!(stats.outstanding() > 0);
}

#[test]
fn json_lines_file_has_one_record_per_finding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("findings.jsonl");
    let file = std::fs::File::create(&path).unwrap();

    let writer = FindingWriter::new(
        Box::new(JsonLinesCommitter::new(std::io::BufWriter::new(file))),
        &config(4),
    )
    .unwrap();
    for i in 0..10 {
        writer.send(finding("out.m", i + 1)).unwrap();
    }
    let stats = writer.shutdown().unwrap();
    assert!(!stats.flush_failed);

    let text = std::fs::read_to_string(&path).unwrap();
    let parsed: Vec<Finding> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(parsed.len(), 10);
    assert_eq!(parsed[9].line, 10);
    assert_eq!(parsed[0].rule, RuleId::CircularPackageDependency);
}
