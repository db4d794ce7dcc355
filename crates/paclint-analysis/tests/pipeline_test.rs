//! End-to-end pipeline tests: stage ordering, findings delivery, isolation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use paclint_analysis::detectors::{DetectionContext, Detector, DetectorCategory};
use paclint_analysis::units::{discover_units, MemoryUnit};
use paclint_analysis::AnalysisPipeline;
use paclint_core::config::PaclintConfig;
use paclint_core::errors::{DetectionError, PipelineError, StorageError};
use paclint_core::events::{
    AnalysisProgressEvent, BuildCompleteEvent, EventDispatcher, FileErrorEvent,
    PaclintEventHandler, SinkDrainedEvent,
};
use paclint_core::traits::{Cancellable, CancellationToken};
use paclint_core::types::{Finding, RuleId};
use paclint_storage::{FindingCommitter, MemoryCommitter};

fn config() -> PaclintConfig {
    let mut config = PaclintConfig::default();
    config.scan.threads = Some(4);
    config.sink.poll_interval_ms = Some(5);
    config
}

fn package(name: &str, needs: &str) -> String {
    format!("BeginPackage[\"{name}`\"]\nNeeds[\"{needs}`\"]\nEndPackage[]\n")
}

fn cycle_units() -> Vec<MemoryUnit> {
    vec![
        MemoryUnit::new("A.m", package("A", "B")),
        MemoryUnit::new("B.m", package("B", "C")),
        MemoryUnit::new("C.m", package("C", "A")),
    ]
}

fn of_rule(findings: &[Finding], rule: RuleId) -> Vec<&Finding> {
    findings.iter().filter(|f| f.rule == rule).collect()
}

#[test]
fn three_package_cycle_reports_once_per_file() {
    let memory = MemoryCommitter::new();
    let mut pipeline = AnalysisPipeline::new(config());
    let result = pipeline.run(&cycle_units(), Box::new(memory.clone())).unwrap();

    assert!(result.is_clean(), "unexpected errors: {:?}", result.errors);
    let findings = memory.findings();
    let cycles = of_rule(&findings, RuleId::CircularPackageDependency);
    assert_eq!(cycles.len(), 3);

    let mut files: Vec<&str> = cycles.iter().map(|f| f.file.as_str()).collect();
    files.sort_unstable();
    assert_eq!(files, ["A.m", "B.m", "C.m"]);

    for finding in cycles {
        let path = finding
            .message
            .strip_prefix("Circular dependency detected: ")
            .unwrap();
        assert_eq!(path.split(" -> ").count(), 3, "{}", finding.message);
        assert_eq!(finding.line, 1);
    }

    let summary = serde_json::to_value(&result.data).unwrap();
    assert_eq!(summary["package_count"], 3);
    assert_eq!(summary["write_stats"]["committed"], findings.len() as u64);
}

/// Records the graph's write count every time it runs.
struct WriteCountProbe {
    seen: Arc<Mutex<Vec<u64>>>,
}

impl Detector for WriteCountProbe {
    fn id(&self) -> &str {
        "write-count-probe"
    }
    fn category(&self) -> DetectorCategory {
        DetectorCategory::Consistency
    }
    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::DuplicateSymbolDefinition]
    }
    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Finding> {
        self.seen.lock().unwrap().push(ctx.graph.write_count());
        Vec::new()
    }
}

#[test]
fn analysis_only_sees_a_fully_built_graph() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let probe_seen = Arc::clone(&seen);
    let mut pipeline = AnalysisPipeline::new(config()).with_extra_detectors(move || {
        vec![Box::new(WriteCountProbe {
            seen: Arc::clone(&probe_seen),
        }) as Box<dyn Detector>]
    });

    let mut units = cycle_units();
    for i in 0..20 {
        units.push(MemoryUnit::new(
            format!("Extra{i}.m"),
            format!("BeginPackage[\"Extra{i}`\"]\nE{i}[x_] := A[x]\nEndPackage[]\n"),
        ));
    }
    let result = pipeline.run(&units, Box::new(MemoryCommitter::new())).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), units.len());
    assert!(result.data.graph_write_count > 0);
    assert!(seen.iter().all(|&c| c == result.data.graph_write_count));
}

struct SlowCommitter {
    inner: MemoryCommitter,
}

impl FindingCommitter for SlowCommitter {
    fn commit(&mut self, finding: &Finding) -> Result<(), StorageError> {
        thread::sleep(Duration::from_millis(1));
        self.inner.commit(finding)
    }
}

#[test]
fn slow_sink_loses_no_findings() {
    let memory = MemoryCommitter::new();
    let mut config = config();
    config.sink.channel_capacity = Some(2);

    let mut units = cycle_units();
    for i in 0..30 {
        units.push(MemoryUnit::new(
            format!("Loose{i}.m"),
            format!("BeginPackage[\"loose{i}`\"]\nInternalHelper{i}[x_] := x\nEndPackage[]\n"),
        ));
    }

    let mut pipeline = AnalysisPipeline::new(config);
    let result = pipeline
        .run(
            &units,
            Box::new(SlowCommitter {
                inner: memory.clone(),
            }),
        )
        .unwrap();

    let stats = result.data.write_stats;
    assert!(result.data.findings > units.len());
    assert_eq!(stats.received, result.data.findings as u64);
    assert_eq!(stats.committed, result.data.findings as u64);
    assert_eq!(memory.len(), result.data.findings);
    assert!(!stats.timed_out);
}

struct Exploding;

impl Detector for Exploding {
    fn id(&self) -> &str {
        "exploding"
    }
    fn category(&self) -> DetectorCategory {
        DetectorCategory::Hygiene
    }
    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::PackageTooLarge]
    }
    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Finding> {
        if ctx.file_id == "B.m" {
            panic!("cannot handle B");
        }
        Vec::new()
    }
}

#[test]
fn detector_panic_is_isolated_to_its_file() {
    let memory = MemoryCommitter::new();
    let mut pipeline = AnalysisPipeline::new(config())
        .with_extra_detectors(|| vec![Box::new(Exploding) as Box<dyn Detector>]);
    let result = pipeline.run(&cycle_units(), Box::new(memory.clone())).unwrap();

    assert_eq!(result.data.files_analyzed, 3);
    assert_eq!(result.error_count(), 1);
    assert!(matches!(
        &result.errors[0],
        PipelineError::Detection(DetectionError::DetectorPanic { id, file, .. })
            if id == "exploding" && file == "B.m"
    ));
    // Built-in detectors still ran on B.m.
    let findings = memory.findings();
    assert!(of_rule(&findings, RuleId::CircularPackageDependency)
        .iter()
        .any(|f| f.file == "B.m"));
}

#[test]
fn units_outside_limits_are_skipped() {
    let mut config = config();
    config.scan.max_file_size = Some(200);
    let mut units = cycle_units();
    units.push(MemoryUnit::new("Tiny.m", "BeginPackage[\"Tiny`\"]\nEndPackage[]\n"));
    units.push(MemoryUnit::new(
        "Huge.m",
        format!("BeginPackage[\"Huge`\"]\n{}EndPackage[]\n", "x = 1;\n".repeat(100)),
    ));

    let memory = MemoryCommitter::new();
    let mut pipeline = AnalysisPipeline::new(config);
    let result = pipeline.run(&units, Box::new(memory.clone())).unwrap();

    assert_eq!(result.data.files_total, 5);
    assert_eq!(result.data.files_skipped, 2);
    assert_eq!(result.data.files_ingested, 3);
    assert_eq!(result.data.package_count, 3);
    assert!(memory
        .findings()
        .iter()
        .all(|f| f.file != "Tiny.m" && f.file != "Huge.m"));
}

#[test]
fn cancellation_stops_analysis_but_not_the_build() {
    let token = CancellationToken::new();
    token.cancel();
    let memory = MemoryCommitter::new();
    let mut pipeline = AnalysisPipeline::new(config()).with_cancellation(token.clone());
    let result = pipeline.run(&cycle_units(), Box::new(memory.clone())).unwrap();

    assert!(result.data.cancelled);
    assert_eq!(result.data.files_ingested, 3);
    assert_eq!(result.data.files_analyzed, 0);
    assert!(memory.is_empty());
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e, PipelineError::Cancelled)));

    token.reset();
    let result = pipeline.run(&cycle_units(), Box::new(MemoryCommitter::new())).unwrap();
    assert!(!result.data.cancelled);
    assert_eq!(result.data.files_analyzed, 3);
}

#[test]
fn disabled_rules_never_reach_the_sink() {
    let mut config = config();
    config.analysis.disabled_rules = vec!["circular-package-dependency".to_string()];
    let memory = MemoryCommitter::new();
    let mut pipeline = AnalysisPipeline::new(config);
    pipeline.run(&cycle_units(), Box::new(memory.clone())).unwrap();

    let findings = memory.findings();
    assert!(of_rule(&findings, RuleId::CircularPackageDependency).is_empty());
    assert!(!findings.is_empty());
}

#[derive(Default)]
struct Recorder {
    builds: AtomicUsize,
    progress: AtomicUsize,
    drained: AtomicUsize,
    file_errors: Mutex<Vec<String>>,
}

impl PaclintEventHandler for Recorder {
    fn on_build_complete(&self, event: &BuildCompleteEvent) {
        assert_eq!(event.package_count, 3);
        self.builds.fetch_add(1, Ordering::SeqCst);
    }
    fn on_analysis_progress(&self, _event: &AnalysisProgressEvent) {
        self.progress.fetch_add(1, Ordering::SeqCst);
    }
    fn on_sink_drained(&self, event: &SinkDrainedEvent) {
        assert!(!event.timed_out);
        self.drained.fetch_add(1, Ordering::SeqCst);
    }
    fn on_file_error(&self, event: &FileErrorEvent) {
        self.file_errors.lock().unwrap().push(event.file.clone());
    }
}

#[test]
fn filesystem_run_reports_events_and_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    for (name, needs) in [("A", "B"), ("B", "C"), ("C", "A")] {
        std::fs::write(dir.path().join(format!("{name}.m")), package(name, needs)).unwrap();
    }
    let gone = dir.path().join("Gone.wl");
    std::fs::write(&gone, package("Gone", "A")).unwrap();

    let mut config = config();
    config.sink.progress_interval = Some(1);
    let units = discover_units(dir.path(), &config.scan).unwrap();
    assert_eq!(units.len(), 4);
    std::fs::remove_file(&gone).unwrap();

    let recorder = Arc::new(Recorder::default());
    let mut events = EventDispatcher::new();
    events.register(recorder.clone());

    let memory = MemoryCommitter::new();
    let mut pipeline = AnalysisPipeline::new(config).with_events(events);
    let result = pipeline.run(&units, Box::new(memory.clone())).unwrap();

    assert_eq!(result.data.files_failed, 1);
    assert_eq!(result.data.files_analyzed, 3);
    assert_eq!(*recorder.file_errors.lock().unwrap(), vec!["Gone.wl".to_string()]);
    assert_eq!(recorder.builds.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.progress.load(Ordering::SeqCst), 3);
    assert_eq!(recorder.drained.load(Ordering::SeqCst), 1);
    assert_eq!(
        of_rule(&memory.findings(), RuleId::CircularPackageDependency).len(),
        3
    );
}
