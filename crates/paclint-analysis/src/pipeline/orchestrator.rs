//! AnalysisPipeline: the run state machine.
//!
//! Select → Stage 1 (sequential ingest) → barrier (`finish`) → Stage 2
//! (rayon, one `DetectorRegistry` per worker) → drain the sink → reset.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use paclint_core::config::PaclintConfig;
use paclint_core::errors::{PipelineError, PipelineResult};
use paclint_core::events::{
    AnalysisCompleteEvent, AnalysisProgressEvent, AnalysisStartedEvent, BuildCompleteEvent,
    BuildStartedEvent, EventDispatcher, FileErrorEvent, SinkDrainedEvent,
};
use paclint_core::tracing::metrics;
use paclint_core::traits::{Cancellable, CancellationToken};
use paclint_storage::{FindingCommitter, FindingWriter};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::field::Empty;
use tracing::{debug, info, info_span, warn};

use super::summary::RunSummary;
use crate::detectors::{DetectionContext, Detector, DetectorRegistry};
use crate::extract::FileScan;
use crate::graph::{DependencyGraph, GraphBuilder};
use crate::units::SourceUnit;

/// Builds additional detectors for every worker registry.
pub type DetectorFactory = Arc<dyn Fn() -> Vec<Box<dyn Detector>> + Send + Sync>;

/// Runs the two-stage analysis over a set of source units.
///
/// The pipeline owns the graph builder between runs, so a second `run`
/// starts from cleared tables without reallocating them.
pub struct AnalysisPipeline {
    config: PaclintConfig,
    events: EventDispatcher,
    cancellation: CancellationToken,
    extra_detectors: Option<DetectorFactory>,
    builder: GraphBuilder,
}

/// What one Stage 2 worker produced for one unit.
enum FileOutcome {
    Analyzed {
        file: String,
        findings: usize,
        errors: Vec<PipelineError>,
    },
    Failed {
        file: String,
        error: PipelineError,
    },
    Cancelled,
}

impl AnalysisPipeline {
    pub fn new(config: PaclintConfig) -> Self {
        Self {
            config,
            events: EventDispatcher::new(),
            cancellation: CancellationToken::new(),
            extra_detectors: None,
            builder: GraphBuilder::new(),
        }
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Register host detectors next to the built-in ones. The factory is
    /// called once per worker registry.
    pub fn with_extra_detectors<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Vec<Box<dyn Detector>> + Send + Sync + 'static,
    {
        self.extra_detectors = Some(Arc::new(factory));
        self
    }

    pub fn config(&self) -> &PaclintConfig {
        &self.config
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Analyze `units` and deliver every finding through `committer`.
    ///
    /// Per-file failures (unreadable text, detector panics, sink errors) are
    /// collected in the result and never stop other files. Only failing to
    /// start the worker pool or the sink thread is fatal.
    pub fn run<U: SourceUnit>(
        &mut self,
        units: &[U],
        committer: Box<dyn FindingCommitter>,
    ) -> Result<PipelineResult<RunSummary>, PipelineError> {
        let pool = self.thread_pool()?;
        let writer = FindingWriter::new(committer, &self.config.sink)?;

        let mut result = PipelineResult::new(RunSummary {
            files_total: units.len(),
            ..Default::default()
        });

        let eligible = self.select(units, &mut result);
        let (graph, ingested) = self.build(eligible, &mut result);

        // Barrier: from here on the tables are only reachable through `&`.
        let graph = Arc::new(graph);
        self.analyze(&pool, &ingested, &graph, &writer, &mut result);
        self.drain(writer, &mut result);

        self.builder = match Arc::try_unwrap(graph) {
            Ok(graph) => graph.reset(),
            Err(_) => GraphBuilder::new(),
        };
        Ok(result)
    }

    fn thread_pool(&self) -> Result<ThreadPool, PipelineError> {
        ThreadPoolBuilder::new()
            .num_threads(self.config.scan.effective_threads())
            .thread_name(|i| format!("paclint-analysis-{i}"))
            .build()
            .map_err(|e| PipelineError::ThreadPool(e.to_string()))
    }

    /// Apply the size and line-count limits.
    fn select<'u, U: SourceUnit>(
        &self,
        units: &'u [U],
        result: &mut PipelineResult<RunSummary>,
    ) -> Vec<&'u U> {
        let scan = &self.config.scan;
        let max_size = scan.effective_max_file_size();
        let (min_lines, max_lines) = (scan.effective_min_lines(), scan.effective_max_lines());

        let mut eligible = Vec::with_capacity(units.len());
        for unit in units {
            let size = unit.size_bytes();
            if size > max_size {
                debug!(file = unit.id(), size, max_size, "skipping oversized unit");
                result.data.files_skipped += 1;
                continue;
            }
            match unit.line_count() {
                Ok(lines) if lines < min_lines || lines > max_lines => {
                    debug!(file = unit.id(), lines, "skipping unit outside line limits");
                    result.data.files_skipped += 1;
                }
                Ok(_) => eligible.push(unit),
                Err(e) => self.file_failed(unit.id(), e.into(), result),
            }
        }
        eligible
    }

    /// Stage 1. Strictly sequential: the builder is the only writer.
    fn build<'u, U: SourceUnit>(
        &mut self,
        eligible: Vec<&'u U>,
        result: &mut PipelineResult<RunSummary>,
    ) -> (DependencyGraph, Vec<&'u U>) {
        let span = info_span!(
            "build",
            files = eligible.len(),
            files_ingested = Empty,
            files_skipped = Empty,
            graph_write_count = Empty,
            package_count = Empty,
            symbol_count = Empty,
            build_duration_ms = Empty,
        );
        let _guard = span.enter();
        let start = Instant::now();
        self.events.emit_build_started(&BuildStartedEvent {
            file_count: eligible.len(),
        });

        let mut builder = std::mem::take(&mut self.builder);
        let mut ingested = Vec::with_capacity(eligible.len());
        for unit in eligible {
            match unit.text() {
                Ok(text) => {
                    builder.ingest(unit.id(), &text);
                    ingested.push(unit);
                }
                Err(e) => self.file_failed(unit.id(), e.into(), result),
            }
        }
        let graph = builder.finish();

        let summary = &mut result.data;
        summary.files_ingested = ingested.len();
        summary.graph_write_count = graph.write_count();
        summary.package_count = graph.package_count();
        summary.symbol_count = graph.symbol_count();
        summary.build_duration_ms = start.elapsed().as_millis() as u64;

        span.record(metrics::FILES_INGESTED, summary.files_ingested);
        span.record(metrics::FILES_SKIPPED, summary.files_skipped);
        span.record(metrics::GRAPH_WRITE_COUNT, summary.graph_write_count);
        span.record(metrics::PACKAGE_COUNT, summary.package_count);
        span.record(metrics::SYMBOL_COUNT, summary.symbol_count);
        span.record(metrics::BUILD_DURATION_MS, summary.build_duration_ms);
        info!(
            files = summary.files_ingested,
            packages = summary.package_count,
            symbols = summary.symbol_count,
            "graph built"
        );

        self.events.emit_build_complete(&BuildCompleteEvent {
            files_ingested: summary.files_ingested,
            files_skipped: summary.files_skipped,
            package_count: summary.package_count,
            symbol_count: summary.symbol_count,
            write_count: summary.graph_write_count,
            duration_ms: summary.build_duration_ms,
        });
        (graph, ingested)
    }

    /// Stage 2. Workers read the frozen graph and enqueue findings.
    fn analyze<U: SourceUnit>(
        &self,
        pool: &ThreadPool,
        units: &[&U],
        graph: &DependencyGraph,
        writer: &FindingWriter,
        result: &mut PipelineResult<RunSummary>,
    ) {
        let workers = pool.current_num_threads();
        let span = info_span!(
            "analyze",
            files = units.len(),
            workers,
            analysis_duration_ms = Empty,
        );
        let _guard = span.enter();
        let start = Instant::now();
        self.events.emit_analysis_started(&AnalysisStartedEvent {
            file_count: units.len(),
            workers,
        });

        let total = units.len();
        let interval = self.config.sink.effective_progress_interval();
        let processed = AtomicUsize::new(0);

        let outcomes: Vec<FileOutcome> = pool.install(|| {
            units
                .par_iter()
                .map_init(
                    || self.registry(),
                    |registry, unit| {
                        if self.cancellation.is_cancelled() {
                            return FileOutcome::Cancelled;
                        }
                        let outcome = self.analyze_unit(registry, *unit, graph, writer);
                        let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                        if done % interval == 0 || done == total {
                            self.events.emit_analysis_progress(&AnalysisProgressEvent {
                                processed: done,
                                total,
                            });
                        }
                        outcome
                    },
                )
                .collect()
        });

        let mut cancelled = 0usize;
        for outcome in outcomes {
            match outcome {
                FileOutcome::Analyzed {
                    file,
                    findings,
                    errors,
                } => {
                    result.data.files_analyzed += 1;
                    result.data.findings += findings;
                    for error in errors {
                        self.events.emit_file_error(&FileErrorEvent {
                            file: file.clone(),
                            error: error.to_string(),
                        });
                        result.add_error(error);
                    }
                }
                FileOutcome::Failed { file, error } => self.file_failed(&file, error, result),
                FileOutcome::Cancelled => cancelled += 1,
            }
        }
        if cancelled > 0 {
            warn!(skipped = cancelled, "analysis cancelled before every file was processed");
            result.data.cancelled = true;
            result.add_error(PipelineError::Cancelled);
        }

        result.data.analysis_duration_ms = start.elapsed().as_millis() as u64;
        span.record(metrics::ANALYSIS_DURATION_MS, result.data.analysis_duration_ms);
        info!(
            files = result.data.files_analyzed,
            findings = result.data.findings,
            "analysis complete"
        );
        self.events.emit_analysis_complete(&AnalysisCompleteEvent {
            files_analyzed: result.data.files_analyzed,
            findings: result.data.findings,
            duration_ms: result.data.analysis_duration_ms,
        });
    }

    fn analyze_unit<U: SourceUnit>(
        &self,
        registry: &DetectorRegistry,
        unit: &U,
        graph: &DependencyGraph,
        writer: &FindingWriter,
    ) -> FileOutcome {
        let file = unit.id().to_string();
        let text = match unit.text() {
            Ok(text) => text,
            Err(e) => {
                return FileOutcome::Failed {
                    file,
                    error: e.into(),
                }
            }
        };
        let scan = FileScan::scan(&text);
        let ctx = DetectionContext::new(&file, &scan, graph, &self.config.analysis);
        let outcome = registry.run(&ctx);

        let mut errors: Vec<PipelineError> =
            outcome.errors.into_iter().map(PipelineError::from).collect();
        let mut sent = 0;
        for finding in outcome.findings {
            if let Err(e) = writer.send(finding) {
                errors.push(e.into());
                break;
            }
            sent += 1;
        }
        FileOutcome::Analyzed {
            file,
            findings: sent,
            errors,
        }
    }

    /// A private registry for one worker.
    fn registry(&self) -> DetectorRegistry {
        let mut registry = DetectorRegistry::with_defaults(&self.config.analysis);
        if let Some(factory) = &self.extra_detectors {
            for detector in factory() {
                registry.register(detector);
            }
        }
        registry
    }

    fn drain(&self, writer: FindingWriter, result: &mut PipelineResult<RunSummary>) {
        let span = info_span!(
            "drain",
            findings_committed = Empty,
            findings_failed = Empty,
            backpressure_events = Empty,
        );
        let _guard = span.enter();
        match writer.shutdown() {
            Ok(stats) => {
                span.record(metrics::FINDINGS_COMMITTED, stats.committed);
                span.record(metrics::FINDINGS_FAILED, stats.failed);
                span.record(metrics::BACKPRESSURE_EVENTS, stats.backpressure);
                self.events.emit_sink_drained(&SinkDrainedEvent {
                    committed: stats.committed,
                    failed: stats.failed,
                    timed_out: stats.timed_out,
                });
                result.data.write_stats = stats;
            }
            Err(e) => {
                warn!(error = %e, "finding sink failed during shutdown");
                result.add_error(e.into());
            }
        }
    }

    fn file_failed(&self, file: &str, error: PipelineError, result: &mut PipelineResult<RunSummary>) {
        warn!(file, error = %error, "skipping unit");
        self.events.emit_file_error(&FileErrorEvent {
            file: file.to_string(),
            error: error.to_string(),
        });
        result.data.files_failed += 1;
        result.add_error(error);
    }
}

impl std::fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisPipeline")
            .field("config", &self.config)
            .field("events", &self.events)
            .field("extra_detectors", &self.extra_detectors.is_some())
            .finish()
    }
}
