use paclint_storage::WriteStats;
use serde::Serialize;

/// Counts from one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Units handed to `run`.
    pub files_total: usize,
    /// Units rejected by the size and line-count limits.
    pub files_skipped: usize,
    /// Units merged into the graph in Stage 1.
    pub files_ingested: usize,
    /// Units whose detectors ran in Stage 2.
    pub files_analyzed: usize,
    /// Units that failed to read in either stage.
    pub files_failed: usize,
    /// Findings handed to the sink.
    pub findings: usize,
    /// Builder writes at the barrier.
    pub graph_write_count: u64,
    pub package_count: usize,
    pub symbol_count: usize,
    pub build_duration_ms: u64,
    pub analysis_duration_ms: u64,
    /// Stage 2 stopped early on a cancellation request.
    pub cancelled: bool,
    pub write_stats: WriteStats,
}
