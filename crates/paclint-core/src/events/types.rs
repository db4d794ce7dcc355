//! Event payloads emitted by the pipeline.

#[derive(Debug, Clone)]
pub struct BuildStartedEvent {
    pub file_count: usize,
}

#[derive(Debug, Clone)]
pub struct BuildCompleteEvent {
    pub files_ingested: usize,
    pub files_skipped: usize,
    pub package_count: usize,
    pub symbol_count: usize,
    pub write_count: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone)]
pub struct AnalysisStartedEvent {
    pub file_count: usize,
    pub workers: usize,
}

#[derive(Debug, Clone)]
pub struct AnalysisProgressEvent {
    pub processed: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct AnalysisCompleteEvent {
    pub files_analyzed: usize,
    pub findings: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone)]
pub struct FileErrorEvent {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct SinkDrainedEvent {
    pub committed: u64,
    pub failed: u64,
    pub timed_out: bool,
}
