//! Structured span field names shared by every paclint subsystem.

/// Pipeline: files ingested during the build stage.
pub const FILES_INGESTED: &str = "files_ingested";

/// Pipeline: files skipped by the eligibility filter.
pub const FILES_SKIPPED: &str = "files_skipped";

/// Graph: total builder writes at freeze time.
pub const GRAPH_WRITE_COUNT: &str = "graph_write_count";

/// Graph: packages in the frozen graph.
pub const PACKAGE_COUNT: &str = "package_count";

/// Graph: symbols in the frozen graph.
pub const SYMBOL_COUNT: &str = "symbol_count";

/// Pipeline: build stage duration in milliseconds.
pub const BUILD_DURATION_MS: &str = "build_duration_ms";

/// Pipeline: analysis stage duration in milliseconds.
pub const ANALYSIS_DURATION_MS: &str = "analysis_duration_ms";

/// Sink: findings committed.
pub const FINDINGS_COMMITTED: &str = "findings_committed";

/// Sink: findings that could not be committed.
pub const FINDINGS_FAILED: &str = "findings_failed";

/// Sink: sends that found the queue full.
pub const BACKPRESSURE_EVENTS: &str = "backpressure_events";
