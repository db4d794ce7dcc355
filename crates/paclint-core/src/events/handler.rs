//! PaclintEventHandler trait, every method a no-op by default.

use super::types::*;

/// Receives pipeline events. Implement only the methods you need.
/// `Send + Sync` because analysis workers emit from many threads.
pub trait PaclintEventHandler: Send + Sync {
    // ---- Build stage ----
    fn on_build_started(&self, _event: &BuildStartedEvent) {}
    fn on_build_complete(&self, _event: &BuildCompleteEvent) {}

    // ---- Analysis stage ----
    fn on_analysis_started(&self, _event: &AnalysisStartedEvent) {}
    fn on_analysis_progress(&self, _event: &AnalysisProgressEvent) {}
    fn on_analysis_complete(&self, _event: &AnalysisCompleteEvent) {}

    // ---- Sink ----
    fn on_sink_drained(&self, _event: &SinkDrainedEvent) {}

    // ---- Errors ----
    fn on_file_error(&self, _event: &FileErrorEvent) {}
}
