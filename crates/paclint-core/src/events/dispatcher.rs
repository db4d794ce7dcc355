//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use super::handler::PaclintEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
/// With no handlers registered, every `emit_*` is an empty loop.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn PaclintEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn register(&mut self, handler: Arc<dyn PaclintEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// A panicking handler is logged and skipped; later handlers still run.
    fn emit<F: Fn(&dyn PaclintEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing with remaining handlers");
            }
        }
    }

    pub fn emit_build_started(&self, event: &BuildStartedEvent) {
        self.emit(|h| h.on_build_started(event));
    }

    pub fn emit_build_complete(&self, event: &BuildCompleteEvent) {
        self.emit(|h| h.on_build_complete(event));
    }

    pub fn emit_analysis_started(&self, event: &AnalysisStartedEvent) {
        self.emit(|h| h.on_analysis_started(event));
    }

    pub fn emit_analysis_progress(&self, event: &AnalysisProgressEvent) {
        self.emit(|h| h.on_analysis_progress(event));
    }

    pub fn emit_analysis_complete(&self, event: &AnalysisCompleteEvent) {
        self.emit(|h| h.on_analysis_complete(event));
    }

    pub fn emit_sink_drained(&self, event: &SinkDrainedEvent) {
        self.emit(|h| h.on_sink_drained(event));
    }

    pub fn emit_file_error(&self, event: &FileErrorEvent) {
        self.emit(|h| h.on_file_error(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
