//! Detector system: one detector per rule family.
//!
//! Each detector implements the `Detector` trait and reads the frozen
//! `DependencyGraph` plus the current file's `FileScan`. Workers own their
//! `DetectorRegistry`; nothing here is shared between threads.

pub mod api;
pub mod consistency;
pub mod dead_code;
pub mod dependency;
pub mod hygiene;
pub mod registry;
pub mod stability;
pub mod testing;
pub mod traits;

pub use api::ApiDetector;
pub use consistency::ConsistencyDetector;
pub use dead_code::DeadCodeDetector;
pub use dependency::DependencyDetector;
pub use hygiene::HygieneDetector;
pub use registry::{DetectionOutcome, DetectorRegistry};
pub use stability::StabilityDetector;
pub use testing::TestingDetector;
pub use traits::{DetectionContext, Detector, DetectorCategory};

#[cfg(test)]
pub(crate) mod test_support {
    use paclint_core::config::AnalysisConfig;
    use paclint_core::types::Finding;

    use super::{DetectionContext, Detector};
    use crate::extract::FileScan;
    use crate::graph::GraphBuilder;

    /// Build a graph from `files` and run `detector` on `target`.
    pub fn run_with(
        detector: &dyn Detector,
        files: &[(&str, &str)],
        target: &str,
        config: &AnalysisConfig,
    ) -> Vec<Finding> {
        let mut builder = GraphBuilder::new();
        for (id, text) in files {
            builder.ingest(id, text);
        }
        let graph = builder.finish();
        let text = files
            .iter()
            .find(|(id, _)| *id == target)
            .map(|(_, t)| *t)
            .unwrap_or_else(|| panic!("{target} is not among the test files"));
        let scan = FileScan::scan(text);
        detector.detect(&DetectionContext::new(target, &scan, &graph, config))
    }

    pub fn run_on(detector: &dyn Detector, files: &[(&str, &str)], target: &str) -> Vec<Finding> {
        run_with(detector, files, target, &AnalysisConfig::default())
    }
}
