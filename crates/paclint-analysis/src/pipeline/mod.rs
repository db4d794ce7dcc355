//! Two-stage pipeline: sequential build, freeze, parallel analysis, drain, reset.

pub mod orchestrator;
pub mod summary;

pub use orchestrator::{AnalysisPipeline, DetectorFactory};
pub use summary::RunSummary;
