//! paclint-analysis: the cross-file dependency and symbol model and the
//! two-stage pipeline that builds it once and analyzes every unit in parallel.

pub mod detectors;
pub mod extract;
pub mod graph;
pub mod pipeline;
pub mod queries;
pub mod units;

pub use graph::{DependencyGraph, GraphBuilder};
pub use pipeline::AnalysisPipeline;
