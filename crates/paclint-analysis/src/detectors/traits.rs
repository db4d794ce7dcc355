//! Detector trait, categories and the per-file detection context.

use paclint_core::config::AnalysisConfig;
use paclint_core::types::{Finding, RuleId};

use crate::extract::FileScan;
use crate::graph::DependencyGraph;

/// Trait that every detector must implement.
///
/// Detectors are owned by one worker at a time, but `Sync` lets a host
/// share stateless ones if it wants to.
pub trait Detector: Send + Sync {
    /// Unique identifier for this detector.
    fn id(&self) -> &str;

    fn category(&self) -> DetectorCategory;

    /// Rules this detector can report.
    fn rules(&self) -> &'static [RuleId];

    /// Run detection for one file against the frozen graph.
    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Finding>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorCategory {
    Dependency,
    Stability,
    Api,
    DeadCode,
    Consistency,
    Testing,
    Hygiene,
}

impl DetectorCategory {
    pub fn all() -> &'static [DetectorCategory] {
        &[
            Self::Dependency, Self::Stability, Self::Api, Self::DeadCode,
            Self::Consistency, Self::Testing, Self::Hygiene,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dependency => "dependency", Self::Stability => "stability",
            Self::Api => "api", Self::DeadCode => "dead-code",
            Self::Consistency => "consistency", Self::Testing => "testing",
            Self::Hygiene => "hygiene",
        }
    }
}

/// Everything a detector may read while analyzing one file.
#[derive(Clone, Copy)]
pub struct DetectionContext<'a> {
    pub file_id: &'a str,
    pub scan: &'a FileScan,
    pub graph: &'a DependencyGraph,
    pub config: &'a AnalysisConfig,
}

impl<'a> DetectionContext<'a> {
    pub fn new(
        file_id: &'a str,
        scan: &'a FileScan,
        graph: &'a DependencyGraph,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self {
            file_id,
            scan,
            graph,
            config,
        }
    }

    /// The package this file declares.
    pub fn package(&self) -> Option<&'a str> {
        self.scan.package_name()
    }

    /// Line that package-level findings are attached to.
    pub fn package_line(&self) -> u32 {
        self.scan.package_line()
    }

    /// Definition line of `symbol` in this file, else the package line.
    pub fn symbol_line(&self, symbol: &str) -> u32 {
        self.scan
            .definition_line(symbol)
            .unwrap_or_else(|| self.package_line())
    }

    pub fn finding(&self, line: u32, rule: RuleId, message: impl Into<String>) -> Finding {
        Finding::new(self.file_id, line, rule, message)
    }
}
