//! DetectorRegistry: the set of detectors one worker runs over each file.

use std::panic::{catch_unwind, AssertUnwindSafe};

use paclint_core::config::AnalysisConfig;
use paclint_core::errors::DetectionError;
use paclint_core::types::collections::FxHashSet;
use paclint_core::types::{Finding, RuleId};
use tracing::warn;

use super::traits::{DetectionContext, Detector};
use super::{
    ApiDetector, ConsistencyDetector, DeadCodeDetector, DependencyDetector, HygieneDetector,
    StabilityDetector, TestingDetector,
};

/// Findings and isolated failures from one file.
#[derive(Debug, Default)]
pub struct DetectionOutcome {
    pub findings: Vec<Finding>,
    pub errors: Vec<DetectionError>,
}

/// Registry of detectors, with rule filtering.
///
/// Each analysis worker builds its own registry, so detector instances and
/// whatever state they keep are never shared between threads.
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
    disabled: FxHashSet<RuleId>,
}

impl DetectorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
            disabled: FxHashSet::default(),
        }
    }

    /// Every built-in detector, with `config.disabled_rules` filtered out.
    pub fn with_defaults(config: &AnalysisConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DependencyDetector));
        registry.register(Box::new(StabilityDetector));
        registry.register(Box::new(ApiDetector));
        registry.register(Box::new(DeadCodeDetector));
        registry.register(Box::new(ConsistencyDetector));
        registry.register(Box::new(TestingDetector));
        registry.register(Box::new(HygieneDetector));
        registry.disable_rules(&config.disabled_rules);
        registry
    }

    pub fn register(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Suppress findings for the given rule keys. Unknown keys are logged and ignored.
    pub fn disable_rules(&mut self, keys: &[String]) {
        for key in keys {
            match RuleId::from_key(key) {
                Some(rule) => {
                    self.disabled.insert(rule);
                }
                None => warn!(rule = %key, "ignoring unknown rule key in disabled_rules"),
            }
        }
    }

    pub fn is_enabled(&self, rule: RuleId) -> bool {
        !self.disabled.contains(&rule)
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.id()).collect()
    }

    /// Run every detector over one file.
    ///
    /// A detector that panics is recorded as a `DetectorPanic` error for this
    /// file; the remaining detectors still run. A detector whose rules are
    /// all disabled is not run at all.
    pub fn run(&self, ctx: &DetectionContext<'_>) -> DetectionOutcome {
        let mut outcome = DetectionOutcome::default();
        for detector in &self.detectors {
            if detector.rules().iter().all(|r| !self.is_enabled(*r)) {
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| detector.detect(ctx))) {
                Ok(findings) => outcome
                    .findings
                    .extend(findings.into_iter().filter(|f| self.is_enabled(f.rule))),
                Err(payload) => {
                    let error = DetectionError::DetectorPanic {
                        id: detector.id().to_string(),
                        file: ctx.file_id.to_string(),
                        message: panic_message(payload.as_ref()),
                    };
                    warn!(detector = detector.id(), file = ctx.file_id, error = %error, "detector panicked");
                    outcome.errors.push(error);
                }
            }
        }
        outcome
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::with_defaults(&AnalysisConfig::default())
    }
}

impl std::fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorRegistry")
            .field("detectors", &self.ids())
            .field("disabled", &self.disabled.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
