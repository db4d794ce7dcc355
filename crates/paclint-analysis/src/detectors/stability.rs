//! Stable packages must not depend on unstable ones.

use paclint_core::types::{Finding, RuleId};

use super::traits::{DetectionContext, Detector, DetectorCategory};
use crate::queries;

pub struct StabilityDetector;

impl Detector for StabilityDetector {
    fn id(&self) -> &str {
        "package-stability"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Stability
    }

    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::UnstableDependency]
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Finding> {
        let Some(package) = ctx.package() else {
            return Vec::new();
        };
        let own = queries::instability(ctx.graph, package);
        queries::unstable_dependencies(
            ctx.graph,
            package,
            ctx.config.effective_stable_threshold(),
            ctx.config.effective_unstable_threshold(),
        )
        .into_iter()
        .map(|(dep, instability)| {
            ctx.finding(
                ctx.package_line(),
                RuleId::UnstableDependency,
                format!(
                    "Stable package (instability {own:.2}) depends on unstable {dep} (instability {instability:.2})"
                ),
            )
        })
        .collect()
    }
}
