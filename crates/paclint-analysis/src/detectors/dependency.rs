//! Package dependency rules: cycles, imports, transitive use, diamonds,
//! fan-out and layering.

use paclint_core::types::{Finding, RuleId};

use super::traits::{DetectionContext, Detector, DetectorCategory};
use crate::extract::patterns::{DATA_LAYER, UI_LAYER};
use crate::queries;

pub struct DependencyDetector;

const RULES: &[RuleId] = &[
    RuleId::CircularPackageDependency,
    RuleId::UnusedPackageImport,
    RuleId::MissingPackageImport,
    RuleId::TransitiveDependencyCouldBeDirect,
    RuleId::DiamondDependency,
    RuleId::GodPackageTooManyDependencies,
    RuleId::PackageDependsOnApplicationCode,
    RuleId::LayerViolation,
];

impl Detector for DependencyDetector {
    fn id(&self) -> &str {
        "package-dependencies"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Dependency
    }

    fn rules(&self) -> &'static [RuleId] {
        RULES
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        // Import checks apply to every file, packaged or not.
        for import in queries::unused_imports(ctx.graph, ctx.file_id, ctx.scan) {
            findings.push(ctx.finding(
                import.line,
                RuleId::UnusedPackageImport,
                format!("Unused import: {}", import.name),
            ));
        }
        for missing in queries::missing_imports(ctx.graph, ctx.scan) {
            findings.push(ctx.finding(
                missing.line,
                RuleId::MissingPackageImport,
                format!(
                    "Missing import for package: {} (needed by {})",
                    missing.package, missing.symbol
                ),
            ));
        }

        let Some(package) = ctx.package() else {
            return findings;
        };
        let line = ctx.package_line();
        let graph = ctx.graph;

        if let Some(cycle) = queries::find_cycle(graph, package) {
            findings.push(ctx.finding(
                line,
                RuleId::CircularPackageDependency,
                format!("Circular dependency detected: {}", cycle.join(" -> ")),
            ));
        }

        for dep in queries::could_be_direct(graph, package, ctx.file_id) {
            findings.push(ctx.finding(
                line,
                RuleId::TransitiveDependencyCouldBeDirect,
                format!("Add direct dependency on: {dep}"),
            ));
        }

        for diamond in queries::diamonds(graph, package) {
            findings.push(ctx.finding(
                line,
                RuleId::DiamondDependency,
                format!(
                    "Diamond dependency on {} via {}",
                    diamond.common,
                    diamond.via.join(", ")
                ),
            ));
        }

        let deps = graph.dependencies(package);
        let max = ctx.config.effective_max_dependencies();
        if deps.len() > max {
            findings.push(ctx.finding(
                line,
                RuleId::GodPackageTooManyDependencies,
                format!("Package has {} dependencies (max {max})", deps.len()),
            ));
        }

        if !is_application(package) {
            for dep in deps.iter().filter(|d| is_application(d)) {
                findings.push(ctx.finding(
                    line,
                    RuleId::PackageDependsOnApplicationCode,
                    format!("Library package depends on application: {dep}"),
                ));
            }
        }

        if UI_LAYER.is_match(package) {
            for dep in deps.iter().filter(|d| DATA_LAYER.is_match(d.as_str())) {
                findings.push(ctx.finding(
                    line,
                    RuleId::LayerViolation,
                    format!("UI layer should not depend directly on Data layer: {dep}"),
                ));
            }
        }

        findings
    }
}

fn is_application(package: &str) -> bool {
    package.contains("App") || package.contains("Main")
}
