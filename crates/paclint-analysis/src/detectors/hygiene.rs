//! Package hygiene: naming, size, load placement, context discipline.

use paclint_core::types::{Finding, RuleId};

use super::traits::{DetectionContext, Detector, DetectorCategory};
use crate::extract::patterns::PASCAL_SEGMENT;

pub struct HygieneDetector;

const RULES: &[RuleId] = &[
    RuleId::InconsistentPackageNaming,
    RuleId::PackageTooLarge,
    RuleId::PackageTooSmall,
    RuleId::CommentedOutPackageLoad,
    RuleId::ConditionalPackageLoad,
    RuleId::PublicApiOutsidePackageContext,
    RuleId::PrivateSymbolUsedExternally,
];

impl Detector for HygieneDetector {
    fn id(&self) -> &str {
        "package-hygiene"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Hygiene
    }

    fn rules(&self) -> &'static [RuleId] {
        RULES
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let scan = ctx.scan;

        if let Some(package) = ctx.package() {
            let line = ctx.package_line();
            for segment in package.split('`').filter(|s| !s.is_empty()) {
                if !PASCAL_SEGMENT.is_match(segment) {
                    findings.push(ctx.finding(
                        line,
                        RuleId::InconsistentPackageNaming,
                        format!("Package segment should use PascalCase: {segment}"),
                    ));
                }
                if segment.chars().count() < 2 {
                    findings.push(ctx.finding(
                        line,
                        RuleId::InconsistentPackageNaming,
                        format!("Package segment too short: {segment}"),
                    ));
                }
            }

            let lines = scan.line_count;
            let max = ctx.config.effective_max_package_lines();
            let min = ctx.config.effective_min_package_lines();
            if lines > max {
                findings.push(ctx.finding(
                    line,
                    RuleId::PackageTooLarge,
                    format!("Package has {lines} lines (max {max})"),
                ));
            } else if lines < min {
                findings.push(ctx.finding(
                    line,
                    RuleId::PackageTooSmall,
                    format!("Package has only {lines} lines (min {min}) - consider merging"),
                ));
            }
        }

        for &line in &scan.commented_loads {
            findings.push(ctx.finding(
                line,
                RuleId::CommentedOutPackageLoad,
                "Commented-out package load - remove if not needed",
            ));
        }

        if let Some(&line) = scan.conditional_loads.first() {
            findings.push(ctx.finding(
                line,
                RuleId::ConditionalPackageLoad,
                "Conditional package loading can cause load order issues",
            ));
        }

        for def in scan.definitions.iter().filter(|d| d.outside_context) {
            findings.push(ctx.finding(
                def.line,
                RuleId::PublicApiOutsidePackageContext,
                format!("Public function defined outside package context: {}", def.name),
            ));
        }

        let own = ctx.package();
        for reference in &scan.private_refs {
            if Some(reference.context.as_str()) == own {
                continue;
            }
            findings.push(ctx.finding(
                reference.line,
                RuleId::PrivateSymbolUsedExternally,
                format!(
                    "Using private symbol from another package: {}Private`{}",
                    reference.context, reference.symbol
                ),
            ));
        }

        findings
    }
}
