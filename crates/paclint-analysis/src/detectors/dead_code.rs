//! Unused, barely used and over-used symbols.

use paclint_core::types::{Finding, RuleId};

use super::traits::{DetectionContext, Detector, DetectorCategory};
use crate::queries;

pub struct DeadCodeDetector;

const RULES: &[RuleId] = &[
    RuleId::UnusedPublicFunction,
    RuleId::UnusedExport,
    RuleId::DeadPackage,
    RuleId::FunctionOnlyCalledOnce,
    RuleId::OverAbstractedApi,
    RuleId::InternalApiUsedLikePublic,
    RuleId::DeprecatedApiStillUsed,
];

impl Detector for DeadCodeDetector {
    fn id(&self) -> &str {
        "dead-code"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::DeadCode
    }

    fn rules(&self) -> &'static [RuleId] {
        RULES
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for symbol in &ctx.scan.deprecated {
            if ctx.graph.is_referenced_in(symbol, ctx.file_id) {
                findings.push(ctx.finding(
                    ctx.symbol_line(symbol),
                    RuleId::DeprecatedApiStillUsed,
                    format!("Deprecated symbol still used internally: {symbol}"),
                ));
            }
        }

        let Some(package) = ctx.package() else {
            return findings;
        };
        let graph = ctx.graph;

        for symbol in queries::unused_public(graph, package) {
            findings.push(ctx.finding(
                ctx.symbol_line(symbol),
                RuleId::UnusedPublicFunction,
                format!("Exported function never called: {symbol}"),
            ));
        }
        for symbol in queries::unused_exports(graph, package, ctx.file_id) {
            findings.push(ctx.finding(
                ctx.symbol_line(symbol),
                RuleId::UnusedExport,
                format!("Symbol exported but only used internally: {symbol}"),
            ));
        }
        if queries::is_dead_package(graph, package, ctx.file_id) {
            findings.push(ctx.finding(
                ctx.package_line(),
                RuleId::DeadPackage,
                "Package not used externally - consider removing",
            ));
        }
        for symbol in queries::called_once(graph, package) {
            findings.push(ctx.finding(
                ctx.symbol_line(symbol),
                RuleId::FunctionOnlyCalledOnce,
                format!("Private function called only once - consider inlining: {symbol}"),
            ));
        }

        let limit = ctx.config.effective_over_abstraction_ratio();
        if let Some(ratio) = queries::abstraction_ratio(graph, package) {
            if ratio > limit {
                findings.push(ctx.finding(
                    ctx.package_line(),
                    RuleId::OverAbstractedApi,
                    format!("Ratio of private to public functions is very high ({ratio:.1}, max {limit})"),
                ));
            }
        }

        let heavy = u64::from(ctx.config.effective_heavy_private_use());
        for (symbol, count) in queries::heavily_used_private(graph, package, heavy) {
            findings.push(ctx.finding(
                ctx.symbol_line(symbol),
                RuleId::InternalApiUsedLikePublic,
                format!("Private symbol heavily used ({count} times) - consider making public: {symbol}"),
            ));
        }

        findings
    }
}
