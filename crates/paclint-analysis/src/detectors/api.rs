//! Public API shape: export counts, naming, pairing, documentation, versioning.

use paclint_core::types::{Finding, RuleId};

use super::traits::{DetectionContext, Detector, DetectorCategory};
use crate::extract::patterns::{IMPLEMENTATION_DETAIL_NAME, INTERNAL_NAME};
use crate::extract::Scope;
use crate::queries;

pub struct ApiDetector;

const RULES: &[RuleId] = &[
    RuleId::PackageExportsTooMuch,
    RuleId::PackageExportsTooLittle,
    RuleId::IncompletePublicApi,
    RuleId::InternalImplementationExposed,
    RuleId::PublicFunctionWithImplementationDetailsInName,
    RuleId::PublicExportMissingUsageMessage,
    RuleId::MissingPackageVersion,
    RuleId::MissingPackageDocumentation,
];

impl Detector for ApiDetector {
    fn id(&self) -> &str {
        "public-api"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Api
    }

    fn rules(&self) -> &'static [RuleId] {
        RULES
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Finding> {
        let Some(package) = ctx.package() else {
            return Vec::new();
        };
        let Some(pkg) = ctx.graph.package(package) else {
            return Vec::new();
        };
        let line = ctx.package_line();
        let mut findings = Vec::new();

        let count = pkg.exports.len();
        let max = ctx.config.effective_max_exports();
        let min = ctx.config.effective_min_exports();
        if count > max {
            findings.push(ctx.finding(
                line,
                RuleId::PackageExportsTooMuch,
                format!("Package exports {count} symbols (max {max})"),
            ));
        } else if count > 0 && count < min {
            findings.push(ctx.finding(
                line,
                RuleId::PackageExportsTooLittle,
                format!("Package exports only {count} symbols (min {min})"),
            ));
        }

        for gap in queries::incomplete_api(ctx.graph, package) {
            findings.push(ctx.finding(line, RuleId::IncompletePublicApi, gap.describe()));
        }

        for export in &pkg.exports {
            if INTERNAL_NAME.is_match(export.as_str()) {
                findings.push(ctx.finding(
                    ctx.symbol_line(export),
                    RuleId::InternalImplementationExposed,
                    format!("Implementation detail exposed in public API: {export}"),
                ));
            }
            if IMPLEMENTATION_DETAIL_NAME.is_match(export.as_str()) {
                findings.push(ctx.finding(
                    ctx.symbol_line(export),
                    RuleId::PublicFunctionWithImplementationDetailsInName,
                    format!("Public function name contains implementation details: {export}"),
                ));
            }
        }

        // Usage messages are checked where the export is defined.
        let mut checked = std::collections::BTreeSet::new();
        for def in ctx.scan.definitions.iter().filter(|d| d.scope == Scope::Public) {
            if checked.insert(def.name.as_str()) && !ctx.scan.usage_messages.contains(&def.name) {
                findings.push(ctx.finding(
                    def.line,
                    RuleId::PublicExportMissingUsageMessage,
                    format!("Exported function missing usage message: {}", def.name),
                ));
            }
        }

        if pkg.version.is_none() {
            findings.push(ctx.finding(
                line,
                RuleId::MissingPackageVersion,
                "Package missing version information",
            ));
        }

        if !has_package_usage(package, &ctx.scan.usage_messages) {
            findings.push(ctx.finding(
                line,
                RuleId::MissingPackageDocumentation,
                "Package missing usage documentation",
            ));
        }

        findings
    }
}

/// `Shapes::usage` or `GeoShapes::usage` documents ``Geo`Shapes` ``.
fn has_package_usage(package: &str, usage: &std::collections::BTreeSet<String>) -> bool {
    let last = package
        .trim_end_matches('`')
        .rsplit('`')
        .next()
        .unwrap_or(package);
    let joined: String = package.chars().filter(|c| *c != '`').collect();
    usage.contains(last) || usage.contains(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_support::run_on;

    const DOCUMENTED: &str = "BeginPackage[\"Geo`Shapes`\"]
Shapes::usage = \"Shapes of things.\"
Area::usage = \"Area[s] gives the area.\"
CreateShape::usage = \"...\"
DeleteShape::usage = \"...\"
Version -> \"1.0\"
Area[s_] := 1
CreateShape[] := 1
DeleteShape[s_] := 1
EndPackage[]
";

    fn rules(findings: &[Finding]) -> Vec<RuleId> {
        findings.iter().map(|f| f.rule).collect()
    }

    #[test]
    fn well_formed_package_is_clean() {
        let findings = run_on(&ApiDetector, &[("Shapes.m", DOCUMENTED)], "Shapes.m");
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[test]
    fn missing_docs_version_and_pairs() {
        let text = "BeginPackage[\"Geo`Store`\"]\nCreateItem[x_] := x\nHelperCache[x_] := x\nEndPackage[]\n";
        let findings = run_on(&ApiDetector, &[("Store.m", text)], "Store.m");
        let got = rules(&findings);
        assert!(got.contains(&RuleId::PackageExportsTooLittle));
        assert!(got.contains(&RuleId::IncompletePublicApi));
        assert!(got.contains(&RuleId::InternalImplementationExposed));
        assert!(got.contains(&RuleId::PublicFunctionWithImplementationDetailsInName));
        assert!(got.contains(&RuleId::MissingPackageVersion));
        assert!(got.contains(&RuleId::MissingPackageDocumentation));
        let usage: Vec<_> = findings
            .iter()
            .filter(|f| f.rule == RuleId::PublicExportMissingUsageMessage)
            .map(|f| f.line)
            .collect();
        assert_eq!(usage, vec![2, 3]);
    }

    #[test]
    fn package_usage_forms() {
        let usage: std::collections::BTreeSet<String> =
            ["GeoShapes".to_string()].into_iter().collect();
        assert!(has_package_usage("Geo`Shapes`", &usage));
        assert!(!has_package_usage("Geo`Other`", &usage));
    }
}
