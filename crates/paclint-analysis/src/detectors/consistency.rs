//! Cross-file consistency: duplicate and shadowing definitions, version
//! requirements, undeclared loads and overload parameter naming.

use std::collections::{BTreeMap, BTreeSet};

use paclint_core::types::{Finding, RuleId};

use super::traits::{DetectionContext, Detector, DetectorCategory};
use crate::extract::patterns::PARAMETER_NAME;
use crate::extract::ImportKind;

pub struct ConsistencyDetector;

const RULES: &[RuleId] = &[
    RuleId::DuplicateSymbolDefinition,
    RuleId::SymbolRedefinitionAfterImport,
    RuleId::PackageVersionMismatch,
    RuleId::PackageLoadedButNotListed,
    RuleId::InconsistentParameterNamesAcrossOverloads,
];

impl Detector for ConsistencyDetector {
    fn id(&self) -> &str {
        "consistency"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Consistency
    }

    fn rules(&self) -> &'static [RuleId] {
        RULES
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        duplicate_definitions(ctx, &mut findings);
        redefinitions_after_import(ctx, &mut findings);
        version_mismatches(ctx, &mut findings);
        unlisted_loads(ctx, &mut findings);
        overload_parameter_names(ctx, &mut findings);
        findings
    }
}

fn duplicate_definitions(ctx: &DetectionContext<'_>, out: &mut Vec<Finding>) {
    for name in ctx.scan.defined_names() {
        let Some(symbol) = ctx.graph.symbol(name) else {
            continue;
        };
        if symbol.defined_in.len() > 1 {
            let files: Vec<&str> = symbol.defined_in.iter().map(String::as_str).collect();
            out.push(ctx.finding(
                ctx.symbol_line(name),
                RuleId::DuplicateSymbolDefinition,
                format!("Symbol defined in multiple files: {name} in [{}]", files.join(", ")),
            ));
        }
    }
}

/// A definition that follows an import of a package exporting the same name.
fn redefinitions_after_import(ctx: &DetectionContext<'_>, out: &mut Vec<Finding>) {
    let own = ctx.package();
    let mut reported = BTreeSet::new();
    for def in &ctx.scan.definitions {
        let shadowed = ctx
            .scan
            .imports
            .iter()
            .filter(|i| i.line <= def.line && Some(i.name.as_str()) != own)
            .find(|i| {
                ctx.graph
                    .package(&i.name)
                    .is_some_and(|p| p.exports.contains(&def.name))
            });
        if let Some(import) = shadowed {
            if reported.insert(def.name.as_str()) {
                out.push(ctx.finding(
                    def.line,
                    RuleId::SymbolRedefinitionAfterImport,
                    format!("Symbol redefined after import: {} (exported by {})", def.name, import.name),
                ));
            }
        }
    }
}

fn version_mismatches(ctx: &DetectionContext<'_>, out: &mut Vec<Finding>) {
    for import in &ctx.scan.imports {
        let Some(required) = &import.required_version else {
            continue;
        };
        let Some(actual) = ctx.graph.package(&import.name).and_then(|p| p.version.as_ref()) else {
            continue;
        };
        if actual != required {
            out.push(ctx.finding(
                import.line,
                RuleId::PackageVersionMismatch,
                format!(
                    "Version mismatch for {}: required {required}, found {actual}",
                    import.name
                ),
            ));
        }
    }
}

/// `Needs` of a context missing from the `BeginPackage` context list.
fn unlisted_loads(ctx: &DetectionContext<'_>, out: &mut Vec<Finding>) {
    let Some(decl) = &ctx.scan.package else {
        return;
    };
    for import in ctx.scan.imports.iter().filter(|i| i.kind == ImportKind::Needs) {
        if import.name != decl.name && !decl.context_list.contains(&import.name) {
            out.push(ctx.finding(
                import.line,
                RuleId::PackageLoadedButNotListed,
                format!("Package loaded but not declared in BeginPackage: {}", import.name),
            ));
        }
    }
}

/// Overloads whose parameters use more distinct names than there are overloads.
fn overload_parameter_names(ctx: &DetectionContext<'_>, out: &mut Vec<Finding>) {
    let mut overloads: BTreeMap<&str, (u32, Vec<&str>)> = BTreeMap::new();
    for def in &ctx.scan.definitions {
        overloads
            .entry(def.name.as_str())
            .or_insert_with(|| (def.line, Vec::new()))
            .1
            .push(def.params.as_str());
    }
    for (name, (line, params)) in overloads {
        if params.len() < 2 {
            continue;
        }
        let names: BTreeSet<&str> = params
            .iter()
            .copied()
            .flat_map(|p| PARAMETER_NAME.captures_iter(p))
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        if names.len() > params.len() {
            out.push(ctx.finding(
                line,
                RuleId::InconsistentParameterNamesAcrossOverloads,
                format!("Inconsistent parameter names in overloads of: {name}"),
            ));
        }
    }
}
