//! Unused and missing import checks.

use std::collections::BTreeSet;

use crate::extract::{FileScan, Import};
use crate::graph::DependencyGraph;

/// A package whose exports a file calls without importing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingImport {
    pub package: String,
    /// First call that needed the package.
    pub symbol: String,
    pub line: u32,
}

/// Imports of known packages none of whose exports are used in `file_id`.
///
/// Each imported name is considered once, at its first import. A known
/// package that exports nothing is always unused. Imports of unknown packages
/// and of the file's own package are never reported.
pub fn unused_imports<'s>(
    graph: &DependencyGraph,
    file_id: &str,
    scan: &'s FileScan,
) -> Vec<&'s Import> {
    let own = scan.package_name();
    let mut seen = BTreeSet::new();
    let mut unused = Vec::new();
    for import in &scan.imports {
        let name = import.name.as_str();
        if !seen.insert(name) || Some(name) == own {
            continue;
        }
        let Some(pkg) = graph.package(name) else {
            continue;
        };
        if !pkg
            .exports
            .iter()
            .any(|sym| graph.is_referenced_in(sym, file_id))
        {
            unused.push(import);
        }
    }
    unused
}

/// Packages whose exports are called here without a matching import.
///
/// Calls to names defined in the file itself are skipped. When several
/// packages export a name, the call is satisfied by importing any of them;
/// otherwise the lexicographically first exporter is reported. Each package
/// is reported once per file, at the first call that needed it.
pub fn missing_imports(graph: &DependencyGraph, scan: &FileScan) -> Vec<MissingImport> {
    let own = scan.package_name();
    let defined = scan.defined_names();
    let imported = scan.imported_contexts();
    let mut reported = BTreeSet::new();
    let mut missing = Vec::new();

    for call in &scan.calls {
        if defined.contains(call.name.as_str()) {
            continue;
        }
        let exporters: Vec<&String> = graph
            .exporters_of(&call.name)
            .iter()
            .filter(|pkg| Some(pkg.as_str()) != own)
            .collect();
        let Some(first) = exporters.first() else {
            continue;
        };
        if exporters.iter().any(|pkg| imported.contains(pkg.as_str())) {
            continue;
        }
        if reported.insert(first.as_str()) {
            missing.push(MissingImport {
                package: first.to_string(),
                symbol: call.name.clone(),
                line: call.line,
            });
        }
    }
    missing
}
