//! The read-only graph shared by every analysis worker.

use std::collections::{BTreeMap, BTreeSet};

use paclint_core::types::collections::FxHashMap;

use super::builder::GraphBuilder;
use super::types::{FileRecord, GraphTables, Package, Symbol};

/// Frozen dependency and symbol tables.
///
/// Only reachable through `GraphBuilder::finish`, and exposes no `&mut`
/// access, so it is safe to share behind an `Arc` without locks. Fan-in and
/// the symbol-to-exporters index are computed once at freeze time.
#[derive(Debug)]
pub struct DependencyGraph {
    tables: GraphTables,
    fan_in: BTreeMap<String, usize>,
    exporters: FxHashMap<String, Vec<String>>,
}

static EMPTY: BTreeSet<String> = BTreeSet::new();

impl DependencyGraph {
    pub(crate) fn freeze(tables: GraphTables) -> Self {
        let mut fan_in: BTreeMap<String, usize> = BTreeMap::new();
        let mut exporters: FxHashMap<String, Vec<String>> = FxHashMap::default();
        // BTreeMap iteration keeps every exporter list sorted.
        for (name, pkg) in &tables.packages {
            for dep in &pkg.dependencies {
                *fan_in.entry(dep.clone()).or_default() += 1;
            }
            for export in &pkg.exports {
                exporters
                    .entry(export.clone())
                    .or_default()
                    .push(name.clone());
            }
        }
        Self {
            tables,
            fan_in,
            exporters,
        }
    }

    /// Clear every table and hand back a builder for the next run.
    pub fn reset(self) -> GraphBuilder {
        GraphBuilder::from_tables(self.tables)
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.tables.packages.get(name)
    }

    /// All packages in lexicographic order.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.tables.packages.values()
    }

    pub fn package_count(&self) -> usize {
        self.tables.packages.len()
    }

    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.tables.symbols.get(name)
    }

    pub fn symbol_count(&self) -> usize {
        self.tables.symbols.len()
    }

    pub fn file(&self, file_id: &str) -> Option<&FileRecord> {
        self.tables.files.get(file_id)
    }

    pub fn package_of_file(&self, file_id: &str) -> Option<&str> {
        self.file(file_id).and_then(|f| f.package.as_deref())
    }

    /// Declared dependencies of `package`; empty for an unknown package.
    pub fn dependencies(&self, package: &str) -> &BTreeSet<String> {
        self.package(package)
            .map(|p| &p.dependencies)
            .unwrap_or(&EMPTY)
    }

    /// Number of packages that declare a dependency on `package`.
    pub fn fan_in(&self, package: &str) -> usize {
        self.fan_in.get(package).copied().unwrap_or(0)
    }

    pub fn fan_out(&self, package: &str) -> usize {
        self.dependencies(package).len()
    }

    /// Packages exporting `symbol`, lexicographically sorted.
    pub fn exporters_of(&self, symbol: &str) -> &[String] {
        self.exporters
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `symbol` is used in `file_id`.
    pub fn is_referenced_in(&self, symbol: &str, file_id: &str) -> bool {
        self.symbol(symbol)
            .is_some_and(|s| s.referenced_in.contains(file_id))
    }

    pub fn reference_count(&self, symbol: &str) -> u64 {
        self.symbol(symbol).map(|s| s.reference_count).unwrap_or(0)
    }

    pub fn is_test_file(&self, file_id: &str) -> bool {
        self.tables.test_files.contains(file_id)
    }

    pub fn test_files(&self) -> &BTreeSet<String> {
        &self.tables.test_files
    }

    pub fn implementation_files(&self) -> &BTreeSet<String> {
        &self.tables.implementation_files
    }

    /// Table writes performed before the freeze. Constant for the graph's lifetime.
    pub fn write_count(&self) -> u64 {
        self.tables.write_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(files: &[(&str, &str)]) -> DependencyGraph {
        let mut b = GraphBuilder::new();
        for (id, text) in files {
            b.ingest(id, text);
        }
        b.finish()
    }

    #[test]
    fn fan_in_and_exporters_are_precomputed() {
        let g = graph(&[
            ("A.m", "BeginPackage[\"A`\", {\"C`\"}]\nShared[x_] := x\nEndPackage[]\n"),
            ("B.m", "BeginPackage[\"B`\", {\"C`\"}]\nShared[x_] := x\nEndPackage[]\n"),
            ("C.m", "BeginPackage[\"C`\"]\nEndPackage[]\n"),
        ]);
        assert_eq!(g.fan_in("C`"), 2);
        assert_eq!(g.fan_out("C`"), 0);
        assert_eq!(g.exporters_of("Shared"), ["A`".to_string(), "B`".to_string()]);
        assert!(g.exporters_of("Missing").is_empty());
    }

    #[test]
    fn unknown_names_degrade_to_empty() {
        let g = graph(&[]);
        assert!(g.dependencies("Nope`").is_empty());
        assert_eq!(g.fan_in("Nope`"), 0);
        assert_eq!(g.reference_count("Nope"), 0);
        assert!(!g.is_referenced_in("Nope", "x.m"));
    }

    #[test]
    fn reset_returns_an_empty_builder() {
        let g = graph(&[("A.m", "BeginPackage[\"A`\"]\nF[x_] := x\nEndPackage[]\n")]);
        assert!(g.write_count() > 0);
        let b = g.reset();
        assert_eq!(b.write_count(), 0);
        assert_eq!(b.package_count(), 0);
        let g = b.finish();
        assert_eq!(g.symbol_count(), 0);
    }

    #[test]
    fn graph_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DependencyGraph>();
    }
}
