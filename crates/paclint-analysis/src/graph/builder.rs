//! Single-writer construction of the dependency and symbol tables.

use paclint_core::types::collections::FxHashMap;
use tracing::trace;

use crate::extract::{FileScan, Scope};
use crate::units::{classify, UnitKind};

use super::frozen::DependencyGraph;
use super::types::{FileRecord, GraphTables, Package, Symbol};

/// Owns the tables while they are writable.
///
/// `ingest` takes `&mut self`, so the borrow checker enforces the single
/// writer. The builder is `Send` but is meant to be driven from one thread:
/// the pipeline ingests every unit sequentially before calling `finish()`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    tables: GraphTables,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tables(mut tables: GraphTables) -> Self {
        tables.clear();
        Self { tables }
    }

    /// Scan one unit's text and merge it into the tables.
    ///
    /// Never fails: constructs the scanner cannot recognise are skipped.
    /// Sets only grow. Reference counts are per sighting, so ingesting the
    /// same text twice doubles them.
    pub fn ingest(&mut self, file_id: &str, content: &str) {
        let scan = FileScan::scan(content);
        self.ingest_scan(file_id, &scan);
    }

    /// Merge an already computed scan.
    pub fn ingest_scan(&mut self, file_id: &str, scan: &FileScan) {
        let before = self.tables.write_count;
        self.record_file(file_id, scan);

        let package = scan.package.as_ref().map(|decl| {
            self.register_package(&decl.name, file_id, decl.line);
            decl.name.as_str()
        });

        if let Some(package) = package {
            self.add_dependencies(package, scan);
            if let Some(version) = &scan.version {
                self.set_version(package, version);
            }
        }

        for def in &scan.definitions {
            self.add_definition(package, file_id, &def.name, def.scope);
        }
        for call in &scan.calls {
            self.add_reference(file_id, &call.name);
        }

        trace!(
            file = file_id,
            package = package.unwrap_or("-"),
            writes = self.tables.write_count - before,
            "ingested unit"
        );
    }

    /// Writes performed so far in this run.
    pub fn write_count(&self) -> u64 {
        self.tables.write_count
    }

    pub fn package_count(&self) -> usize {
        self.tables.packages.len()
    }

    /// Freeze the tables. The returned graph has no mutating methods.
    pub fn finish(self) -> DependencyGraph {
        DependencyGraph::freeze(self.tables)
    }

    fn record_file(&mut self, file_id: &str, scan: &FileScan) {
        let kind = classify(file_id);
        let t = &mut self.tables;
        match kind {
            UnitKind::Test => t.test_files.insert(file_id.to_string()),
            UnitKind::Implementation => t.implementation_files.insert(file_id.to_string()),
        };
        t.write_count += 1;

        // First mapping wins.
        if !t.files.contains_key(file_id) {
            t.files.insert(
                file_id.to_string(),
                FileRecord {
                    package: scan.package_name().map(String::from),
                    line_count: scan.line_count,
                    kind,
                },
            );
            t.write_count += 1;
        }
    }

    fn register_package(&mut self, name: &str, file_id: &str, line: u32) {
        let t = &mut self.tables;
        if !t.packages.contains_key(name) {
            t.packages
                .insert(name.to_string(), Package::new(name, file_id, line));
            t.write_count += 1;
        }
    }

    fn add_dependencies(&mut self, package: &str, scan: &FileScan) {
        let t = &mut self.tables;
        let Some(pkg) = t.packages.get_mut(package) else {
            return;
        };
        for import in &scan.imports {
            pkg.dependencies.insert(import.name.clone());
            t.write_count += 1;
        }
    }

    fn set_version(&mut self, package: &str, version: &str) {
        let t = &mut self.tables;
        if let Some(pkg) = t.packages.get_mut(package) {
            if pkg.version.is_none() {
                pkg.version = Some(version.to_string());
                t.write_count += 1;
            }
        }
    }

    fn add_definition(&mut self, package: Option<&str>, file_id: &str, name: &str, scope: Scope) {
        let t = &mut self.tables;
        if let Some(pkg) = package.and_then(|p| t.packages.get_mut(p)) {
            match scope {
                Scope::Public => {
                    pkg.exports.insert(name.to_string());
                }
                Scope::Private => {
                    pkg.private_symbols.insert(name.to_string());
                }
                Scope::Global => {}
            }
        }
        symbol_entry(&mut t.symbols, name)
            .defined_in
            .insert(file_id.to_string());
        t.write_count += 1;
    }

    fn add_reference(&mut self, file_id: &str, name: &str) {
        let t = &mut self.tables;
        let sym = symbol_entry(&mut t.symbols, name);
        sym.referenced_in.insert(file_id.to_string());
        sym.reference_count += 1;
        t.write_count += 1;
    }
}

fn symbol_entry<'a>(symbols: &'a mut FxHashMap<String, Symbol>, name: &str) -> &'a mut Symbol {
    symbols.entry(name.to_string()).or_insert_with(|| Symbol {
        name: name.to_string(),
        ..Default::default()
    })
}
