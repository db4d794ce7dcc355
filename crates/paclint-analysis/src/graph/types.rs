//! Table rows of the dependency and symbol model.

use std::collections::{BTreeMap, BTreeSet};

use paclint_core::types::collections::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::units::UnitKind;

/// A named package and everything declared for it across all its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    /// File that registered the package first.
    pub source_file: String,
    /// Declared dependency names. Only ever extended within a run.
    pub dependencies: BTreeSet<String>,
    /// Symbols defined in the public section. Only ever extended within a run.
    pub exports: BTreeSet<String>,
    pub private_symbols: BTreeSet<String>,
    pub version: Option<String>,
    /// Line of the `BeginPackage` declaration in `source_file`.
    pub declared_at: u32,
}

impl Package {
    pub fn new(name: impl Into<String>, source_file: impl Into<String>, declared_at: u32) -> Self {
        Self {
            name: name.into(),
            source_file: source_file.into(),
            dependencies: BTreeSet::new(),
            exports: BTreeSet::new(),
            private_symbols: BTreeSet::new(),
            version: None,
            declared_at,
        }
    }
}

/// A symbol in the flat global namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub defined_in: BTreeSet<String>,
    pub referenced_in: BTreeSet<String>,
    /// Call sites seen across all files. Ingesting a file twice counts its calls twice.
    pub reference_count: u64,
}

/// What the model remembers about one ingested unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub package: Option<String>,
    pub line_count: usize,
    pub kind: UnitKind,
}

/// The raw tables. Owned by a `GraphBuilder` while writable and by a
/// `DependencyGraph` once frozen.
#[derive(Debug, Clone, Default)]
pub struct GraphTables {
    pub packages: BTreeMap<String, Package>,
    pub symbols: FxHashMap<String, Symbol>,
    pub files: BTreeMap<String, FileRecord>,
    pub test_files: BTreeSet<String>,
    pub implementation_files: BTreeSet<String>,
    /// Number of table writes performed so far.
    pub write_count: u64,
}

impl GraphTables {
    /// Empty every table, keeping hash map capacity.
    pub fn clear(&mut self) {
        self.packages.clear();
        self.symbols.clear();
        self.files.clear();
        self.test_files.clear();
        self.implementation_files.clear();
        self.write_count = 0;
    }
}
