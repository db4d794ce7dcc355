//! `FileScan`: everything the package model needs from one file's text.
//!
//! Scanning never fails. Constructs that do not match (unterminated strings,
//! unbalanced brackets, half-written declarations) are simply not recorded,
//! and the rest of the file is still scanned.

use std::collections::BTreeSet;

use paclint_core::types::collections::FxHashSet;

use super::line_index::LineIndex;
use super::mask::MaskedText;
use super::patterns::{self, normalize_context};

/// The file's package declaration (first `BeginPackage` wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDecl {
    pub name: String,
    pub line: u32,
    /// Contexts listed as the second `BeginPackage` argument.
    pub context_list: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Needs,
    Get,
    GetOperator,
    ContextList,
}

/// One import-like reference to another context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub name: String,
    pub line: u32,
    pub kind: ImportKind,
    /// Second `Needs` argument when it looks like a version number.
    pub required_version: Option<String>,
}

/// Which section of the file a definition appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Public section of a package.
    Public,
    /// Inside `Begin[...]`/`End[]`, or after `EndPackage[]`.
    Private,
    /// The file declares no package.
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub line: u32,
    pub params: String,
    pub scope: Scope,
    /// Neither inside a `BeginPackage` block nor a `Begin` section.
    pub outside_context: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: String,
    pub line: u32,
}

/// A `Some`Private`sym` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateRef {
    pub context: String,
    pub symbol: String,
    pub line: u32,
}

#[derive(Debug, Clone, Default)]
pub struct FileScan {
    pub package: Option<PackageDecl>,
    pub imports: Vec<Import>,
    pub version: Option<String>,
    pub definitions: Vec<Definition>,
    pub calls: Vec<Call>,
    pub usage_messages: BTreeSet<String>,
    pub deprecated: BTreeSet<String>,
    pub commented_loads: Vec<u32>,
    pub conditional_loads: Vec<u32>,
    pub private_refs: Vec<PrivateRef>,
    /// First test-framework call, if any.
    pub test_function: Option<(String, u32)>,
    pub line_count: usize,
}

/// Scope machine input, ordered by byte offset.
enum Marker {
    EnterPackage,
    LeavePackage,
    EnterSection,
    LeaveSection,
    Define(usize),
}

impl FileScan {
    pub fn scan(text: &str) -> Self {
        let lines = LineIndex::new(text);
        let masked = MaskedText::new(text);
        let mut scan = FileScan {
            line_count: lines.line_count(),
            ..Default::default()
        };

        scan.extract_package(&masked, &lines);
        scan.extract_imports(&masked, &lines);
        scan.version = patterns::VERSION
            .captures(&masked.code)
            .map(|c| c[1].to_string());

        let definition_heads = scan.extract_definitions(&masked, &lines);
        scan.extract_calls(&masked, &lines, &definition_heads);

        scan.usage_messages = patterns::USAGE_MESSAGE
            .captures_iter(&masked.bare)
            .map(|c| c[1].to_string())
            .collect();
        scan.extract_deprecated(text);
        scan.commented_loads = patterns::COMMENTED_LOAD
            .find_iter(text)
            .map(|m| lines.line_of(m.start()))
            .collect();
        scan.conditional_loads = patterns::CONDITIONAL_LOAD
            .find_iter(&masked.bare)
            .map(|m| lines.line_of(m.start()))
            .collect();
        scan.private_refs = patterns::PRIVATE_REFERENCE
            .captures_iter(&masked.bare)
            .filter_map(|c| {
                let whole = c.get(0)?;
                Some(PrivateRef {
                    context: c[1].to_string(),
                    symbol: c[2].to_string(),
                    line: lines.line_of(whole.start()),
                })
            })
            .collect();
        scan.test_function = patterns::TEST_FUNCTION
            .captures(&masked.bare)
            .and_then(|c| {
                let m = c.get(1)?;
                Some((m.as_str().to_string(), lines.line_of(m.start())))
            });

        scan
    }

    pub fn package_name(&self) -> Option<&str> {
        self.package.as_ref().map(|p| p.name.as_str())
    }

    /// Line of the package declaration, or 1 when the file has none.
    pub fn package_line(&self) -> u32 {
        self.package.as_ref().map(|p| p.line).unwrap_or(1)
    }

    /// Every context this file imports, by any mechanism.
    pub fn imported_contexts(&self) -> BTreeSet<&str> {
        self.imports.iter().map(|i| i.name.as_str()).collect()
    }

    /// Names defined anywhere in this file.
    pub fn defined_names(&self) -> BTreeSet<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    /// Names called anywhere in this file.
    pub fn called_names(&self) -> BTreeSet<&str> {
        self.calls.iter().map(|c| c.name.as_str()).collect()
    }

    /// First line defining `name` in this file.
    pub fn definition_line(&self, name: &str) -> Option<u32> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.line)
    }

    fn extract_package(&mut self, masked: &MaskedText, lines: &LineIndex) {
        let Some(caps) = patterns::BEGIN_PACKAGE.captures(&masked.code) else {
            return;
        };
        let (Some(whole), Some(name)) = (caps.get(0), normalize_context(&caps[1])) else {
            return;
        };
        let context_list = caps
            .get(2)
            .map(|list| {
                patterns::STRING_LITERAL
                    .captures_iter(list.as_str())
                    .filter_map(|c| normalize_context(&c[1]))
                    .collect()
            })
            .unwrap_or_default();
        self.package = Some(PackageDecl {
            name,
            line: lines.line_of(whole.start()),
            context_list,
        });
    }

    fn extract_imports(&mut self, masked: &MaskedText, lines: &LineIndex) {
        if let Some(pkg) = &self.package {
            for ctx in &pkg.context_list {
                self.imports.push(Import {
                    name: ctx.clone(),
                    line: pkg.line,
                    kind: ImportKind::ContextList,
                    required_version: None,
                });
            }
        }

        for caps in patterns::NEEDS.captures_iter(&masked.code) {
            let (Some(whole), Some(name)) = (caps.get(0), normalize_context(&caps[1])) else {
                continue;
            };
            let required_version = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|v| is_version(v))
                .map(String::from);
            self.imports.push(Import {
                name,
                line: lines.line_of(whole.start()),
                kind: ImportKind::Needs,
                required_version,
            });
        }

        for (re, kind) in [
            (&*patterns::GET, ImportKind::Get),
            (&*patterns::GET_OPERATOR, ImportKind::GetOperator),
        ] {
            for caps in re.captures_iter(&masked.code) {
                let (Some(whole), Some(name)) = (caps.get(0), normalize_context(&caps[1])) else {
                    continue;
                };
                self.imports.push(Import {
                    name,
                    line: lines.line_of(whole.start()),
                    kind,
                    required_version: None,
                });
            }
        }
    }

    /// Runs the public/private scope machine and returns the byte offsets of
    /// definition heads, which are not calls.
    fn extract_definitions(&mut self, masked: &MaskedText, lines: &LineIndex) -> FxHashSet<usize> {
        let mut markers: Vec<(usize, Marker)> = Vec::new();
        for m in patterns::BEGIN_PACKAGE.find_iter(&masked.code) {
            markers.push((m.start(), Marker::EnterPackage));
        }
        for m in patterns::END_PACKAGE.find_iter(&masked.code) {
            markers.push((m.start(), Marker::LeavePackage));
        }
        for m in patterns::BEGIN_SECTION.find_iter(&masked.code) {
            markers.push((m.start(), Marker::EnterSection));
        }
        for m in patterns::END_SECTION.find_iter(&masked.code) {
            markers.push((m.start(), Marker::LeaveSection));
        }

        let mut found = Vec::new();
        let mut heads = FxHashSet::default();
        for caps in patterns::DEFINITION.captures_iter(&masked.bare) {
            let Some(name) = caps.get(1) else { continue };
            heads.insert(name.start());
            markers.push((name.start(), Marker::Define(found.len())));
            found.push((name.as_str().to_string(), caps[2].trim().to_string(), name.start()));
        }
        markers.sort_by_key(|(offset, _)| *offset);

        let has_package = self.package.is_some();
        let mut in_public = has_package;
        let mut in_package = false;
        let mut in_section = false;
        for (_, marker) in markers {
            match marker {
                Marker::EnterPackage => {
                    in_public = true;
                    in_package = true;
                }
                Marker::LeavePackage => {
                    in_public = false;
                    in_package = false;
                }
                Marker::EnterSection => {
                    in_public = false;
                    in_section = true;
                }
                Marker::LeaveSection => {
                    in_public = has_package;
                    in_section = false;
                }
                Marker::Define(idx) => {
                    let (name, params, offset) = &found[idx];
                    let scope = match (has_package, in_public) {
                        (false, _) => Scope::Global,
                        (true, true) => Scope::Public,
                        (true, false) => Scope::Private,
                    };
                    self.definitions.push(Definition {
                        name: name.clone(),
                        line: lines.line_of(*offset),
                        params: params.clone(),
                        scope,
                        outside_context: !in_package && !in_section,
                    });
                }
            }
        }
        heads
    }

    fn extract_calls(&mut self, masked: &MaskedText, lines: &LineIndex, heads: &FxHashSet<usize>) {
        let bytes = masked.bare.as_bytes();
        for caps in patterns::CALL.captures_iter(&masked.bare) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if heads.contains(&name.start()) {
                continue;
            }
            // `x[[i]]` is Part, not a call.
            if bytes.get(whole.end()) == Some(&b'[') {
                continue;
            }
            self.calls.push(Call {
                name: name.as_str().to_string(),
                line: lines.line_of(name.start()),
            });
        }
    }

    /// A deprecation marker tags the first definition within its next four lines.
    fn extract_deprecated(&mut self, raw: &str) {
        let marker_lines: Vec<u32> = raw
            .lines()
            .enumerate()
            .filter(|(_, l)| patterns::DEPRECATED.is_match(l))
            .map(|(i, _)| i as u32 + 1)
            .collect();
        for marker in marker_lines {
            if let Some(def) = self
                .definitions
                .iter()
                .filter(|d| d.line >= marker && d.line <= marker + 4)
                .min_by_key(|d| d.line)
            {
                self.deprecated.insert(def.name.clone());
            }
        }
    }
}

fn is_version(s: &str) -> bool {
    !s.is_empty() && s.starts_with(|c: char| c.is_ascii_digit()) && s.chars().all(|c| c.is_ascii_digit() || c == '.')
}
