//! Export and usage cross-referencing. Pure set arithmetic, no traversal.

use crate::graph::DependencyGraph;

/// Half of a conventional API pair that is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiGap {
    CreateWithoutDelete,
    SetWithoutGet,
}

impl ApiGap {
    pub fn describe(&self) -> &'static str {
        match self {
            ApiGap::CreateWithoutDelete => "API has Create* but no Delete* function",
            ApiGap::SetWithoutGet => "API has Set* but no Get* function",
        }
    }
}

/// Exports that are never called anywhere.
pub fn unused_public<'g>(graph: &'g DependencyGraph, package: &str) -> Vec<&'g str> {
    graph
        .package(package)
        .map(|p| {
            p.exports
                .iter()
                .filter(|sym| graph.reference_count(sym) == 0)
                .map(String::as_str)
                .collect()
        })
        .unwrap_or_default()
}

/// Exports whose only references are in `file_id`.
pub fn unused_exports<'g>(graph: &'g DependencyGraph, package: &str, file_id: &str) -> Vec<&'g str> {
    graph
        .package(package)
        .map(|p| {
            p.exports
                .iter()
                .filter(|sym| {
                    graph.symbol(sym).is_some_and(|s| {
                        s.referenced_in.len() == 1 && s.referenced_in.contains(file_id)
                    })
                })
                .map(String::as_str)
                .collect()
        })
        .unwrap_or_default()
}

/// A package that exports something but none of it is used outside `file_id`.
pub fn is_dead_package(graph: &DependencyGraph, package: &str, file_id: &str) -> bool {
    let Some(pkg) = graph.package(package) else {
        return false;
    };
    !pkg.exports.is_empty()
        && !pkg.exports.iter().any(|sym| {
            graph
                .symbol(sym)
                .is_some_and(|s| s.referenced_in.iter().any(|f| f != file_id))
        })
}

/// Private symbols referenced exactly once.
pub fn called_once<'g>(graph: &'g DependencyGraph, package: &str) -> Vec<&'g str> {
    graph
        .package(package)
        .map(|p| {
            p.private_symbols
                .iter()
                .filter(|sym| graph.reference_count(sym) == 1)
                .map(String::as_str)
                .collect()
        })
        .unwrap_or_default()
}

/// Private symbols referenced more than `threshold` times, with their counts.
pub fn heavily_used_private<'g>(
    graph: &'g DependencyGraph,
    package: &str,
    threshold: u64,
) -> Vec<(&'g str, u64)> {
    graph
        .package(package)
        .map(|p| {
            p.private_symbols
                .iter()
                .map(|sym| (sym.as_str(), graph.reference_count(sym)))
                .filter(|(_, count)| *count > threshold)
                .collect()
        })
        .unwrap_or_default()
}

/// Private symbols per export, or `None` when nothing is exported.
pub fn abstraction_ratio(graph: &DependencyGraph, package: &str) -> Option<f64> {
    let pkg = graph.package(package)?;
    if pkg.exports.is_empty() {
        return None;
    }
    Some(pkg.private_symbols.len() as f64 / pkg.exports.len() as f64)
}

pub fn incomplete_api(graph: &DependencyGraph, package: &str) -> Vec<ApiGap> {
    let Some(pkg) = graph.package(package) else {
        return Vec::new();
    };
    let has = |prefix: &str| pkg.exports.iter().any(|e| e.starts_with(prefix));
    let mut gaps = Vec::new();
    if has("Create") && !has("Delete") {
        gaps.push(ApiGap::CreateWithoutDelete);
    }
    if has("Set") && !has("Get") {
        gaps.push(ApiGap::SetWithoutGet);
    }
    gaps
}
