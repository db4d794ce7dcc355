//! One-level transitive dependencies and diamonds.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::DependencyGraph;

/// A dependency reached through more than one direct dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diamond {
    pub common: String,
    /// Direct dependencies that share `common`, sorted.
    pub via: Vec<String>,
}

/// Union of the dependencies of `package`'s direct dependencies.
///
/// One level only, not the full closure.
pub fn transitive_deps(graph: &DependencyGraph, package: &str) -> BTreeSet<String> {
    graph
        .dependencies(package)
        .iter()
        .flat_map(|dep| graph.dependencies(dep).iter().cloned())
        .collect()
}

/// Transitive dependencies that `file_id` uses directly without declaring them.
pub fn could_be_direct(graph: &DependencyGraph, package: &str, file_id: &str) -> Vec<String> {
    let direct = graph.dependencies(package);
    transitive_deps(graph, package)
        .into_iter()
        .filter(|dep| dep != package && !direct.contains(dep))
        .filter(|dep| {
            graph.package(dep).is_some_and(|p| {
                p.exports
                    .iter()
                    .any(|sym| graph.is_referenced_in(sym, file_id))
            })
        })
        .collect()
}

/// Dependencies shared by two or more distinct direct dependencies of
/// `package`. One entry per shared dependency, in lexicographic order. The
/// package itself is never reported as a shared dependency.
pub fn diamonds(graph: &DependencyGraph, package: &str) -> Vec<Diamond> {
    let mut sharers: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for dep in graph.dependencies(package) {
        if dep == package {
            continue;
        }
        for common in graph.dependencies(dep) {
            if common != package && common != dep {
                sharers.entry(common.as_str()).or_default().push(dep.as_str());
            }
        }
    }
    sharers
        .into_iter()
        .filter(|(_, via)| via.len() >= 2)
        .map(|(common, via)| Diamond {
            common: common.to_string(),
            via: via.into_iter().map(String::from).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn build(files: &[(&str, &str)]) -> DependencyGraph {
        let mut b = GraphBuilder::new();
        for (id, text) in files {
            b.ingest(id, text);
        }
        b.finish()
    }

    fn diamond_graph() -> DependencyGraph {
        build(&[
            ("A.m", "BeginPackage[\"A`\", {\"B`\", \"C`\"}]\nRun[x_] := Base[x]\nEndPackage[]\n"),
            ("B.m", "BeginPackage[\"B`\", {\"D`\"}]\nEndPackage[]\n"),
            ("C.m", "BeginPackage[\"C`\", {\"D`\"}]\nEndPackage[]\n"),
            ("D.m", "BeginPackage[\"D`\"]\nBase[x_] := x\nEndPackage[]\n"),
        ])
    }

    #[test]
    fn one_level_union() {
        let g = diamond_graph();
        let t = transitive_deps(&g, "A`");
        assert_eq!(t.into_iter().collect::<Vec<_>>(), vec!["D`"]);
        assert!(transitive_deps(&g, "Unknown`").is_empty());
    }

    #[test]
    fn direct_use_of_transitive_package() {
        let g = diamond_graph();
        assert_eq!(could_be_direct(&g, "A`", "A.m"), vec!["D`"]);
        assert!(could_be_direct(&g, "B`", "B.m").is_empty());
    }

    #[test]
    fn diamond_reported_once_per_common_dependency() {
        let g = diamond_graph();
        assert_eq!(
            diamonds(&g, "A`"),
            vec![Diamond {
                common: "D`".into(),
                via: vec!["B`".into(), "C`".into()],
            }]
        );
        assert!(diamonds(&g, "B`").is_empty());
    }
}
