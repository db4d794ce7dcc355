//! Fan-in / fan-out instability metric.

use serde::Serialize;

use crate::graph::DependencyGraph;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PackageMetrics {
    pub fan_in: usize,
    pub fan_out: usize,
    /// `fan_out / (fan_in + fan_out)`, 0 for an isolated package.
    pub instability: f64,
}

pub fn metrics(graph: &DependencyGraph, package: &str) -> PackageMetrics {
    let fan_in = graph.fan_in(package);
    let fan_out = graph.fan_out(package);
    let total = fan_in + fan_out;
    let instability = if total == 0 {
        0.0
    } else {
        fan_out as f64 / total as f64
    };
    PackageMetrics {
        fan_in,
        fan_out,
        instability,
    }
}

pub fn instability(graph: &DependencyGraph, package: &str) -> f64 {
    metrics(graph, package).instability
}

/// Dependencies with instability above `unstable`, reported only when
/// `package` itself is below `stable`.
pub fn unstable_dependencies(
    graph: &DependencyGraph,
    package: &str,
    stable: f64,
    unstable: f64,
) -> Vec<(String, f64)> {
    if instability(graph, package) >= stable {
        return Vec::new();
    }
    graph
        .dependencies(package)
        .iter()
        .map(|dep| (dep.clone(), instability(graph, dep)))
        .filter(|(_, i)| *i > unstable)
        .collect()
}
