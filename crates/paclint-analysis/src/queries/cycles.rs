//! Dependency cycle detection.

use std::collections::btree_set;

use paclint_core::types::collections::{FxHashMap, FxHashSet, SmallVec8};

use crate::graph::DependencyGraph;

/// Depth-first search from `start` along declared dependencies.
///
/// Returns the first cycle reachable from `start` as the slice of the
/// active path from the re-entered package to the top, e.g. `[A, B, C]`
/// for `A -> B -> C -> A`. A self-dependency yields a one-element cycle.
/// Dependencies on unknown packages are dead ends. The search keeps an
/// explicit frame stack, so long chains cannot overflow the thread stack.
pub fn find_cycle(graph: &DependencyGraph, start: &str) -> Option<Vec<String>> {
    graph.package(start)?;

    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut on_path: FxHashMap<&str, usize> = FxHashMap::default();
    let mut path: SmallVec8<&str> = SmallVec8::new();
    let mut frames: SmallVec8<btree_set::Iter<'_, String>> = SmallVec8::new();

    visited.insert(start);
    on_path.insert(start, 0);
    path.push(start);
    frames.push(graph.dependencies(start).iter());

    while let Some(frame) = frames.last_mut() {
        let Some(dep) = frame.next() else {
            frames.pop();
            if let Some(done) = path.pop() {
                on_path.remove(done);
            }
            continue;
        };
        let dep = dep.as_str();
        if let Some(&pos) = on_path.get(dep) {
            return Some(path[pos..].iter().map(|s| s.to_string()).collect());
        }
        if graph.package(dep).is_none() || !visited.insert(dep) {
            continue;
        }
        on_path.insert(dep, path.len());
        path.push(dep);
        frames.push(graph.dependencies(dep).iter());
    }
    None
}
