//! Query engine tests against small hand-built package graphs.

use paclint_analysis::extract::FileScan;
use paclint_analysis::queries::{
    could_be_direct, diamonds, find_cycle, metrics, missing_imports, unstable_dependencies,
    unused_imports,
};
use paclint_analysis::{DependencyGraph, GraphBuilder};

fn graph(files: &[(&str, &str)]) -> DependencyGraph {
    let mut builder = GraphBuilder::new();
    for (id, text) in files {
        builder.ingest(id, text);
    }
    builder.finish()
}

fn needs(name: &str, deps: &[&str]) -> String {
    let mut text = format!("BeginPackage[\"{name}`\"]\n");
    for dep in deps {
        text.push_str(&format!("Needs[\"{dep}`\"]\n"));
    }
    text.push_str("EndPackage[]\n");
    text
}

#[test]
fn three_cycle_is_found_from_every_member() {
    let (a, b, c) = (needs("A", &["B"]), needs("B", &["C"]), needs("C", &["A"]));
    let g = graph(&[("A.m", a.as_str()), ("B.m", b.as_str()), ("C.m", c.as_str())]);
    for start in ["A`", "B`", "C`"] {
        let cycle = find_cycle(&g, start).unwrap();
        assert_eq!(cycle.len(), 3);
        assert_eq!(cycle[0], start);
    }
}

#[test]
fn acyclic_diamond_has_no_cycle_but_one_diamond() {
    let files = [
        ("A.m", needs("A", &["B", "C"])),
        ("B.m", needs("B", &["D"])),
        ("C.m", needs("C", &["D"])),
        ("D.m", needs("D", &[])),
    ];
    let refs: Vec<(&str, &str)> = files.iter().map(|(id, t)| (*id, t.as_str())).collect();
    let g = graph(&refs);

    for start in ["A`", "B`", "C`", "D`"] {
        assert!(find_cycle(&g, start).is_none(), "false cycle from {start}");
    }
    let found = diamonds(&g, "A`");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].common, "D`");
    assert_eq!(found[0].via, ["B`", "C`"]);
    assert!(diamonds(&g, "B`").is_empty());
}

const LIB: &str = "BeginPackage[\"Lib`\"]\nHelp[x_] := x\nEndPackage[]\n";
const OTHER: &str = "BeginPackage[\"Other`\"]\nAssist[x_] := x\nEndPackage[]\n";
const GOOD: &str = "BeginPackage[\"Good`\"]\nNeeds[\"Lib`\"]\nRun[x_] := Help[x]\nEndPackage[]\n";
const BAD: &str = "BeginPackage[\"Bad`\"]\nNeeds[\"Lib`\"]\nGo[x_] := Assist[x]\nEndPackage[]\n";

#[test]
fn correct_import_triggers_neither_check() {
    let g = graph(&[("Lib.m", LIB), ("Other.m", OTHER), ("Good.m", GOOD), ("Bad.m", BAD)]);
    let scan = FileScan::scan(GOOD);
    assert!(unused_imports(&g, "Good.m", &scan).is_empty());
    assert!(missing_imports(&g, &scan).is_empty());
}

#[test]
fn wrong_import_triggers_both_checks() {
    let g = graph(&[("Lib.m", LIB), ("Other.m", OTHER), ("Good.m", GOOD), ("Bad.m", BAD)]);
    let scan = FileScan::scan(BAD);

    let unused: Vec<&str> = unused_imports(&g, "Bad.m", &scan)
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(unused, ["Lib`"]);

    let missing = missing_imports(&g, &scan);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].package, "Other`");
    assert_eq!(missing[0].symbol, "Assist");
    assert_eq!(missing[0].line, 3);
}

#[test]
fn ambiguous_exporter_resolves_lexicographically() {
    let zeta = "BeginPackage[\"Zeta`\"]\nShared[x_] := x\nEndPackage[]\n";
    let alpha = "BeginPackage[\"Alpha`\"]\nShared[x_] := x\nEndPackage[]\n";
    let user = "BeginPackage[\"User`\"]\nUse[x_] := Shared[x]\nEndPackage[]\n";
    let imports_zeta =
        "BeginPackage[\"User2`\"]\nNeeds[\"Zeta`\"]\nUse2[x_] := Shared[x]\nEndPackage[]\n";
    let g = graph(&[
        ("Zeta.m", zeta),
        ("Alpha.m", alpha),
        ("User.m", user),
        ("User2.m", imports_zeta),
    ]);

    let missing = missing_imports(&g, &FileScan::scan(user));
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].package, "Alpha`");
    // Importing any exporter satisfies the call.
    assert!(missing_imports(&g, &FileScan::scan(imports_zeta)).is_empty());
}

#[test]
fn directly_used_transitive_dependency() {
    let a = "BeginPackage[\"A`\"]\nNeeds[\"B`\"]\nRun[x_] := Deep[x]\nEndPackage[]\n";
    let b = "BeginPackage[\"B`\"]\nNeeds[\"C`\"]\nMid[x_] := x\nEndPackage[]\n";
    let c = "BeginPackage[\"C`\"]\nDeep[x_] := x\nEndPackage[]\n";
    let g = graph(&[("A.m", a), ("B.m", b), ("C.m", c)]);

    assert_eq!(could_be_direct(&g, "A`", "A.m"), ["C`"]);
    assert!(could_be_direct(&g, "B`", "B.m").is_empty());
}

#[test]
fn stable_package_depending_on_unstable_one() {
    let mut files = vec![
        ("Core.m".to_string(), needs("Core", &["Volatile"])),
        ("Volatile.m".to_string(), needs("Volatile", &["X", "Y", "Z"])),
    ];
    for i in 0..4 {
        files.push((format!("U{i}.m"), needs(&format!("U{i}"), &["Core"])));
    }
    let refs: Vec<(&str, &str)> = files.iter().map(|(id, t)| (id.as_str(), t.as_str())).collect();
    let g = graph(&refs);

    let core = metrics(&g, "Core`");
    assert_eq!((core.fan_in, core.fan_out), (4, 1));
    assert!((core.instability - 0.2).abs() < 1e-9);

    let flagged = unstable_dependencies(&g, "Core`", 0.3, 0.7);
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].0, "Volatile`");
    assert!((flagged[0].1 - 0.75).abs() < 1e-9);

    // An unstable package is never the one flagged.
    assert!(unstable_dependencies(&g, "Volatile`", 0.3, 0.7).is_empty());
}

#[test]
fn unknown_packages_are_dead_ends() {
    let a = needs("A", &["Missing", "Gone"]);
    let g = graph(&[("A.m", a.as_str())]);
    assert!(find_cycle(&g, "A`").is_none());
    assert!(find_cycle(&g, "Missing`").is_none());
    assert!(diamonds(&g, "A`").is_empty());
    assert_eq!(metrics(&g, "Missing`").instability, 0.0);
}
