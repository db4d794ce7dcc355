//! Graph builder tests: idempotent merges, first-wins mapping, tolerant scanning.

use paclint_analysis::units::UnitKind;
use paclint_analysis::GraphBuilder;

const GEOMETRY: &str = r#"BeginPackage["Geo`Shapes`", {"Geo`Core`"}]
Needs["Geo`Units`"]
Area::usage = "Area[r] gives the area."
Area[r_] := Pi Square[r]
Perimeter[r_] := 2 Pi r
Begin["`Private`"]
Square[x_] := x^2
End[]
EndPackage[]
"#;

#[test]
fn ingesting_twice_keeps_sets_and_doubles_counts() {
    let mut once = GraphBuilder::new();
    once.ingest("Shapes.m", GEOMETRY);
    let once = once.finish();

    let mut twice = GraphBuilder::new();
    twice.ingest("Shapes.m", GEOMETRY);
    twice.ingest("Shapes.m", GEOMETRY);
    let twice = twice.finish();

    assert_eq!(once.package("Geo`Shapes`"), twice.package("Geo`Shapes`"));
    assert_eq!(once.file("Shapes.m"), twice.file("Shapes.m"));
    for name in ["Area", "Perimeter", "Square", "Needs"] {
        let a = once.symbol(name).unwrap();
        let b = twice.symbol(name).unwrap();
        assert_eq!(a.defined_in, b.defined_in, "{name}");
        assert_eq!(a.referenced_in, b.referenced_in, "{name}");
    }
}

#[test]
fn reference_counts_grow_per_ingestion() {
    let mut once = GraphBuilder::new();
    once.ingest("Shapes.m", GEOMETRY);
    let once = once.finish();

    let mut twice = GraphBuilder::new();
    twice.ingest("Shapes.m", GEOMETRY);
    twice.ingest("Shapes.m", GEOMETRY);
    let twice = twice.finish();

    assert_eq!(once.reference_count("Square"), 1);
    assert_eq!(twice.reference_count("Square"), 2);
    assert!(twice.write_count() > once.write_count());
}

#[test]
fn declaration_sets_scope_and_dependencies() {
    let mut b = GraphBuilder::new();
    b.ingest("Shapes.m", GEOMETRY);
    let g = b.finish();

    let pkg = g.package("Geo`Shapes`").unwrap();
    assert_eq!(
        pkg.dependencies.iter().map(String::as_str).collect::<Vec<_>>(),
        ["Geo`Core`", "Geo`Units`"]
    );
    assert_eq!(
        pkg.exports.iter().map(String::as_str).collect::<Vec<_>>(),
        ["Area", "Perimeter"]
    );
    assert!(pkg.private_symbols.contains("Square"));
    assert!(!pkg.exports.contains("Square"));
    assert_eq!(g.fan_out("Geo`Shapes`"), 2);
    assert_eq!(g.fan_in("Geo`Core`"), 1);
}

#[test]
fn first_file_to_package_mapping_wins() {
    let mut b = GraphBuilder::new();
    b.ingest("One.m", "BeginPackage[\"First`\"]\nA[x_] := x\nEndPackage[]\n");
    b.ingest("One.m", "BeginPackage[\"Second`\"]\nB[x_] := x\nEndPackage[]\n");
    b.ingest("Two.m", "BeginPackage[\"First`\"]\nC[x_] := x\nEndPackage[]\n");
    let g = b.finish();

    assert_eq!(g.package_of_file("One.m"), Some("First`"));
    let first = g.package("First`").unwrap();
    assert_eq!(first.source_file, "One.m");
    // Re-registration from another file merges instead of clobbering.
    assert!(first.exports.contains("A"));
    assert!(first.exports.contains("C"));
    assert!(g.package("Second`").is_some());
}

#[test]
fn version_is_attached_once() {
    let mut b = GraphBuilder::new();
    b.ingest(
        "V.m",
        "BeginPackage[\"V`\"]\nPaclet[Name -> \"V\", Version -> \"1.4.2\"]\nEndPackage[]\n",
    );
    b.ingest(
        "V2.m",
        "BeginPackage[\"V`\"]\nPaclet[Version -> \"9.9\"]\nEndPackage[]\n",
    );
    let g = b.finish();
    assert_eq!(g.package("V`").unwrap().version.as_deref(), Some("1.4.2"));
}

#[test]
fn malformed_constructs_do_not_stop_the_scan() {
    let text = "BeginPackage[\"Messy`\"]\nBroken[ := oops\nbad = \"never closed\nGood[x_] := x\nAlso[y_] := Good[y]\nEndPackage[]\n";
    let mut b = GraphBuilder::new();
    b.ingest("Messy.m", text);
    let g = b.finish();

    let pkg = g.package("Messy`").unwrap();
    assert!(pkg.exports.contains("Good"));
    assert!(pkg.exports.contains("Also"));
    assert!(!pkg.exports.contains("Broken"));
    assert!(g.is_referenced_in("Good", "Messy.m"));
}

#[test]
fn commented_and_quoted_calls_are_not_references() {
    let text = "BeginPackage[\"Q`\"]\n(* Hidden[1] *)\nmsg = \"Quoted[2]\"\nShown[x_] := x\nEndPackage[]\n";
    let mut b = GraphBuilder::new();
    b.ingest("Q.m", text);
    let g = b.finish();
    assert!(g.symbol("Hidden").is_none());
    assert!(g.symbol("Quoted").is_none());
    assert!(g.symbol("Shown").is_some());
}

#[test]
fn files_are_classified_by_name() {
    let mut b = GraphBuilder::new();
    b.ingest("src/Geometry.m", "BeginPackage[\"Geometry`\"]\nEndPackage[]\n");
    b.ingest("tests/GeometryTest.wlt", "VerificationTest[1 + 1, 2]\n");
    let g = b.finish();

    assert!(g.is_test_file("tests/GeometryTest.wlt"));
    assert!(!g.is_test_file("src/Geometry.m"));
    assert_eq!(g.file("src/Geometry.m").unwrap().kind, UnitKind::Implementation);
    assert_eq!(g.test_files().len(), 1);
    assert_eq!(g.implementation_files().len(), 1);
}

#[test]
fn reset_clears_every_table() {
    let mut b = GraphBuilder::new();
    b.ingest("Shapes.m", GEOMETRY);
    let mut b = b.finish().reset();
    b.ingest("Other.m", "BeginPackage[\"Other`\"]\nEndPackage[]\n");
    let g = b.finish();

    assert!(g.package("Geo`Shapes`").is_none());
    assert!(g.symbol("Area").is_none());
    assert!(g.file("Shapes.m").is_none());
    assert_eq!(g.package_count(), 1);
}
