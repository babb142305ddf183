//! Tests for the report module.

use phantom_assembly::{Assembly, Node};
use phantom_kernel::geometry::point::Point3d;
use phantom_kernel::topology::primitives::make_box;
use phantom_kernel::{MaterialTag, Solid};
use test_harness::ModelReport;

fn block(label: &str, x0: f64, x1: f64) -> Solid {
    make_box(label, Point3d::new(x0, 0.0, 0.0), Point3d::new(x1, 1.0, 1.0)).unwrap()
}

fn rig() -> Assembly {
    let pmma = MaterialTag::new("pmma");
    Assembly::group(
        "Test Rig",
        [
            Node::from(block("Block A", 0.0, 1.0).with_material(pmma.clone())),
            Node::from(Assembly::group(
                "Stack",
                [
                    Node::from(block("Block B", 1.0, 2.0).with_material(pmma)),
                    Node::from(block("Block C", 2.0, 3.0)),
                ],
            )),
        ],
    )
}

#[test]
fn report_lists_every_leaf_by_path() {
    let report = ModelReport::of(&rig());
    let text = report.to_text();
    assert!(text.starts_with("=== Test Rig ==="), "{text}");
    assert!(text.contains("Solids (3 leaves, 0 open)"), "{text}");
    assert!(text.contains("Test Rig/Block A [pmma]"), "{text}");
    assert!(text.contains("Test Rig/Stack/Block B [pmma]"), "{text}");
    assert!(text.contains("Test Rig/Stack/Block C [-]"), "{text}");
    assert!(text.contains("V=8 E=12 F=6 | Euler=2"), "{text}");
}

#[test]
fn report_merges_bounds_and_volume() {
    let report = ModelReport::of(&rig());
    assert!((report.total_volume() - 3.0).abs() < 1e-12);
    assert!(report
        .to_text()
        .contains("Bounding Box: (0.0, 0.0, 0.0) -> (3.0, 1.0, 1.0)"));
}

#[test]
fn report_flags_untagged_solids() {
    let report = ModelReport::of(&rig());
    // Three solids, three solid checks each plus one material check.
    assert_eq!(report.oracle_results.len(), 12);
    assert_eq!(report.failed_checks(), 1);
    let text = report.to_string();
    assert!(text.contains("12 checks, 1 failed"), "{text}");
    assert!(text.contains("[FAIL] material Test Rig/Stack/Block C"), "{text}");
}

#[test]
fn report_marks_open_solids() {
    let rig = Assembly::group(
        "Broken",
        [Node::from(Solid::empty("Nothing").with_material(MaterialTag::new("air")))],
    );
    let report = ModelReport::of(&rig);
    let text = report.to_text();
    assert!(text.contains("Solids (1 leaves, 1 open)"), "{text}");
    assert!(text.contains("(OPEN)"), "{text}");
    assert!(report.failed_checks() >= 2);
}

#[test]
fn empty_assembly_has_no_bounds() {
    let report = ModelReport::of(&Assembly::new("Empty"));
    assert!(report.bounding_box.is_none());
    assert!(report.to_text().contains("all passed"));
}
