//! Tests for verification oracles.

use approx::assert_relative_eq;
use phantom_kernel::assert_operation_valid;
use phantom_kernel::geometry::point::Point3d;
use phantom_kernel::geometry::Resolution;
use phantom_kernel::topology::primitives::{make_box, make_cylinder};
use phantom_kernel::{BooleanEngine, BspBooleanEngine, GeometryError, MaterialTag, Solid};
use test_harness::assertions::{assert_all_pass, assert_bounding_box, assert_manifold, assert_volume_close};
use test_harness::helpers::cylinder_volume;
use test_harness::oracle::*;
use test_harness::HarnessError;

fn block(label: &str, min: [f64; 3], max: [f64; 3]) -> Solid {
    make_box(
        label,
        Point3d::new(min[0], min[1], min[2]),
        Point3d::new(max[0], max[1], max[2]),
    )
    .unwrap()
}

// ── Solid Oracle Tests ──────────────────────────────────────────────────

#[test]
fn box_passes_solid_checks() {
    let cube = block("cube", [0.0; 3], [10.0; 3]);
    let verdicts = run_solid_checks(&cube);
    assert_eq!(verdicts.len(), 3);
    assert_all_pass(&verdicts).unwrap();
    assert_eq!(verdicts[2].value, Some(2.0), "box is a sphere topologically");
    assert!(check_validation(&cube).passed);
}

#[test]
fn empty_solid_fails_manifold_and_volume() {
    let void = Solid::empty("void");
    assert!(!check_manifold(&void).passed);
    let volume = check_positive_volume(&void);
    assert!(!volume.passed);
    assert_eq!(volume.value, Some(0.0));
    assert!(matches!(
        assert_all_pass(&run_solid_checks(&void)),
        Err(HarnessError::OracleFailure { .. })
    ));
    assert!(assert_manifold(&void, "void").is_err());
}

#[test]
fn material_check_follows_tag() {
    let cube = block("cube", [0.0; 3], [1.0; 3]);
    assert!(!check_material(&cube).passed);
    let tagged = cube.with_material(MaterialTag::new("pmma"));
    let verdict = check_material(&tagged);
    assert!(verdict.passed);
    assert_eq!(verdict.detail, "pmma");
}

#[test]
fn contained_compares_bounds() {
    let outer = block("outer", [0.0; 3], [10.0; 3]);
    let inner = block("inner", [2.0; 3], [5.0; 3]);
    let poking = block("poking", [8.0; 3], [11.0; 3]);
    assert!(check_contained(&outer, &inner, 1e-9).passed);
    let verdict = check_contained(&outer, &poking, 1e-9);
    assert!(!verdict.passed);
    assert_eq!(verdict.subject, "poking in outer");
}

// ── Boolean Oracle Tests ────────────────────────────────────────────────

#[test]
fn union_identity_holds_for_overlapping_boxes() {
    let engine = BspBooleanEngine::default();
    let a = block("a", [0.0, 0.0, 0.0], [3.0, 2.0, 2.0]);
    let b = block("b", [1.5, 0.5, 0.5], [4.0, 3.0, 1.5]);
    let verdict = check_union_identity(&engine, &a, &b, 1e-9).unwrap();
    assert!(verdict.passed, "{}", verdict.detail);
}

#[test]
fn union_identity_holds_for_disjoint_operands() {
    let engine = BspBooleanEngine::default();
    let a = block("a", [0.0; 3], [1.0; 3]);
    let b = block("b", [5.0; 3], [6.0; 3]);
    let verdict = check_union_identity(&engine, &a, &b, 1e-9).unwrap();
    assert!(verdict.passed, "{}", verdict.detail);
}

#[test]
fn subtract_identity_holds_for_bored_block() {
    let engine = BspBooleanEngine::default();
    let res = Resolution::from_degrees(30.0);
    let plate = block("plate", [-5.0, -5.0, 0.0], [5.0, 5.0, 3.0]);
    let bore = make_cylinder("bore", 0.0, 0.0, -1.0, 1.5, 5.0, &res).unwrap();
    let verdict = check_subtract_identity(&engine, &plate, &bore, 1e-6).unwrap();
    assert!(verdict.passed, "{}", verdict.detail);

    let bored = engine.subtract(plate, &bore).unwrap();
    assert_manifold(&bored, "bored plate").unwrap();
    assert_volume_close(&bored, 300.0 - cylinder_volume(1.5, 3.0, &res), 1e-9, "bored plate").unwrap();
    assert_bounding_box(&bored, [-5.0, -5.0, 0.0], [5.0, 5.0, 3.0], 1e-9, "bored plate").unwrap();
}

#[test]
fn operation_check_reports_volume_change() {
    let engine = BspBooleanEngine::default();
    let cube = block("cube", [0.0; 3], [1.0; 3]);
    let tool = block("tool", [0.5, -1.0, -1.0], [2.0, 2.0, 2.0]);
    let (verdict, result) = check_operation("halve", cube, |s| engine.subtract(s, &tool)).unwrap();
    assert!(verdict.passed, "{}", verdict.detail);
    assert_relative_eq!(result.volume_change, -0.5, epsilon = 1e-9);
    assert_operation_valid!(result, "halve");
}

#[test]
fn operation_check_propagates_errors() {
    let cube = block("cube", [0.0; 3], [1.0; 3]);
    let result = check_operation("refuse", cube, |_| Err(GeometryError::inconsistency("refused")));
    assert!(matches!(result, Err(GeometryError::GeometryInconsistency { .. })));
}
