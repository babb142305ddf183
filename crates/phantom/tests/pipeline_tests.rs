use std::collections::BTreeMap;

use phantom_assembly::{Assembly, Node};
use phantom_kernel::boolean::{BoolOp, BooleanOutcome, Interaction};
use phantom_kernel::{BooleanEngine, GeometryError, GeometryResult, Solid};
use phantom_ops::OpError;

use nema_phantom::{build_phantom, build_phantom_with, check_leaves, PhantomError, PhantomParams, ASSEMBLY_LABEL, FILLED_LABEL};

fn coarse() -> PhantomParams {
    let values = BTreeMap::from([("angular_resolution_deg".to_string(), 30.0)]);
    PhantomParams::from_map(&values).unwrap()
}

fn labels(children: &[Node]) -> Vec<&str> {
    children.iter().map(Node::label).collect()
}

/// Engine that refuses every operation.
struct BrokenEngine;

impl BooleanEngine for BrokenEngine {
    fn apply(&self, _op: BoolOp, a: Solid, _b: &Solid) -> GeometryResult<BooleanOutcome> {
        Err(GeometryError::inconsistency(format!("cannot clip {}", a.label())))
    }
}

/// Engine that answers every operation with the target minus one face.
struct LeakyEngine;

impl BooleanEngine for LeakyEngine {
    fn apply(&self, _op: BoolOp, a: Solid, _b: &Solid) -> GeometryResult<BooleanOutcome> {
        Ok(BooleanOutcome {
            solid: open_copy(&a),
            interaction: Interaction::Overlapping,
        })
    }
}

fn open_copy(solid: &Solid) -> Solid {
    let mut loops = solid.polygon_loops();
    loops.pop();
    Solid::from_polygons(solid.label(), loops, 1e-9)
}

#[test]
fn hierarchy_matches_the_phantom_layout() {
    let model = build_phantom(&coarse()).unwrap();
    assert_eq!(model.filled.label, FILLED_LABEL);
    assert_eq!(
        labels(&model.filled.children),
        [ASSEMBLY_LABEL, "Sphere Liquids", "Background Liquid"]
    );
    assert_eq!(
        labels(&model.assembly.children),
        ["Nema Body", "Spheres Mounted", "Nema Lung Insert Shell", "Filling Screws"]
    );

    let mounted = model.assembly.find("Spheres Mounted").unwrap();
    let Node::Assembly(mounted) = mounted else {
        panic!("Spheres Mounted is not a group");
    };
    assert_eq!(
        labels(&mounted.children),
        ["Sphere Mounting Plate", "Sphere Screws", "Spheres & Tubing"]
    );
    assert!(model
        .assembly
        .find_solid("Spheres Mounted/Spheres & Tubing/Sphere 37mm/Hollow Sphere 37mm")
        .is_ok());
    assert!(model
        .assembly
        .find_solid("Spheres Mounted/Spheres & Tubing/Sphere 10mm/Hollow Tube 0")
        .is_ok());
    assert!(model.filled.find_solid("Sphere Liquids/Sphere 3 22mm Filling").is_ok());
}

#[test]
fn part_counts_and_materials() {
    let model = build_phantom(&coarse()).unwrap();
    let screws = |path: &str| match model.assembly.find(path).unwrap() {
        Node::Assembly(a) => a.leaf_count(),
        Node::Solid(_) => 1,
    };
    assert_eq!(screws("Filling Screws"), 5);
    assert_eq!(screws("Spheres Mounted/Sphere Screws"), 12 + 6);
    assert_eq!(screws("Spheres Mounted/Spheres & Tubing"), 12);

    let material = |path: &str| {
        model
            .filled
            .find_solid(path)
            .unwrap()
            .material()
            .map(|m| m.as_str().to_string())
    };
    assert_eq!(material("Nema Phantom Assembly/Nema Body").as_deref(), Some("pmma"));
    assert_eq!(material("Background Liquid").as_deref(), Some("water"));
    assert_eq!(
        material("Nema Phantom Assembly/Filling Screws/Filling Screw 1").as_deref(),
        Some("pe")
    );
    assert_eq!(model.insert_filling.material().map(|m| m.as_str()), Some("air"));
    assert!(model.filled.leaves().iter().all(|l| l.solid.material().is_some()));
}

#[test]
fn shared_solids_are_not_copied() {
    let model = build_phantom(&coarse()).unwrap();
    let in_assembly = model.assembly.find_solid("Nema Body").unwrap();
    let in_filled = model.filled.find_solid("Nema Phantom Assembly/Nema Body").unwrap();
    assert!(std::sync::Arc::ptr_eq(in_assembly, in_filled));
}

#[test]
fn body_is_recessed_for_the_plate() {
    let model = build_phantom(&coarse()).unwrap();
    let body = model.assembly.find_solid("Nema Body").unwrap();
    let plate = model.assembly.find_solid("Spheres Mounted/Sphere Mounting Plate").unwrap();
    let bounds = body.bounding_box();
    assert!((bounds.min.z - 0.0).abs() < 1e-9);
    assert!((bounds.max.z - 217.0).abs() < 1e-9);
    assert!((plate.bounding_box().min.z + 3.0).abs() < 1e-9);
    assert!((plate.bounding_box().max.z - 12.0).abs() < 1e-9);
}

#[test]
fn invalid_parameters_abort_before_building() {
    let params = PhantomParams {
        body_wall_thickness: 80.0,
        ..coarse()
    };
    let err = build_phantom(&params).unwrap_err();
    assert!(matches!(
        err,
        PhantomError::Geometry(GeometryError::ParameterOutOfRange { .. })
    ));
}

#[test]
fn kernel_failure_aborts_the_pipeline() {
    let err = build_phantom_with(&BrokenEngine, &coarse()).unwrap_err();
    assert!(
        matches!(
            err,
            PhantomError::Operation(OpError::Kernel(GeometryError::GeometryInconsistency { .. }))
        ),
        "{err}"
    );
}

#[test]
fn open_boolean_result_aborts_the_pipeline() {
    let err = build_phantom_with(&LeakyEngine, &coarse()).unwrap_err();
    assert!(
        matches!(
            &err,
            PhantomError::Operation(OpError::Kernel(GeometryError::GeometryInconsistency { reason }))
                if reason.contains("not a closed manifold")
        ),
        "{err}"
    );
}

#[test]
fn open_leaf_fails_the_tree_check() {
    let model = build_phantom(&coarse()).unwrap();
    assert!(check_leaves(&model.filled).is_ok());

    let body = model.assembly.find_solid("Nema Body").unwrap();
    let tree = Assembly::group("Broken", [Node::from(open_copy(body))]);
    let err = check_leaves(&tree).unwrap_err();
    assert!(matches!(&err, PhantomError::OpenSolid { path } if path == "Broken/Nema Body"), "{err}");
}
