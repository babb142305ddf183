use std::collections::BTreeMap;

use tracing::{debug, info, instrument, warn};

use super::bsp::{BspTree, flip_all};
use super::split::Polygon;
use crate::Tolerance;
use crate::error::{GeometryError, GeometryResult};
use crate::geometry::point::Point3d;
use crate::geometry::transform::BoundingBox;
use crate::topology::mesh::Solid;
use crate::validation::audit::audit_solid;

/// Boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    Union,
    Subtract,
    Intersect,
}

/// How the operands of a boolean related to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// The operands share no volume; the operation was a no-op, a shell
    /// concatenation, or produced an empty solid.
    Disjoint,
    /// The operands overlap and the boundaries were clipped.
    Overlapping,
}

/// Result of a boolean operation together with how the operands interacted.
#[derive(Debug, Clone)]
pub struct BooleanOutcome {
    pub solid: Solid,
    pub interaction: Interaction,
}

/// Reject operands that are empty, open, or inside out.
pub fn validate_operand(solid: &Solid, tol: &Tolerance) -> GeometryResult<()> {
    let invalid = |reason: String| GeometryError::InvalidOperand {
        label: solid.label().to_string(),
        reason,
    };
    if solid.is_empty() {
        return Err(invalid("solid has no boundary".into()));
    }
    let audit = audit_solid(solid);
    if !audit.is_manifold() {
        return Err(invalid(format!(
            "boundary is not a closed manifold ({} free, {} over-shared edges)",
            audit.free_edges, audit.over_shared_edges
        )));
    }
    let volume = solid.volume();
    if volume <= tol.coincidence {
        return Err(invalid(format!("enclosed volume {volume:.3e} is not positive")));
    }
    Ok(())
}

/// Perform a boolean operation between two solids.
///
/// The first operand is consumed; the result inherits its label and material.
/// Strategy:
/// 1. Validate both operands
/// 2. Bounding-box prefilter (disjoint operands short-circuit)
/// 3. Clip each boundary against the other's BSP tree
/// 4. Restore polygons that survived whole, then weld and repair
#[instrument(skip_all, fields(op = ?op, a = a.label(), b = b.label()))]
pub fn boolean_op(a: Solid, b: &Solid, op: BoolOp, tol: &Tolerance) -> GeometryResult<BooleanOutcome> {
    validate_operand(&a, tol)?;
    validate_operand(b, tol)?;

    let eps = tol.plane;
    let bb_a = a.bounding_box().expanded(eps);
    let bb_b = b.bounding_box().expanded(eps);

    if !bb_a.intersects(&bb_b) {
        debug!("bounding boxes are disjoint");
        let solid = match op {
            BoolOp::Subtract => a,
            BoolOp::Union => a.merged_with(b),
            BoolOp::Intersect => {
                let material = a.material().cloned();
                let empty = Solid::empty(a.label());
                match material {
                    Some(m) => empty.with_material(m),
                    None => empty,
                }
            }
        };
        return Ok(BooleanOutcome {
            solid,
            interaction: Interaction::Disjoint,
        });
    }

    let a_loops = a.polygon_loops();
    let b_loops = b.polygon_loops();
    let originals: Vec<Vec<Point3d>> = a_loops.iter().chain(b_loops.iter()).cloned().collect();
    let a_all = to_polygons(a_loops, 0);
    let b_all = to_polygons(b_loops, a.polygons().len());
    let original_areas: Vec<f64> = {
        let mut areas = vec![0.0; originals.len()];
        for p in a_all.iter().chain(b_all.iter()) {
            areas[p.source] = p.area();
        }
        areas
    };

    let tree_a = BspTree::build(a_all.clone(), eps);
    let tree_b = BspTree::build(b_all.clone(), eps);
    let (a_near, a_far) = partition_near(a_all, &bb_b);
    let (b_near, b_far) = partition_near(b_all, &bb_a);
    debug!(
        a_near = a_near.len(),
        a_far = a_far.len(),
        b_near = b_near.len(),
        b_far = b_far.len(),
        "partitioned boundary polygons"
    );

    let b_source_start = a.polygons().len();
    let mut result: Vec<Polygon> = Vec::new();
    match op {
        BoolOp::Subtract => {
            let tree_a_inv = tree_a.inverted();
            let mut a_polys = a_near;
            flip_all(&mut a_polys);
            let mut a_polys = tree_b.clip(a_polys, eps);
            let mut b_polys = tree_a_inv.clip(b_near, eps);
            flip_all(&mut b_polys);
            // Tool faces stay flipped: they bound the cavity.
            let b_polys = tree_a_inv.clip(b_polys, eps);
            flip_all(&mut a_polys);
            result.extend(a_far);
            result.extend(a_polys);
            result.extend(b_polys);
        }
        BoolOp::Union => {
            let a_polys = tree_b.clip(a_near, eps);
            let mut b_polys = tree_a.clip(b_near, eps);
            flip_all(&mut b_polys);
            let mut b_polys = tree_a.clip(b_polys, eps);
            flip_all(&mut b_polys);
            result.extend(a_far);
            result.extend(a_polys);
            result.extend(b_far);
            result.extend(b_polys);
        }
        BoolOp::Intersect => {
            let tree_a_inv = tree_a.inverted();
            let tree_b_inv = tree_b.inverted();
            let mut b_polys = tree_a_inv.clip(b_near, eps);
            flip_all(&mut b_polys);
            let mut a_polys = a_near;
            flip_all(&mut a_polys);
            let mut a_polys = tree_b_inv.clip(a_polys, eps);
            let mut b_polys = tree_a_inv.clip(b_polys, eps);
            flip_all(&mut a_polys);
            flip_all(&mut b_polys);
            result.extend(a_polys);
            result.extend(b_polys);
        }
    }

    let restored = restore_fragments(result, &originals, &original_areas);

    if op == BoolOp::Subtract && restored.is_untouched(b_source_start) {
        debug!("tool does not reach into the target");
        return Ok(BooleanOutcome {
            solid: a,
            interaction: Interaction::Disjoint,
        });
    }

    let mut solid = Solid::from_polygons(a.label(), restored.loops, tol.coincidence);
    if let Some(material) = a.material() {
        solid = solid.with_material(material.clone());
    }

    check_result(&solid)?;
    info!(
        polygons = solid.polygons().len(),
        volume = solid.volume(),
        "boolean operation complete"
    );
    let interaction = if solid.is_empty() {
        Interaction::Disjoint
    } else {
        Interaction::Overlapping
    };
    Ok(BooleanOutcome { solid, interaction })
}

/// A non-empty boolean result must be a closed manifold. An empty result is
/// the legitimate outcome of a disjoint intersect or a fully consumed subtract.
pub fn check_result(solid: &Solid) -> GeometryResult<()> {
    if solid.is_empty() {
        return Ok(());
    }
    let audit = audit_solid(solid);
    if audit.is_manifold() {
        return Ok(());
    }
    warn!(
        label = solid.label(),
        free_edges = audit.free_edges,
        over_shared_edges = audit.over_shared_edges,
        "boolean result is not a closed manifold"
    );
    Err(GeometryError::inconsistency(format!(
        "boolean result '{}' is not a closed manifold ({} free, {} over-shared edges)",
        solid.label(),
        audit.free_edges,
        audit.over_shared_edges
    )))
}

fn to_polygons(loops: Vec<Vec<Point3d>>, first_source: usize) -> Vec<Polygon> {
    loops
        .into_iter()
        .enumerate()
        .filter_map(|(i, pts)| Polygon::new(pts, first_source + i))
        .collect()
}

/// Split polygons into those whose bounds reach `other` and those that
/// cannot interact with it.
fn partition_near(polygons: Vec<Polygon>, other: &BoundingBox) -> (Vec<Polygon>, Vec<Polygon>) {
    polygons
        .into_iter()
        .partition(|p| BoundingBox::from_points(&p.vertices).intersects(other))
}

struct Restored {
    loops: Vec<Vec<Point3d>>,
    /// Sources that came through whole, in their original orientation.
    whole_unflipped: Vec<usize>,
    /// Every source that contributed at least one fragment.
    contributing: Vec<usize>,
}

impl Restored {
    /// True when every target polygon survived whole and unflipped and no
    /// tool polygon contributed.
    fn is_untouched(&self, b_source_start: usize) -> bool {
        self.contributing.iter().all(|&s| s < b_source_start)
            && self.whole_unflipped.len() == b_source_start
            && self.contributing.len() == b_source_start
    }
}

/// Replace the fragments of every source polygon that survived in full by
/// the source polygon itself.
fn restore_fragments(polygons: Vec<Polygon>, originals: &[Vec<Point3d>], areas: &[f64]) -> Restored {
    let mut groups: BTreeMap<(usize, bool), Vec<Polygon>> = BTreeMap::new();
    for p in polygons {
        groups.entry((p.source, p.flipped)).or_default().push(p);
    }

    let mut loops = Vec::with_capacity(groups.len());
    let mut whole_unflipped = Vec::new();
    let mut contributing = Vec::new();
    for ((source, flipped), fragments) in groups {
        if contributing.last() != Some(&source) {
            contributing.push(source);
        }
        let total: f64 = fragments.iter().map(|f| f.area()).sum();
        let original = areas[source];
        if (total - original).abs() <= 1e-9 * original.max(1.0) {
            let mut whole = originals[source].clone();
            if flipped {
                whole.reverse();
            } else {
                whole_unflipped.push(source);
            }
            loops.push(whole);
        } else {
            loops.extend(fragments.into_iter().map(|f| f.vertices));
        }
    }
    Restored {
        loops,
        whole_unflipped,
        contributing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Resolution;
    use crate::topology::mesh::MaterialTag;
    use crate::topology::primitives::{make_box, make_cylinder};

    fn cube(min: f64, max: f64) -> Solid {
        make_box("cube", Point3d::new(min, min, min), Point3d::new(max, max, max)).unwrap()
    }

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    #[test]
    fn test_subtract_overlapping_boxes() {
        let out = boolean_op(cube(0.0, 2.0), &cube(1.0, 3.0), BoolOp::Subtract, &tol()).unwrap();
        assert_eq!(out.interaction, Interaction::Overlapping);
        assert!((out.solid.volume() - 7.0).abs() < 1e-9);
        assert!(audit_solid(&out.solid).is_manifold());
    }

    #[test]
    fn test_union_overlapping_boxes() {
        let out = boolean_op(cube(0.0, 2.0), &cube(1.0, 3.0), BoolOp::Union, &tol()).unwrap();
        assert!((out.solid.volume() - 15.0).abs() < 1e-9);
        assert!(audit_solid(&out.solid).is_manifold());
    }

    #[test]
    fn test_intersect_overlapping_boxes() {
        let out = boolean_op(cube(0.0, 2.0), &cube(1.0, 3.0), BoolOp::Intersect, &tol()).unwrap();
        assert!((out.solid.volume() - 1.0).abs() < 1e-9);
        assert!(audit_solid(&out.solid).is_manifold());
    }

    #[test]
    fn test_disjoint_subtract_is_reported_noop() {
        let target = cube(0.0, 1.0).with_material(MaterialTag::new("pmma"));
        let out = boolean_op(target, &cube(5.0, 6.0), BoolOp::Subtract, &tol()).unwrap();
        assert_eq!(out.interaction, Interaction::Disjoint);
        assert!((out.solid.volume() - 1.0).abs() < 1e-12);
        assert_eq!(out.solid.material().map(|m| m.as_str()), Some("pmma"));
    }

    #[test]
    fn test_disjoint_union_and_intersect() {
        let u = boolean_op(cube(0.0, 1.0), &cube(5.0, 6.0), BoolOp::Union, &tol()).unwrap();
        assert!((u.solid.volume() - 2.0).abs() < 1e-12);
        let i = boolean_op(cube(0.0, 1.0), &cube(5.0, 6.0), BoolOp::Intersect, &tol()).unwrap();
        assert!(i.solid.is_empty());
        assert_eq!(i.interaction, Interaction::Disjoint);
    }

    #[test]
    fn test_drilled_cylinder_through_box() {
        let res = Resolution::from_degrees(15.0);
        let block = make_box("block", Point3d::new(-5.0, -5.0, 0.0), Point3d::new(5.0, 5.0, 4.0)).unwrap();
        let drill = make_cylinder("drill", 0.0, 0.0, -1.0, 2.0, 6.0, &res).unwrap();
        let n = res.circle_segments() as f64;
        let hole_area = 0.5 * n * 4.0 * (std::f64::consts::TAU / n).sin();
        let out = boolean_op(block, &drill, BoolOp::Subtract, &tol()).unwrap();
        assert!((out.solid.volume() - (400.0 - hole_area * 4.0)).abs() < 1e-6);
        assert!(audit_solid(&out.solid).is_manifold());
    }

    #[test]
    fn test_empty_operand_rejected() {
        let result = boolean_op(cube(0.0, 1.0), &Solid::empty("nothing"), BoolOp::Subtract, &tol());
        assert!(matches!(result, Err(GeometryError::InvalidOperand { .. })));
    }

    #[test]
    fn test_open_operand_rejected() {
        let cube = cube(0.0, 1.0);
        let mut loops = cube.polygon_loops();
        loops.pop();
        let open = Solid::from_polygons("open", loops, 1e-9);
        let result = boolean_op(open, &cube, BoolOp::Union, &tol());
        assert!(matches!(result, Err(GeometryError::InvalidOperand { label, .. }) if label == "open"));
    }

    #[test]
    fn test_open_result_rejected() {
        let mut loops = cube(0.0, 1.0).polygon_loops();
        loops.pop();
        let open = Solid::from_polygons("open", loops, 1e-9);
        let result = check_result(&open);
        assert!(matches!(result, Err(GeometryError::GeometryInconsistency { reason }) if reason.contains("open")));
        assert!(check_result(&cube(0.0, 1.0)).is_ok());
        assert!(check_result(&Solid::empty("nothing")).is_ok());
    }

    #[test]
    fn test_consumed_subtract_is_empty_not_an_error() {
        let out = boolean_op(cube(0.0, 1.0), &cube(-1.0, 2.0), BoolOp::Subtract, &tol()).unwrap();
        assert!(out.solid.is_empty());
        assert_eq!(out.interaction, Interaction::Disjoint);
    }
}
