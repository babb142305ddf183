use crate::topology::mesh::Solid;

/// Verify that boolean results preserve the volume identity
/// `vol(A ∪ B) = vol(A) + vol(B) - vol(A ∩ B)`.
///
/// Mesh volumes are exact for the polygonal boundary, so the identity holds
/// up to floating point error when the operations are correct.
pub fn verify_boolean_volume_identity(a: &Solid, b: &Solid, union: &Solid, intersection: Option<&Solid>) -> VolumeVerification {
    let vol_a = a.volume();
    let vol_b = b.volume();
    let vol_union = union.volume();
    let vol_intersection = intersection.map(|s| s.volume());

    let expected_union = match vol_intersection {
        Some(vol_int) => vol_a + vol_b - vol_int,
        // No intersection solid: the operands must not overlap.
        None => vol_a + vol_b,
    };

    let relative_error = if expected_union > 0.0 {
        (vol_union - expected_union).abs() / expected_union
    } else {
        vol_union.abs()
    };

    VolumeVerification {
        vol_a,
        vol_b,
        vol_union,
        vol_intersection,
        expected_union,
        relative_error,
    }
}

/// Verify `vol(A - B) = vol(A) - vol(A ∩ B)`.
pub fn verify_subtract_volume(a: &Solid, difference: &Solid, intersection: &Solid) -> f64 {
    let expected = a.volume() - intersection.volume();
    if expected.abs() > 0.0 {
        (difference.volume() - expected).abs() / expected.abs()
    } else {
        difference.volume().abs()
    }
}

#[derive(Debug)]
pub struct VolumeVerification {
    pub vol_a: f64,
    pub vol_b: f64,
    pub vol_union: f64,
    pub vol_intersection: Option<f64>,
    pub expected_union: f64,
    pub relative_error: f64,
}

impl VolumeVerification {
    pub fn is_valid(&self, max_relative_error: f64) -> bool {
        self.relative_error < max_relative_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolean::{BooleanEngine, BspBooleanEngine};
    use crate::geometry::point::Point3d;
    use crate::topology::primitives::make_box;

    #[test]
    fn test_volume_identity_for_overlapping_boxes() {
        let engine = BspBooleanEngine::default();
        let a = make_box("a", Point3d::ORIGIN, Point3d::new(3.0, 2.0, 2.0)).unwrap();
        let b = make_box("b", Point3d::new(1.5, 0.5, 0.5), Point3d::new(4.0, 3.0, 1.5)).unwrap();
        let union = engine.union(a.clone(), &b).unwrap();
        let intersection = engine.intersect(a.clone(), &b).unwrap();
        let difference = engine.subtract(a.clone(), &b).unwrap();

        let check = verify_boolean_volume_identity(&a, &b, &union, Some(&intersection));
        assert!(check.is_valid(1e-9), "{check:?}");
        assert!(verify_subtract_volume(&a, &difference, &intersection) < 1e-9);
    }
}
