use serde::Serialize;

use phantom_kernel::geometry::transform::BoundingBox;
use phantom_kernel::Solid;

/// Measured state of a solid at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolidSnapshot {
    pub label: String,
    pub volume: f64,
    pub surface_area: f64,
    pub polygons: usize,
    pub bounds: Option<BoundingBox>,
}

/// Take a snapshot of a solid for diffing.
pub fn snapshot(solid: &Solid) -> SolidSnapshot {
    let bounds = solid.bounding_box();
    SolidSnapshot {
        label: solid.label().to_string(),
        volume: solid.volume(),
        surface_area: solid.surface_area(),
        polygons: solid.polygons().len(),
        bounds: bounds.is_valid().then_some(bounds),
    }
}

/// Change between two snapshots of the same part.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffResult {
    /// `after - before`; negative when material was removed.
    pub volume_change: f64,
    pub area_change: f64,
    pub polygon_change: i64,
}

impl DiffResult {
    pub fn volume_removed(&self) -> f64 {
        (-self.volume_change).max(0.0)
    }

    /// True when the volume moved by less than `rel` of the larger magnitude.
    pub fn is_volume_preserving(&self, before: &SolidSnapshot, rel: f64) -> bool {
        self.volume_change.abs() <= rel * before.volume.abs().max(1.0)
    }
}

/// Diff two snapshots. For a freshly built solid pass the empty snapshot as
/// `before`.
pub fn diff(before: &SolidSnapshot, after: &SolidSnapshot) -> DiffResult {
    DiffResult {
        volume_change: after.volume - before.volume,
        area_change: after.surface_area - before.surface_area,
        polygon_change: after.polygons as i64 - before.polygons as i64,
    }
}

/// Snapshot of nothing.
pub fn empty_snapshot(label: &str) -> SolidSnapshot {
    SolidSnapshot {
        label: label.to_string(),
        volume: 0.0,
        surface_area: 0.0,
        polygons: 0,
        bounds: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phantom_kernel::geometry::point::Point3d;
    use phantom_kernel::topology::primitives::make_box;

    #[test]
    fn test_snapshot_of_box() {
        let b = make_box("b", Point3d::ORIGIN, Point3d::new(1.0, 2.0, 3.0)).unwrap();
        let snap = snapshot(&b);
        assert_eq!(snap.polygons, 6);
        assert!((snap.volume - 6.0).abs() < 1e-12);
        assert!(snap.bounds.is_some());
        let d = diff(&empty_snapshot("b"), &snap);
        assert!((d.volume_change - 6.0).abs() < 1e-12);
        assert_eq!(d.volume_removed(), 0.0);
    }
}
