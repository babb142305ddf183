use std::f64::consts::TAU;

use tracing::{debug, instrument};

use crate::error::{GeometryError, GeometryResult, require_positive};
use crate::geometry::point::{Point2d, Point3d};
use crate::geometry::transform::Transform;
use crate::topology::mesh::Solid;

/// Where a shape goes. Applying a placement yields a new solid and leaves
/// the source untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    transform: Transform,
}

impl Placement {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            transform: Transform::translation(dx, dy, dz),
        }
    }

    pub fn at(p: Point3d) -> Self {
        Self::translation(p.x, p.y, p.z)
    }

    /// Reflection across the horizontal plane `z = height`.
    pub fn mirror_z(height: f64) -> Self {
        Self {
            transform: Transform::mirror_z(height),
        }
    }

    /// `self` first, then `next`.
    pub fn then(&self, next: &Placement) -> Placement {
        Placement {
            transform: self.transform.then(&next.transform),
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn origin(&self) -> Point3d {
        self.transform.origin()
    }

    pub fn apply(&self, solid: &Solid) -> Solid {
        solid.transformed(&self.transform)
    }

    /// This placement and its image under `mirror`.
    pub fn mirrored_pair(&self, mirror: &Placement) -> [Placement; 2] {
        [*self, self.then(mirror)]
    }
}

/// `count` placements evenly spaced on a circle in a horizontal plane.
///
/// Placement `i` sits at angle `angular_offset + i * 2π / count` around
/// `center`. Placements only translate; the placed shape keeps its
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularPattern {
    count: usize,
    radius: f64,
    angular_offset: f64,
    center: Point2d,
    elevation: f64,
}

impl CircularPattern {
    pub fn new(count: usize, radius: f64, center: Point2d, elevation: f64) -> GeometryResult<Self> {
        if count == 0 {
            return Err(GeometryError::out_of_range("pattern count", 0.0, "must be at least 1"));
        }
        require_positive("pattern radius", radius)?;
        Ok(Self {
            count,
            radius,
            angular_offset: 0.0,
            center,
            elevation,
        })
    }

    /// Angle of the first placement, in radians.
    pub fn with_angular_offset(mut self, angle: f64) -> Self {
        self.angular_offset = angle;
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn angles(&self) -> Vec<f64> {
        (0..self.count)
            .map(|i| self.angular_offset + TAU * i as f64 / self.count as f64)
            .collect()
    }

    pub fn positions(&self) -> Vec<Point3d> {
        self.positions_at(&vec![self.elevation; self.count])
    }

    fn positions_at(&self, elevations: &[f64]) -> Vec<Point3d> {
        self.angles()
            .into_iter()
            .zip(elevations)
            .map(|(a, &z)| Point3d::from_2d(Point2d::polar(self.center, self.radius, a), z))
            .collect()
    }

    #[instrument(skip(self), fields(count = self.count, radius = self.radius))]
    pub fn placements(&self) -> Vec<Placement> {
        let placements: Vec<Placement> = self.positions().into_iter().map(Placement::at).collect();
        debug!(elevation = self.elevation, "circular pattern placements");
        placements
    }

    /// Placements with a per-position elevation overriding the pattern's own.
    pub fn placements_at(&self, elevations: &[f64]) -> GeometryResult<Vec<Placement>> {
        if elevations.len() != self.count {
            return Err(GeometryError::out_of_range(
                "pattern elevations",
                elevations.len() as f64,
                format!("expected one elevation per position ({})", self.count),
            ));
        }
        Ok(self.positions_at(elevations).into_iter().map(Placement::at).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::primitives::make_box;
    use approx::assert_relative_eq;

    #[test]
    fn test_six_positions_sixty_degrees_apart() {
        let pattern = CircularPattern::new(6, 57.2, Point2d::new(0.0, 35.0), 82.0).unwrap();
        let positions = pattern.positions();
        assert_eq!(positions.len(), 6);
        let center = Point3d::new(0.0, 35.0, 82.0);
        for (i, p) in positions.iter().enumerate() {
            assert_relative_eq!(p.distance_to(&center), 57.2, epsilon = 1e-9);
            assert_relative_eq!(p.z, 82.0);
            let next = positions[(i + 1) % 6];
            let (a, b) = (*p - center, next - center);
            let angle = (a.dot(&b) / (a.length() * b.length())).clamp(-1.0, 1.0).acos();
            assert_relative_eq!(angle.to_degrees(), 60.0, epsilon = 1e-9);
        }
        assert_relative_eq!(positions[0].x, 57.2, epsilon = 1e-12);
    }

    #[test]
    fn test_pattern_is_deterministic() {
        let pattern = CircularPattern::new(12, 72.5, Point2d::new(0.0, 35.0), -3.0)
            .unwrap()
            .with_angular_offset(0.3);
        assert_eq!(pattern.placements(), pattern.placements());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(matches!(
            CircularPattern::new(0, 1.0, Point2d::ORIGIN, 0.0),
            Err(GeometryError::ParameterOutOfRange { .. })
        ));
        assert!(matches!(
            CircularPattern::new(3, 0.0, Point2d::ORIGIN, 0.0),
            Err(GeometryError::ParameterOutOfRange { .. })
        ));
    }

    #[test]
    fn test_elevation_override() {
        let pattern = CircularPattern::new(2, 1.0, Point2d::ORIGIN, 0.0).unwrap();
        let placed = pattern.placements_at(&[1.0, 2.0]).unwrap();
        assert_relative_eq!(placed[1].origin().z, 2.0);
        assert!(pattern.placements_at(&[1.0]).is_err());
    }

    #[test]
    fn test_mirrored_pair_keeps_source() {
        let solid = make_box("b", Point3d::new(0.0, 0.0, 0.0), Point3d::new(1.0, 1.0, 1.0)).unwrap();
        let [a, b] = Placement::identity().mirrored_pair(&Placement::mirror_z(5.0));
        let first = a.apply(&solid);
        let second = b.apply(&solid);
        assert_relative_eq!(second.bounding_box().min.z, 9.0);
        assert_relative_eq!(second.volume(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(first.volume(), solid.volume());
        assert_relative_eq!(solid.bounding_box().max.z, 1.0);
    }
}
