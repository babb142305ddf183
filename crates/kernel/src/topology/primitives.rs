use std::f64::consts::{PI, TAU};

use tracing::{info, instrument};

use super::mesh::Solid;
use crate::error::{GeometryResult, require_positive};
use crate::geometry::Resolution;
use crate::geometry::point::Point3d;

/// Axis-aligned box with opposite corners `min` and `max`.
#[instrument(skip(min, max))]
pub fn make_box(label: &str, min: Point3d, max: Point3d) -> GeometryResult<Solid> {
    require_positive("box width", max.x - min.x)?;
    require_positive("box depth", max.y - min.y)?;
    require_positive("box height", max.z - min.z)?;
    info!(min = ?[min.x, min.y, min.z], max = ?[max.x, max.y, max.z], "creating box primitive");

    let v = [
        Point3d::new(min.x, min.y, min.z),
        Point3d::new(max.x, min.y, min.z),
        Point3d::new(max.x, max.y, min.z),
        Point3d::new(min.x, max.y, min.z),
        Point3d::new(min.x, min.y, max.z),
        Point3d::new(max.x, min.y, max.z),
        Point3d::new(max.x, max.y, max.z),
        Point3d::new(min.x, max.y, max.z),
    ];
    // Outward winding per face.
    let faces: [[usize; 4]; 6] = [
        [0, 3, 2, 1], // -z
        [4, 5, 6, 7], // +z
        [0, 1, 5, 4], // -y
        [2, 3, 7, 6], // +y
        [0, 4, 7, 3], // -x
        [1, 2, 6, 5], // +x
    ];
    let polygons = faces.iter().map(|f| f.iter().map(|&i| v[i]).collect()).collect();
    Ok(Solid::from_polygons(label, polygons, crate::default_tolerance().coincidence))
}

/// Points of a regular polygon inscribed in a circle, counter-clockwise from +X.
pub fn circle_points(cx: f64, cy: f64, radius: f64, segments: usize) -> Vec<(f64, f64)> {
    (0..segments)
        .map(|k| {
            let a = TAU * k as f64 / segments as f64;
            (cx + radius * a.cos(), cy + radius * a.sin())
        })
        .collect()
}

/// Cylinder along +Z with its base circle centered at `(cx, cy, z0)`.
#[instrument(skip(resolution))]
pub fn make_cylinder(
    label: &str,
    cx: f64,
    cy: f64,
    z0: f64,
    radius: f64,
    height: f64,
    resolution: &Resolution,
) -> GeometryResult<Solid> {
    require_positive("cylinder radius", radius)?;
    require_positive("cylinder height", height)?;
    let n = resolution.circle_segments();
    let ring = circle_points(cx, cy, radius, n);
    let z1 = z0 + height;

    let mut polygons: Vec<Vec<Point3d>> = Vec::with_capacity(n + 2);
    polygons.push(ring.iter().rev().map(|&(x, y)| Point3d::new(x, y, z0)).collect());
    polygons.push(ring.iter().map(|&(x, y)| Point3d::new(x, y, z1)).collect());
    for k in 0..n {
        let (ax, ay) = ring[k];
        let (bx, by) = ring[(k + 1) % n];
        polygons.push(vec![
            Point3d::new(ax, ay, z0),
            Point3d::new(bx, by, z0),
            Point3d::new(bx, by, z1),
            Point3d::new(ax, ay, z1),
        ]);
    }
    info!(segments = n, "created cylinder primitive");
    Ok(Solid::from_polygons(label, polygons, crate::default_tolerance().coincidence))
}

/// UV sphere whose vertices all lie exactly on the sphere surface.
///
/// Pole caps are triangle fans; every other band is made of planar
/// isosceles trapezoids.
#[instrument(skip(resolution))]
pub fn make_sphere(label: &str, center: Point3d, radius: f64, resolution: &Resolution) -> GeometryResult<Solid> {
    require_positive("sphere radius", radius)?;
    let n_lon = resolution.circle_segments();
    let n_lat = resolution.segments_for(PI).max(4);

    let point = |lat: usize, lon: usize| {
        let phi = PI * lat as f64 / n_lat as f64;
        let theta = TAU * lon as f64 / n_lon as f64;
        Point3d::new(
            center.x + radius * phi.sin() * theta.cos(),
            center.y + radius * phi.sin() * theta.sin(),
            center.z + radius * phi.cos(),
        )
    };
    let north = Point3d::new(center.x, center.y, center.z + radius);
    let south = Point3d::new(center.x, center.y, center.z - radius);

    let mut polygons: Vec<Vec<Point3d>> = Vec::with_capacity(n_lon * n_lat);
    for k in 0..n_lon {
        let k1 = (k + 1) % n_lon;
        polygons.push(vec![north, point(1, k), point(1, k1)]);
        for lat in 1..n_lat - 1 {
            polygons.push(vec![point(lat, k), point(lat + 1, k), point(lat + 1, k1), point(lat, k1)]);
        }
        polygons.push(vec![south, point(n_lat - 1, k1), point(n_lat - 1, k)]);
    }
    info!(bands = n_lat, segments = n_lon, "created sphere primitive");
    Ok(Solid::from_polygons(label, polygons, crate::default_tolerance().coincidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;

    #[test]
    fn test_box_volume() {
        let b = make_box("box", Point3d::new(0.0, 0.0, 0.0), Point3d::new(2.0, 3.0, 4.0)).unwrap();
        assert!((b.volume() - 24.0).abs() < 1e-9);
        assert_eq!(b.vertices().len(), 8);
    }

    #[test]
    fn test_box_rejects_inverted_corners() {
        let r = make_box("bad", Point3d::new(1.0, 0.0, 0.0), Point3d::new(0.0, 1.0, 1.0));
        assert!(matches!(r, Err(GeometryError::ParameterOutOfRange { .. })));
    }

    #[test]
    fn test_cylinder_volume_matches_inscribed_prism() {
        let res = Resolution::from_degrees(10.0);
        let c = make_cylinder("cyl", 0.0, 35.0, 0.0, 5.0, 12.0, &res).unwrap();
        let n = res.circle_segments() as f64;
        let prism = 0.5 * n * 25.0 * (TAU / n).sin() * 12.0;
        assert!((c.volume() - prism).abs() < 1e-9);
        let bb = c.bounding_box();
        assert!((bb.max.z - 12.0).abs() < 1e-12);
        assert!((bb.max.x - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let center = Point3d::new(1.0, 2.0, 3.0);
        let s = make_sphere("sphere", center, 18.5, &Resolution::default()).unwrap();
        assert!(s.vertices().iter().all(|p| (p.distance_to(&center) - 18.5).abs() < 1e-9));
        let exact = 4.0 / 3.0 * PI * 18.5f64.powi(3);
        assert!(s.volume() > 0.95 * exact && s.volume() < exact);
    }

    #[test]
    fn test_sphere_rejects_zero_radius() {
        assert!(make_sphere("s", Point3d::ORIGIN, 0.0, &Resolution::default()).is_err());
    }
}
