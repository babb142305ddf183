//! Planes and convex polygons for BSP classification.

use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;
use crate::topology::mesh::polygon_normal;

/// Oriented plane `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub w: f64,
}

impl Plane {
    /// Plane of a planar polygon, oriented by its winding. `None` when the
    /// polygon has no area.
    pub fn from_polygon(points: &[Point3d]) -> Option<Self> {
        let normal = polygon_normal(points).normalized()?;
        let n = points.len() as f64;
        let centroid = points.iter().fold(Vec3::ZERO, |acc, p| acc + p.to_vec3()) / n;
        Some(Self {
            normal,
            w: normal.dot(&centroid),
        })
    }

    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            w: -self.w,
        }
    }

    pub fn signed_distance(&self, p: &Point3d) -> f64 {
        self.normal.dot(&p.to_vec3()) - self.w
    }
}

/// A convex planar polygon tagged with the operand polygon it came from.
#[derive(Debug, Clone)]
pub struct Polygon {
    pub vertices: Vec<Point3d>,
    pub plane: Plane,
    /// Index of the originating polygon across both operands.
    pub source: usize,
    /// Whether the winding is reversed relative to the source.
    pub flipped: bool,
}

impl Polygon {
    pub fn new(vertices: Vec<Point3d>, source: usize) -> Option<Self> {
        let plane = Plane::from_polygon(&vertices)?;
        Some(Self {
            vertices,
            plane,
            source,
            flipped: false,
        })
    }

    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane = self.plane.flipped();
        self.flipped = !self.flipped;
    }

    pub fn area(&self) -> f64 {
        polygon_normal(&self.vertices).length() * 0.5
    }

    fn fragment(&self, vertices: Vec<Point3d>) -> Self {
        Self {
            vertices,
            plane: self.plane,
            source: self.source,
            flipped: self.flipped,
        }
    }
}

/// Output buckets of a polygon split.
#[derive(Debug, Default)]
pub struct SplitBuckets {
    pub coplanar_front: Vec<Polygon>,
    pub coplanar_back: Vec<Polygon>,
    pub front: Vec<Polygon>,
    pub back: Vec<Polygon>,
}

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// Classify `polygon` against `plane`, cutting it in two when it spans the
/// plane. Coplanar polygons are sorted by whether their normal agrees with
/// the plane's.
pub fn split_polygon(plane: &Plane, polygon: Polygon, eps: f64, out: &mut SplitBuckets) {
    let types: Vec<u8> = polygon
        .vertices
        .iter()
        .map(|v| {
            let t = plane.signed_distance(v);
            if t < -eps {
                BACK
            } else if t > eps {
                FRONT
            } else {
                COPLANAR
            }
        })
        .collect();
    let polygon_type = types.iter().fold(COPLANAR, |acc, t| acc | t);

    match polygon_type {
        COPLANAR => {
            if plane.normal.dot(&polygon.plane.normal) > 0.0 {
                out.coplanar_front.push(polygon);
            } else {
                out.coplanar_back.push(polygon);
            }
        }
        FRONT => out.front.push(polygon),
        BACK => out.back.push(polygon),
        _ => {
            let n = polygon.vertices.len();
            let mut f = Vec::with_capacity(n + 1);
            let mut b = Vec::with_capacity(n + 1);
            for i in 0..n {
                let j = (i + 1) % n;
                let (ti, tj) = (types[i], types[j]);
                let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);
                if ti != BACK {
                    f.push(vi);
                }
                if ti != FRONT {
                    b.push(vi);
                }
                if ti | tj == SPANNING {
                    let t = (plane.w - plane.normal.dot(&vi.to_vec3())) / plane.normal.dot(&(vj - vi));
                    let v = vi.lerp(&vj, t);
                    f.push(v);
                    b.push(v);
                }
            }
            if f.len() >= 3 {
                out.front.push(polygon.fragment(f));
            }
            if b.len() >= 3 {
                out.back.push(polygon.fragment(b));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: f64) -> Polygon {
        Polygon::new(
            vec![
                Point3d::new(0.0, 0.0, z),
                Point3d::new(2.0, 0.0, z),
                Point3d::new(2.0, 2.0, z),
                Point3d::new(0.0, 2.0, z),
            ],
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_plane_from_ccw_square_points_up() {
        let p = square(3.0).plane;
        assert!((p.normal.z - 1.0).abs() < 1e-12);
        assert!((p.w - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_spanning_polygon_is_cut() {
        let plane = Plane {
            normal: Vec3::new(1.0, 0.0, 0.0),
            w: 0.5,
        };
        let mut out = SplitBuckets::default();
        split_polygon(&plane, square(0.0), 1e-9, &mut out);
        assert_eq!(out.front.len(), 1);
        assert_eq!(out.back.len(), 1);
        assert!((out.front[0].area() - 3.0).abs() < 1e-12);
        assert!((out.back[0].area() - 1.0).abs() < 1e-12);
        assert_eq!(out.front[0].source, 0);
    }

    #[test]
    fn test_coplanar_sorted_by_normal() {
        let plane = square(1.0).plane;
        let mut out = SplitBuckets::default();
        split_polygon(&plane, square(1.0), 1e-9, &mut out);
        let mut flipped = square(1.0);
        flipped.flip();
        split_polygon(&plane, flipped, 1e-9, &mut out);
        assert_eq!(out.coplanar_front.len(), 1);
        assert_eq!(out.coplanar_back.len(), 1);
        assert!(out.coplanar_back[0].flipped);
    }

    #[test]
    fn test_degenerate_polygon_has_no_plane() {
        let line = vec![Point3d::ORIGIN, Point3d::new(1.0, 0.0, 0.0), Point3d::new(2.0, 0.0, 0.0)];
        assert!(Polygon::new(line, 0).is_none());
    }
}
