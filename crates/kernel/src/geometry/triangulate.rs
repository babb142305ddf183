//! Cap triangulation for planar faces with holes, on top of `earcutr`.
//!
//! Triangles only ever index existing ring vertices, so a cap shares every
//! boundary edge with the side walls extruded from the same rings.

use super::face::FaceRings;
use super::point::Point2d;
use super::wire::polygon_signed_area;
use crate::error::{GeometryError, GeometryResult};

/// A triangulated planar face. `points` holds the outer ring followed by every
/// hole ring in order; triangles index into it and are counter-clockwise.
#[derive(Debug, Clone)]
pub struct Triangulation {
    pub points: Vec<Point2d>,
    pub triangles: Vec<[usize; 3]>,
}

impl Triangulation {
    /// Sum of the triangle areas.
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| orient(self.points[t[0]], self.points[t[1]], self.points[t[2]]) * 0.5)
            .sum()
    }
}

fn orient(a: Point2d, b: Point2d, c: Point2d) -> f64 {
    (b - a).cross(&(c - a))
}

/// Triangulate `rings`, failing when the triangles do not cover the face
/// area to within `tol` per unit of boundary length.
pub fn triangulate(rings: &FaceRings, tol: f64) -> GeometryResult<Triangulation> {
    let mut points = rings.outer.clone();
    let mut hole_starts = Vec::with_capacity(rings.holes.len());
    for hole in &rings.holes {
        hole_starts.push(points.len());
        points.extend_from_slice(hole);
    }
    let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();

    let indices = earcutr::earcut(&flat, &hole_starts, 2)
        .map_err(|e| GeometryError::inconsistency(format!("face triangulation failed: {e:?}")))?;
    let triangles: Vec<[usize; 3]> = indices
        .chunks_exact(3)
        .map(|t| {
            if orient(points[t[0]], points[t[1]], points[t[2]]) < 0.0 {
                [t[0], t[2], t[1]]
            } else {
                [t[0], t[1], t[2]]
            }
        })
        .collect();
    let tri = Triangulation { points, triangles };

    let expected = polygon_signed_area(&rings.outer).abs()
        - rings.holes.iter().map(|h| polygon_signed_area(h).abs()).sum::<f64>();
    let perimeter: f64 = std::iter::once(&rings.outer)
        .chain(&rings.holes)
        .map(|ring| ring.iter().zip(ring.iter().cycle().skip(1)).map(|(a, b)| a.distance_to(b)).sum::<f64>())
        .sum();
    let covered = tri.area();
    if (covered - expected).abs() > tol * perimeter {
        return Err(GeometryError::inconsistency(format!(
            "face triangulation covers {covered:.6} of {expected:.6}"
        )));
    }
    Ok(tri)
}
