use serde::{Deserialize, Serialize};

use super::point::Point2d;
use super::wire::{Wire, find_self_intersection, point_in_polygon, polygon_signed_area, polygons_touch};
use super::Resolution;
use crate::error::{GeometryError, GeometryResult};

/// A planar region bounded by an outer wire, minus zero or more holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    outer: Wire,
    holes: Vec<Wire>,
}

/// Polyline rings of a face, all counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRings {
    pub outer: Vec<Point2d>,
    pub holes: Vec<Vec<Point2d>>,
}

impl Face {
    /// A face without holes.
    pub fn new(outer: Wire) -> GeometryResult<Self> {
        Self::with_holes(outer, Vec::new())
    }

    /// A face whose holes lie strictly inside the outer wire and apart from each other.
    pub fn with_holes(outer: Wire, holes: Vec<Wire>) -> GeometryResult<Self> {
        let tol = crate::default_tolerance().coincidence;
        let face = Self { outer, holes };
        let rings = face.rings(&Resolution::default(), tol)?;

        if find_self_intersection(&rings.outer, tol).is_some() {
            return Err(GeometryError::inconsistency("face boundary self-intersects"));
        }
        for (i, hole) in rings.holes.iter().enumerate() {
            if find_self_intersection(hole, tol).is_some() {
                return Err(GeometryError::inconsistency(format!("hole {i} self-intersects")));
            }
            if polygons_touch(hole, &rings.outer, tol) || !point_in_polygon(hole[0], &rings.outer) {
                return Err(GeometryError::inconsistency(format!(
                    "hole {i} is not strictly inside the outer boundary"
                )));
            }
            for (j, other) in rings.holes.iter().enumerate().skip(i + 1) {
                if polygons_touch(hole, other, tol)
                    || point_in_polygon(hole[0], other)
                    || point_in_polygon(other[0], hole)
                {
                    return Err(GeometryError::inconsistency(format!("holes {i} and {j} overlap")));
                }
            }
        }
        Ok(face)
    }

    pub fn outer(&self) -> &Wire {
        &self.outer
    }

    pub fn holes(&self) -> &[Wire] {
        &self.holes
    }

    pub fn area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(|h| h.area()).sum::<f64>()
    }

    /// The outer region only, dropping every hole.
    pub fn filled(&self) -> Face {
        Face {
            outer: self.outer.clone(),
            holes: Vec::new(),
        }
    }

    /// Discretize every boundary into a counter-clockwise ring.
    pub fn rings(&self, resolution: &Resolution, tol: f64) -> GeometryResult<FaceRings> {
        let outer = ccw_ring(&self.outer, resolution, tol)?;
        let holes = self
            .holes
            .iter()
            .map(|h| ccw_ring(h, resolution, tol))
            .collect::<GeometryResult<Vec<_>>>()?;
        Ok(FaceRings { outer, holes })
    }
}

fn ccw_ring(wire: &Wire, resolution: &Resolution, tol: f64) -> GeometryResult<Vec<Point2d>> {
    if !wire.is_closed(tol) {
        return Err(GeometryError::inconsistency("face boundary wire is not closed"));
    }
    let mut ring = wire.discretize(resolution, tol);
    if ring.len() < 3 {
        return Err(GeometryError::inconsistency("face boundary encloses no area"));
    }
    if polygon_signed_area(&ring) < 0.0 {
        ring.reverse();
    }
    Ok(ring)
}
