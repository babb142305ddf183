//! Straight extrusion of faces along +Z, composable end to end.

use tracing::{debug, info, instrument};

use crate::Tolerance;
use crate::error::{GeometryError, GeometryResult, require_positive};
use crate::geometry::Resolution;
use crate::geometry::face::{Face, FaceRings};
use crate::geometry::point::{Point2d, Point3d};
use crate::geometry::triangulate::triangulate;
use crate::geometry::wire::{point_in_polygon, polygons_touch};
use crate::topology::mesh::Solid;

/// One face swept over `[z0, z1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionSection {
    pub face: Face,
    pub z0: f64,
    pub z1: f64,
}

/// A stack of extruded sections sharing one outer boundary.
///
/// Sections are contiguous along Z. Holes that continue across a section
/// boundary become one wall; holes that start or stop at a boundary are
/// closed by an interface face, so the stack converts to a single sealed
/// solid without internal faces.
#[derive(Debug, Clone)]
pub struct Extrusion {
    sections: Vec<ExtrusionSection>,
    resolution: Resolution,
}

impl Extrusion {
    pub fn new(face: Face, z0: f64, length: f64) -> GeometryResult<Self> {
        if !z0.is_finite() {
            return Err(GeometryError::out_of_range("extrusion start", z0, "must be finite"));
        }
        require_positive("extrusion length", length)?;
        Ok(Self {
            sections: vec![ExtrusionSection {
                face,
                z0,
                z1: z0 + length,
            }],
            resolution: Resolution::default(),
        })
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn sections(&self) -> &[ExtrusionSection] {
        &self.sections
    }

    pub fn z_min(&self) -> f64 {
        self.sections[0].z0
    }

    pub fn z_max(&self) -> f64 {
        self.sections[self.sections.len() - 1].z1
    }

    /// Exact volume of the swept faces.
    pub fn volume(&self) -> f64 {
        self.sections.iter().map(|s| s.face.area() * (s.z1 - s.z0)).sum()
    }

    /// Append `other` on top of this extrusion.
    ///
    /// `other` must start at this extrusion's top and share its outer
    /// boundary. Every hole meeting the shared plane either continues exactly
    /// on the other side or stays clear of all holes there.
    #[instrument(skip_all, fields(z = self.z_max()))]
    pub fn concat(mut self, other: Extrusion) -> GeometryResult<Self> {
        let tol = crate::default_tolerance();
        let z = self.z_max();
        let mismatch = |reason: String| GeometryError::ProfileMismatch { z, reason };

        if (other.z_min() - z).abs() > tol.coincidence {
            return Err(mismatch(format!("next extrusion starts at z={}", other.z_min())));
        }
        let below = self.sections[self.sections.len() - 1].face.rings(&self.resolution, tol.coincidence)?;
        let above = other.sections[0].face.rings(&self.resolution, tol.coincidence)?;

        if !rings_match(&below.outer, &above.outer, tol.coincidence) {
            return Err(mismatch("outer boundaries differ".into()));
        }
        check_holes_compatible(&below.holes, &above.holes, "below", &tol).map_err(mismatch)?;
        check_holes_compatible(&above.holes, &below.holes, "above", &tol).map_err(mismatch)?;

        debug!(
            sections = self.sections.len() + other.sections.len(),
            "extrusions joined"
        );
        self.sections.extend(other.sections);
        Ok(self)
    }

    /// Build the sealed boundary mesh.
    #[instrument(skip(self), fields(sections = self.sections.len()))]
    pub fn to_solid(&self, label: &str) -> GeometryResult<Solid> {
        let tol = crate::default_tolerance().coincidence;
        let rings = self
            .sections
            .iter()
            .map(|s| s.face.rings(&self.resolution, tol))
            .collect::<GeometryResult<Vec<_>>>()?;
        let (z_min, z_max) = (self.z_min(), self.z_max());
        let last = rings.len() - 1;

        let mut polygons: Vec<Vec<Point3d>> = Vec::new();
        polygons.extend(cap_polygons(&rings[0], z_min, false, tol)?);
        polygons.extend(cap_polygons(&rings[last], z_max, true, tol)?);

        let outer = &rings[0].outer;
        for k in 0..outer.len() {
            let (a, b) = (outer[k], outer[(k + 1) % outer.len()]);
            polygons.push(vec![
                Point3d::from_2d(a, z_min),
                Point3d::from_2d(b, z_min),
                Point3d::from_2d(b, z_max),
                Point3d::from_2d(a, z_max),
            ]);
        }

        for track in track_holes(&rings, tol) {
            for (first, end) in track.runs() {
                let za = self.sections[first].z0;
                let zb = self.sections[end].z1;
                let hole = &track.ring;
                for k in 0..hole.len() {
                    let (a, b) = (hole[k], hole[(k + 1) % hole.len()]);
                    polygons.push(vec![
                        Point3d::from_2d(b, za),
                        Point3d::from_2d(a, za),
                        Point3d::from_2d(a, zb),
                        Point3d::from_2d(b, zb),
                    ]);
                }
                let plug = FaceRings {
                    outer: hole.clone(),
                    holes: Vec::new(),
                };
                // The cavity is above the plug at the start of a run and
                // below it at the end.
                if first > 0 {
                    polygons.extend(cap_polygons(&plug, za, true, tol)?);
                }
                if end < last {
                    polygons.extend(cap_polygons(&plug, zb, false, tol)?);
                }
            }
        }

        let solid = Solid::from_polygons(label, polygons, tol);
        info!(
            label,
            polygons = solid.polygons().len(),
            volume = solid.volume(),
            "extrusion converted to solid"
        );
        Ok(solid)
    }

    pub fn into_solid(self, label: &str) -> GeometryResult<Solid> {
        self.to_solid(label)
    }
}

/// A hole ring and the sections it cuts through.
struct HoleTrack {
    ring: Vec<Point2d>,
    present: Vec<bool>,
}

impl HoleTrack {
    /// Inclusive section index ranges where the hole is continuous.
    fn runs(&self) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut start = None;
        for (i, &p) in self.present.iter().enumerate() {
            match (p, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    runs.push((s, i - 1));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push((s, self.present.len() - 1));
        }
        runs
    }
}

fn track_holes(rings: &[FaceRings], tol: f64) -> Vec<HoleTrack> {
    let mut tracks: Vec<HoleTrack> = Vec::new();
    for (section, r) in rings.iter().enumerate() {
        for hole in &r.holes {
            let index = match tracks.iter().position(|t| rings_match(&t.ring, hole, tol)) {
                Some(i) => i,
                None => {
                    tracks.push(HoleTrack {
                        ring: hole.clone(),
                        present: vec![false; rings.len()],
                    });
                    tracks.len() - 1
                }
            };
            tracks[index].present[section] = true;
        }
    }
    tracks
}

fn rings_match(a: &[Point2d], b: &[Point2d], tol: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(p, q)| p.distance_to(q) <= tol)
}

fn rings_overlap(a: &[Point2d], b: &[Point2d], tol: f64) -> bool {
    polygons_touch(a, b, tol) || point_in_polygon(a[0], b) || point_in_polygon(b[0], a)
}

fn check_holes_compatible(
    holes: &[Vec<Point2d>],
    others: &[Vec<Point2d>],
    side: &str,
    tol: &Tolerance,
) -> Result<(), String> {
    for (i, hole) in holes.iter().enumerate() {
        if others.iter().any(|o| rings_match(hole, o, tol.coincidence)) {
            continue;
        }
        if let Some(j) = others.iter().position(|o| rings_overlap(hole, o, tol.coincidence)) {
            return Err(format!("hole {i} {side} partially overlaps hole {j} on the other side"));
        }
    }
    Ok(())
}

fn is_convex(ring: &[Point2d]) -> bool {
    let n = ring.len();
    (0..n).all(|i| {
        let (a, b, c) = (ring[i], ring[(i + 1) % n], ring[(i + 2) % n]);
        let (ab, bc) = (b - a, c - b);
        ab.cross(&bc) >= -1e-9 * ab.length() * bc.length()
    })
}

/// Planar polygons covering a face at height `z`, facing +Z when `up`.
fn cap_polygons(rings: &FaceRings, z: f64, up: bool, tol: f64) -> GeometryResult<Vec<Vec<Point3d>>> {
    let orient = |mut poly: Vec<Point3d>| {
        if !up {
            poly.reverse();
        }
        poly
    };
    if rings.holes.is_empty() && is_convex(&rings.outer) {
        let poly = rings.outer.iter().map(|&p| Point3d::from_2d(p, z)).collect();
        return Ok(vec![orient(poly)]);
    }
    let tri = triangulate(rings, tol)?;
    Ok(tri
        .triangles
        .iter()
        .map(|t| orient(t.iter().map(|&i| Point3d::from_2d(tri.points[i], z)).collect()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::curves::{Arc2d, CurveSegment, Line2d};
    use crate::geometry::wire::Wire;
    use crate::operations::offset::offset_wire;
    use crate::operations::profile::{ProfileDimensions, build_profile};
    use crate::validation::audit::audit_solid;
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    fn square(cx: f64, cy: f64, half: f64) -> Wire {
        let p = [
            Point2d::new(cx - half, cy - half),
            Point2d::new(cx + half, cy - half),
            Point2d::new(cx + half, cy + half),
            Point2d::new(cx - half, cy + half),
        ];
        Wire::new((0..4).map(|i| CurveSegment::Line(Line2d::new(p[i], p[(i + 1) % 4]))).collect())
    }

    fn circle(cx: f64, cy: f64, r: f64) -> Wire {
        Wire::new(vec![CurveSegment::Arc(Arc2d::new(Point2d::new(cx, cy), r, 0.0, TAU).unwrap())])
    }

    #[test]
    fn test_box_extrusion() {
        let face = Face::new(square(0.0, 0.0, 1.0)).unwrap();
        let solid = Extrusion::new(face, 0.0, 3.0).unwrap().into_solid("prism").unwrap();
        assert_relative_eq!(solid.volume(), 12.0, epsilon = 1e-9);
        assert!(audit_solid(&solid).is_manifold());
        assert_eq!(solid.polygons().len(), 6);
    }

    #[test]
    fn test_extrusion_with_hole() {
        let face = Face::with_holes(square(0.0, 0.0, 5.0), vec![square(0.0, 0.0, 2.0)]).unwrap();
        let solid = Extrusion::new(face, 1.0, 2.0).unwrap().into_solid("frame").unwrap();
        assert_relative_eq!(solid.volume(), (100.0 - 16.0) * 2.0, epsilon = 1e-9);
        assert!(audit_solid(&solid).is_manifold());
    }

    #[test]
    fn test_cap_shell_cap_is_sealed() {
        let outer = build_profile(&ProfileDimensions::NEMA).unwrap();
        let inner = offset_wire(&outer, 3.0).unwrap();
        let cap = Face::new(outer.clone()).unwrap();
        let shell = Face::with_holes(outer, vec![inner]).unwrap();
        let stack = Extrusion::new(cap.clone(), 0.0, 12.0)
            .unwrap()
            .concat(Extrusion::new(shell, 12.0, 193.0).unwrap())
            .unwrap()
            .concat(Extrusion::new(cap, 205.0, 12.0).unwrap())
            .unwrap();
        assert_relative_eq!(stack.z_max(), 217.0);
        let expected = stack.volume();
        let solid = stack.into_solid("body").unwrap();
        let audit = audit_solid(&solid);
        assert!(audit.is_manifold(), "{audit:?}");
        // Polygonal rings lose a little area against the exact arcs.
        assert!((solid.volume() - expected).abs() / expected < 1e-2);
    }

    #[test]
    fn test_continuing_hole_has_no_internal_faces() {
        let face = Face::with_holes(square(0.0, 0.0, 5.0), vec![circle(0.0, 0.0, 2.0)]).unwrap();
        let single = Extrusion::new(face.clone(), 0.0, 4.0).unwrap().into_solid("one").unwrap();
        let joined = Extrusion::new(face.clone(), 0.0, 2.0)
            .unwrap()
            .concat(Extrusion::new(face, 2.0, 2.0).unwrap())
            .unwrap()
            .into_solid("two")
            .unwrap();
        assert_eq!(single.polygons().len(), joined.polygons().len());
        assert_relative_eq!(single.volume(), joined.volume(), epsilon = 1e-9);
    }

    #[test]
    fn test_gap_between_extrusions_rejected() {
        let face = Face::new(square(0.0, 0.0, 1.0)).unwrap();
        let err = Extrusion::new(face.clone(), 0.0, 1.0)
            .unwrap()
            .concat(Extrusion::new(face, 1.5, 1.0).unwrap())
            .unwrap_err();
        assert!(matches!(err, GeometryError::ProfileMismatch { .. }));
    }

    #[test]
    fn test_different_outer_rejected() {
        let a = Face::new(square(0.0, 0.0, 1.0)).unwrap();
        let b = Face::new(square(0.0, 0.0, 2.0)).unwrap();
        let err = Extrusion::new(a, 0.0, 1.0)
            .unwrap()
            .concat(Extrusion::new(b, 1.0, 1.0).unwrap())
            .unwrap_err();
        assert!(matches!(err, GeometryError::ProfileMismatch { .. }));
    }

    #[test]
    fn test_partially_overlapping_holes_rejected() {
        let a = Face::with_holes(square(0.0, 0.0, 5.0), vec![square(0.0, 0.0, 1.0)]).unwrap();
        let b = Face::with_holes(square(0.0, 0.0, 5.0), vec![square(1.0, 0.0, 1.0)]).unwrap();
        let err = Extrusion::new(a, 0.0, 1.0)
            .unwrap()
            .concat(Extrusion::new(b, 1.0, 1.0).unwrap())
            .unwrap_err();
        assert!(matches!(err, GeometryError::ProfileMismatch { .. }));
    }

    #[test]
    fn test_disjoint_holes_get_interface_faces() {
        let a = Face::with_holes(square(0.0, 0.0, 5.0), vec![square(-2.5, 0.0, 1.0)]).unwrap();
        let b = Face::with_holes(square(0.0, 0.0, 5.0), vec![square(2.5, 0.0, 1.0)]).unwrap();
        let solid = Extrusion::new(a, 0.0, 1.0)
            .unwrap()
            .concat(Extrusion::new(b, 1.0, 1.0).unwrap())
            .unwrap()
            .into_solid("staggered")
            .unwrap();
        assert!(audit_solid(&solid).is_manifold());
        assert_relative_eq!(solid.volume(), 2.0 * (100.0 - 4.0), epsilon = 1e-9);
    }

    #[test]
    fn test_non_positive_length_rejected() {
        let face = Face::new(square(0.0, 0.0, 1.0)).unwrap();
        assert!(matches!(
            Extrusion::new(face, 0.0, 0.0),
            Err(GeometryError::ParameterOutOfRange { .. })
        ));
    }
}
