//! Polygonal boundary representation of solids.
//!
//! A [`Solid`] is an indexed set of planar, outward-facing polygons. Vertices
//! shared between polygons are welded so that a closed manifold boundary pairs
//! every directed edge with exactly one opposite edge.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point3d;
use crate::geometry::transform::{BoundingBox, Transform};
use crate::geometry::vector::Vec3;

/// Opaque material identifier attached to finished solids. The kernel never
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialTag(String);

impl MaterialTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labeled solid bounded by planar polygons.
#[derive(Debug, Clone)]
pub struct Solid {
    label: String,
    material: Option<MaterialTag>,
    vertices: Vec<Point3d>,
    polygons: Vec<Vec<usize>>,
}

impl Solid {
    /// A solid with no boundary and zero volume.
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            material: None,
            vertices: Vec::new(),
            polygons: Vec::new(),
        }
    }

    /// Build a solid from loose polygons: coincident vertices are welded,
    /// degenerate polygons dropped, and T-junctions split.
    pub fn from_polygons(label: impl Into<String>, polygons: Vec<Vec<Point3d>>, tol: f64) -> Self {
        let (vertices, indexed) = weld(&polygons, tol);
        let mut indexed = drop_degenerate(&vertices, indexed, tol);
        repair_t_junctions(&vertices, &mut indexed, tol);
        let mut solid = Self {
            label: label.into(),
            material: None,
            vertices,
            polygons: indexed,
        };
        solid.compact();
        solid
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn material(&self) -> Option<&MaterialTag> {
        self.material.as_ref()
    }

    pub fn with_material(mut self, material: MaterialTag) -> Self {
        self.material = Some(material);
        self
    }

    pub fn vertices(&self) -> &[Point3d] {
        &self.vertices
    }

    pub fn polygons(&self) -> &[Vec<usize>] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Vertex positions of one polygon.
    pub fn polygon_points(&self, index: usize) -> Vec<Point3d> {
        self.polygons[index].iter().map(|&i| self.vertices[i]).collect()
    }

    /// Every polygon as a list of positions.
    pub fn polygon_loops(&self) -> Vec<Vec<Point3d>> {
        (0..self.polygons.len()).map(|i| self.polygon_points(i)).collect()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.polygons.iter().flatten().map(|&i| &self.vertices[i]))
    }

    /// Enclosed volume by the divergence theorem. Negative when the boundary
    /// faces inward.
    pub fn volume(&self) -> f64 {
        self.polygons
            .iter()
            .map(|poly| {
                let p0 = self.vertices[poly[0]].to_vec3();
                poly.windows(2)
                    .skip(1)
                    .map(|w| {
                        let a = self.vertices[w[0]].to_vec3();
                        let b = self.vertices[w[1]].to_vec3();
                        p0.dot(&a.cross(&b))
                    })
                    .sum::<f64>()
            })
            .sum::<f64>()
            / 6.0
    }

    pub fn surface_area(&self) -> f64 {
        self.polygons
            .iter()
            .map(|poly| {
                let pts: Vec<Point3d> = poly.iter().map(|&i| self.vertices[i]).collect();
                polygon_normal(&pts).length() * 0.5
            })
            .sum()
    }

    /// A transformed copy. Mirroring transforms flip polygon winding so the
    /// boundary keeps facing outward.
    pub fn transformed(&self, transform: &Transform) -> Solid {
        let vertices = self.vertices.iter().map(|p| transform.transform_point(p)).collect();
        let polygons = if transform.is_mirroring() {
            self.polygons.iter().map(|p| p.iter().rev().copied().collect()).collect()
        } else {
            self.polygons.clone()
        };
        Solid {
            label: self.label.clone(),
            material: self.material.clone(),
            vertices,
            polygons,
        }
    }

    /// Combine with a solid whose boundary does not touch this one.
    pub fn merged_with(mut self, other: &Solid) -> Solid {
        let base = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.polygons
            .extend(other.polygons.iter().map(|p| p.iter().map(|&i| i + base).collect()));
        self
    }

    /// Drop vertices no polygon references.
    fn compact(&mut self) {
        let mut remap = vec![usize::MAX; self.vertices.len()];
        let mut vertices = Vec::new();
        for poly in &mut self.polygons {
            for idx in poly.iter_mut() {
                if remap[*idx] == usize::MAX {
                    remap[*idx] = vertices.len();
                    vertices.push(self.vertices[*idx]);
                }
                *idx = remap[*idx];
            }
        }
        self.vertices = vertices;
    }
}

/// Newell normal of a polygon; its length is twice the polygon area.
pub fn polygon_normal(points: &[Point3d]) -> Vec3 {
    let n = points.len();
    let mut normal = Vec3::ZERO;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

type CellKey = (i64, i64, i64);

/// Spatial hash that merges points closer than `tol`.
struct WeldGrid {
    cell: f64,
    tol: f64,
    cells: HashMap<CellKey, Vec<usize>>,
    points: Vec<Point3d>,
}

impl WeldGrid {
    fn new(tol: f64) -> Self {
        Self {
            cell: tol * 2.0,
            tol,
            cells: HashMap::new(),
            points: Vec::new(),
        }
    }

    fn key(&self, p: &Point3d) -> CellKey {
        (
            (p.x / self.cell).floor() as i64,
            (p.y / self.cell).floor() as i64,
            (p.z / self.cell).floor() as i64,
        )
    }

    fn insert(&mut self, p: Point3d) -> usize {
        let (kx, ky, kz) = self.key(&p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(bucket) = self.cells.get(&(kx + dx, ky + dy, kz + dz)) {
                        if let Some(&found) = bucket.iter().find(|&&i| self.points[i].distance_to(&p) <= self.tol) {
                            return found;
                        }
                    }
                }
            }
        }
        let idx = self.points.len();
        self.points.push(p);
        self.cells.entry((kx, ky, kz)).or_default().push(idx);
        idx
    }
}

fn weld(polygons: &[Vec<Point3d>], tol: f64) -> (Vec<Point3d>, Vec<Vec<usize>>) {
    let mut grid = WeldGrid::new(tol);
    let indexed = polygons
        .iter()
        .map(|poly| {
            let mut out: Vec<usize> = Vec::with_capacity(poly.len());
            for p in poly {
                let idx = grid.insert(*p);
                if out.last() != Some(&idx) {
                    out.push(idx);
                }
            }
            while out.len() > 1 && out.first() == out.last() {
                out.pop();
            }
            out
        })
        .collect();
    (grid.points, indexed)
}

fn drop_degenerate(vertices: &[Point3d], polygons: Vec<Vec<usize>>, tol: f64) -> Vec<Vec<usize>> {
    polygons
        .into_iter()
        .filter(|poly| {
            if poly.len() < 3 {
                return false;
            }
            let pts: Vec<Point3d> = poly.iter().map(|&i| vertices[i]).collect();
            polygon_normal(&pts).length() * 0.5 > tol * tol
        })
        .collect()
}

/// Insert vertices that lie on the interior of unmatched edges so that
/// neighbouring polygons share complete edges.
fn repair_t_junctions(vertices: &[Point3d], polygons: &mut [Vec<usize>], tol: f64) {
    for _ in 0..4 {
        let mut directed: HashMap<(usize, usize), usize> = HashMap::new();
        for poly in polygons.iter() {
            for k in 0..poly.len() {
                *directed.entry((poly[k], poly[(k + 1) % poly.len()])).or_insert(0) += 1;
            }
        }

        let mut open_edges: Vec<(usize, usize)> = Vec::new();
        let mut candidates: Vec<usize> = Vec::new();
        for (pi, poly) in polygons.iter().enumerate() {
            for k in 0..poly.len() {
                let (a, b) = (poly[k], poly[(k + 1) % poly.len()]);
                if !directed.contains_key(&(b, a)) {
                    open_edges.push((pi, k));
                    candidates.push(a);
                    candidates.push(b);
                }
            }
        }
        if open_edges.is_empty() {
            return;
        }
        candidates.sort_unstable();
        candidates.dedup();

        let mut inserts: HashMap<(usize, usize), Vec<(f64, usize)>> = HashMap::new();
        for &(pi, k) in &open_edges {
            let poly = &polygons[pi];
            let (a, b) = (poly[k], poly[(k + 1) % poly.len()]);
            let (pa, pb) = (vertices[a], vertices[b]);
            let ab = pb - pa;
            let len2 = ab.dot(&ab);
            if len2 <= tol * tol {
                continue;
            }
            for &v in &candidates {
                if v == a || v == b {
                    continue;
                }
                let pv = vertices[v];
                let t = (pv - pa).dot(&ab) / len2;
                if t <= 0.0 || t >= 1.0 {
                    continue;
                }
                let foot = pa + ab * t;
                if foot.distance_to(&pv) <= tol && pv.distance_to(&pa) > tol && pv.distance_to(&pb) > tol {
                    inserts.entry((pi, k)).or_default().push((t, v));
                }
            }
        }
        if inserts.is_empty() {
            return;
        }

        let mut touched: Vec<usize> = inserts.keys().map(|&(pi, _)| pi).collect();
        touched.sort_unstable();
        touched.dedup();
        for pi in touched {
            let old = std::mem::take(&mut polygons[pi]);
            let mut rebuilt = Vec::with_capacity(old.len() + 2);
            for k in 0..old.len() {
                rebuilt.push(old[k]);
                if let Some(list) = inserts.get_mut(&(pi, k)) {
                    list.sort_by(|x, y| x.0.total_cmp(&y.0));
                    rebuilt.extend(list.iter().map(|&(_, v)| v));
                }
            }
            polygons[pi] = rebuilt;
        }
    }
}
