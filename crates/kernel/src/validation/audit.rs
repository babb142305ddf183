use std::collections::HashMap;

use tracing::{info, instrument};

use crate::topology::mesh::Solid;

/// Directed-edge audit of a polygon boundary.
///
/// A closed, consistently oriented 2-manifold uses every directed edge
/// `(a, b)` exactly once and its reverse `(b, a)` exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyAudit {
    pub vertices: usize,
    /// Undirected edge count.
    pub edges: usize,
    pub polygons: usize,
    /// Directed edges whose reverse is missing.
    pub free_edges: usize,
    /// Directed edges used more than once.
    pub over_shared_edges: usize,
    /// Polygons that repeat a vertex.
    pub repeated_vertex_polygons: usize,
    pub euler_characteristic: i64,
}

impl TopologyAudit {
    pub fn is_manifold(&self) -> bool {
        self.polygons > 0 && self.free_edges == 0 && self.over_shared_edges == 0 && self.repeated_vertex_polygons == 0
    }

    /// Closed manifolds have an even Euler characteristic (2 - 2g per shell).
    pub fn euler_consistent(&self) -> bool {
        self.euler_characteristic % 2 == 0
    }
}

/// Audit edge usage of a solid's boundary.
#[instrument(skip_all, fields(label = solid.label()))]
pub fn audit_solid(solid: &Solid) -> TopologyAudit {
    let mut directed: HashMap<(usize, usize), usize> = HashMap::new();
    let mut repeated_vertex_polygons = 0;
    for poly in solid.polygons() {
        let n = poly.len();
        let mut seen = poly.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != n {
            repeated_vertex_polygons += 1;
        }
        for k in 0..n {
            *directed.entry((poly[k], poly[(k + 1) % n])).or_insert(0) += 1;
        }
    }

    let mut free_edges = 0;
    let mut over_shared_edges = 0;
    let mut undirected = 0;
    for (&(a, b), &count) in &directed {
        if count > 1 {
            over_shared_edges += 1;
        }
        match directed.get(&(b, a)) {
            None => {
                free_edges += 1;
                undirected += 2;
            }
            Some(_) => undirected += 1,
        }
    }
    let edges = undirected / 2;

    let vertices = solid.vertices().len();
    let polygons = solid.polygons().len();
    let audit = TopologyAudit {
        vertices,
        edges,
        polygons,
        free_edges,
        over_shared_edges,
        repeated_vertex_polygons,
        euler_characteristic: vertices as i64 - edges as i64 + polygons as i64,
    };
    info!(
        manifold = audit.is_manifold(),
        free_edges = audit.free_edges,
        over_shared_edges = audit.over_shared_edges,
        euler = audit.euler_characteristic,
        "edge audit complete"
    );
    audit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Resolution;
    use crate::geometry::point::Point3d;
    use crate::topology::primitives::{make_box, make_cylinder, make_sphere};

    #[test]
    fn test_box_passes_audit() {
        let solid = make_box("box", Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)).unwrap();
        let audit = audit_solid(&solid);
        assert!(audit.is_manifold());
        assert_eq!(audit.vertices, 8);
        assert_eq!(audit.edges, 12);
        assert_eq!(audit.polygons, 6);
        assert_eq!(audit.euler_characteristic, 2);
    }

    #[test]
    fn test_cylinder_and_sphere_pass_audit() {
        let res = Resolution::from_degrees(20.0);
        let cyl = make_cylinder("cyl", 0.0, 0.0, 0.0, 1.0, 2.0, &res).unwrap();
        let sphere = make_sphere("sphere", Point3d::ORIGIN, 1.0, &res).unwrap();
        for solid in [cyl, sphere] {
            let audit = audit_solid(&solid);
            assert!(audit.is_manifold(), "{}: {audit:?}", solid.label());
            assert_eq!(audit.euler_characteristic, 2);
        }
    }

    #[test]
    fn test_missing_face_detected() {
        let solid = make_box("box", Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)).unwrap();
        let mut loops = solid.polygon_loops();
        loops.pop();
        let open = Solid::from_polygons("open", loops, 1e-9);
        let audit = audit_solid(&open);
        assert!(!audit.is_manifold());
        assert_eq!(audit.free_edges, 4);
    }

    #[test]
    fn test_duplicated_face_detected() {
        let solid = make_box("box", Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)).unwrap();
        let mut loops = solid.polygon_loops();
        loops.push(loops[0].clone());
        let doubled = Solid::from_polygons("doubled", loops, 1e-9);
        let audit = audit_solid(&doubled);
        assert_eq!(audit.over_shared_edges, 4);
        assert!(!audit.is_manifold());
    }
}
