//! Binary space partition over the boundary planes of a solid.
//!
//! Nodes live in a slotmap arena and every traversal is an explicit
//! worklist, so deep trees (convex solids produce a chain) never recurse.

use slotmap::{SlotMap, new_key_type};

use super::split::{Plane, Polygon, SplitBuckets, split_polygon};

new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Clone)]
struct Node {
    plane: Plane,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

/// Classification tree of one solid. Space behind every leaf plane is the
/// solid's interior.
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: SlotMap<NodeId, Node>,
    root: Option<NodeId>,
}

enum Side {
    Front,
    Back,
}

impl BspTree {
    /// Build from the boundary polygons of a closed solid.
    pub fn build(polygons: Vec<Polygon>, eps: f64) -> Self {
        let mut nodes: SlotMap<NodeId, Node> = SlotMap::with_key();
        let mut root = None;
        let mut work: Vec<(Option<(NodeId, Side)>, Vec<Polygon>)> = vec![(None, polygons)];

        while let Some((parent, polys)) = work.pop() {
            let Some(first) = polys.first() else {
                continue;
            };
            let plane = first.plane;
            let id = nodes.insert(Node {
                plane,
                front: None,
                back: None,
            });
            match parent {
                None => root = Some(id),
                Some((p, Side::Front)) => nodes[p].front = Some(id),
                Some((p, Side::Back)) => nodes[p].back = Some(id),
            }

            let mut buckets = SplitBuckets::default();
            for poly in polys {
                split_polygon(&plane, poly, eps, &mut buckets);
            }
            if !buckets.front.is_empty() {
                work.push((Some((id, Side::Front)), buckets.front));
            }
            if !buckets.back.is_empty() {
                work.push((Some((id, Side::Back)), buckets.back));
            }
        }

        Self { nodes, root }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The tree of the complement: every plane flipped, children swapped.
    pub fn inverted(&self) -> Self {
        let mut tree = self.clone();
        for node in tree.nodes.values_mut() {
            node.plane = node.plane.flipped();
            std::mem::swap(&mut node.front, &mut node.back);
        }
        tree
    }

    /// Remove the parts of `polygons` inside this tree's solid.
    pub fn clip(&self, polygons: Vec<Polygon>, eps: f64) -> Vec<Polygon> {
        let Some(root) = self.root else {
            return polygons;
        };
        let mut kept = Vec::with_capacity(polygons.len());
        let mut work = vec![(root, polygons)];

        while let Some((id, polys)) = work.pop() {
            let node = &self.nodes[id];
            let mut buckets = SplitBuckets::default();
            for poly in polys {
                split_polygon(&node.plane, poly, eps, &mut buckets);
            }
            let mut front = buckets.front;
            front.append(&mut buckets.coplanar_front);
            let mut back = buckets.back;
            back.append(&mut buckets.coplanar_back);

            match node.front {
                Some(child) if !front.is_empty() => work.push((child, front)),
                Some(_) => {}
                None => kept.append(&mut front),
            }
            if let Some(child) = node.back {
                if !back.is_empty() {
                    work.push((child, back));
                }
            }
        }
        kept
    }
}

/// Flip every polygon in place.
pub fn flip_all(polygons: &mut [Polygon]) {
    for p in polygons {
        p.flip();
    }
}
