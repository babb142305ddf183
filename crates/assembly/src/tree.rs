use std::sync::Arc;

use tracing::debug;

use phantom_kernel::Solid;

use crate::types::{Assembly, AssemblyError, Node};

/// A solid reached by a depth-first walk, with the labels leading to it.
#[derive(Debug, Clone)]
pub struct Leaf<'a> {
    /// Labels of the enclosing assemblies, outermost first, then the solid's.
    pub path: Vec<&'a str>,
    pub solid: &'a Arc<Solid>,
}

impl Leaf<'_> {
    pub fn path_string(&self) -> String {
        self.path.join("/")
    }

    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }
}

impl Assembly {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// A named composite of `children`, kept in the given order.
    pub fn group(label: impl Into<String>, children: impl IntoIterator<Item = Node>) -> Self {
        let mut assembly = Self::new(label);
        assembly.children.extend(children);
        debug!(label = %assembly.label, children = assembly.children.len(), "assembly grouped");
        assembly
    }

    /// Append a child at the end.
    pub fn add(&mut self, child: impl Into<Node>) -> &mut Self {
        self.children.push(child.into());
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Every solid below this assembly, depth first in insertion order.
    pub fn leaves(&self) -> Vec<Leaf<'_>> {
        let mut out = Vec::new();
        let mut stack: Vec<(Vec<&str>, &Node)> = self
            .children
            .iter()
            .rev()
            .map(|c| (vec![self.label.as_str()], c))
            .collect();
        while let Some((prefix, node)) = stack.pop() {
            match node {
                Node::Solid(solid) => {
                    let mut path = prefix;
                    path.push(solid.label());
                    out.push(Leaf { path, solid });
                }
                Node::Assembly(a) => {
                    for child in a.children.iter().rev() {
                        let mut path = prefix.clone();
                        path.push(a.label.as_str());
                        stack.push((path, child));
                    }
                }
            }
        }
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| match c {
                Node::Solid(_) => 1,
                Node::Assembly(a) => a.leaf_count(),
            })
            .sum()
    }

    /// First direct child with the given label.
    pub fn child(&self, label: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.label() == label)
    }

    /// Resolve a `/`-separated label path relative to this assembly.
    pub fn find(&self, path: &str) -> Result<&Node, AssemblyError> {
        let not_found = || AssemblyError::PathNotFound { path: path.to_string() };
        let mut parts = path.split('/');
        let first = parts.next().ok_or_else(not_found)?;
        let mut node = self.child(first).ok_or_else(not_found)?;
        for part in parts {
            node = match node {
                Node::Assembly(a) => a.child(part).ok_or_else(not_found)?,
                Node::Solid(_) => return Err(not_found()),
            };
        }
        Ok(node)
    }

    /// The solid at a label path.
    pub fn find_solid(&self, path: &str) -> Result<&Arc<Solid>, AssemblyError> {
        match self.find(path)? {
            Node::Solid(s) => Ok(s),
            Node::Assembly(_) => Err(AssemblyError::PathNotFound { path: path.to_string() }),
        }
    }

    /// Reject empty groups and solids without a boundary.
    pub fn validate(&self) -> Result<(), AssemblyError> {
        if self.is_empty() {
            return Err(AssemblyError::EmptyAssembly {
                label: self.label.clone(),
            });
        }
        for child in &self.children {
            if let Node::Assembly(a) = child {
                a.validate()?;
            }
        }
        if let Some(leaf) = self.leaves().into_iter().find(|l| l.solid.is_empty()) {
            return Err(AssemblyError::EmptySolid {
                path: leaf.path_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phantom_kernel::geometry::point::Point3d;
    use phantom_kernel::topology::primitives::make_box;

    fn part(label: &str) -> Solid {
        make_box(label, Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)).unwrap()
    }

    fn sample() -> Assembly {
        let inner = Assembly::group("Spheres", [part("Sphere 1").into(), part("Sphere 2").into()]);
        Assembly::group("Phantom", [part("Body").into(), inner.into(), part("Screws").into()])
    }

    #[test]
    fn test_leaves_depth_first_in_order() {
        let tree = sample();
        let paths: Vec<String> = tree.leaves().iter().map(|l| l.path_string()).collect();
        assert_eq!(
            paths,
            vec![
                "Phantom/Body",
                "Phantom/Spheres/Sphere 1",
                "Phantom/Spheres/Sphere 2",
                "Phantom/Screws"
            ]
        );
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.leaves()[1].depth(), 2);
    }

    #[test]
    fn test_find_by_path() {
        let tree = sample();
        assert_eq!(tree.find_solid("Spheres/Sphere 2").unwrap().label(), "Sphere 2");
        assert!(matches!(tree.find("Spheres/Missing"), Err(AssemblyError::PathNotFound { .. })));
        assert!(tree.find_solid("Spheres").is_err());
    }

    #[test]
    fn test_shared_solids_are_not_copied() {
        let shared = Arc::new(part("Shared"));
        let a = Assembly::group("A", [Node::from(Arc::clone(&shared))]);
        let b = Assembly::group("B", [Node::from(Arc::clone(&shared)), a.into()]);
        assert_eq!(Arc::strong_count(&shared), 3);
        let leaves = b.leaves();
        assert!(Arc::ptr_eq(leaves[0].solid, leaves[1].solid));
    }

    #[test]
    fn test_validate_rejects_empty_group_and_solid() {
        let mut tree = sample();
        assert!(tree.validate().is_ok());
        tree.add(Assembly::new("Nothing"));
        assert!(matches!(tree.validate(), Err(AssemblyError::EmptyAssembly { .. })));
        let hollow = Assembly::group("H", [Solid::empty("Void").into()]);
        assert!(matches!(hollow.validate(), Err(AssemblyError::EmptySolid { .. })));
    }
}
