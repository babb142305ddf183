use std::sync::Arc;

use phantom_kernel::Solid;

/// An ordered, labeled group of solids and nested assemblies.
///
/// Grouping has no geometric effect. Solids are shared, never copied, so the
/// same part can appear in several assemblies.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// User-visible name.
    pub label: String,
    /// Children in insertion order.
    pub children: Vec<Node>,
}

/// One entry of an assembly.
#[derive(Debug, Clone)]
pub enum Node {
    Solid(Arc<Solid>),
    Assembly(Assembly),
}

impl Node {
    pub fn label(&self) -> &str {
        match self {
            Node::Solid(s) => s.label(),
            Node::Assembly(a) => &a.label,
        }
    }
}

impl From<Solid> for Node {
    fn from(solid: Solid) -> Self {
        Node::Solid(Arc::new(solid))
    }
}

impl From<Arc<Solid>> for Node {
    fn from(solid: Arc<Solid>) -> Self {
        Node::Solid(solid)
    }
}

impl From<Assembly> for Node {
    fn from(assembly: Assembly) -> Self {
        Node::Assembly(assembly)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssemblyError {
    #[error("no node at path '{path}'")]
    PathNotFound { path: String },

    #[error("assembly '{label}' has no children")]
    EmptyAssembly { label: String },

    #[error("solid '{path}' has no boundary")]
    EmptySolid { path: String },
}
