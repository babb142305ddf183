//! Labeled hierarchy of finished solids.

pub mod summary;
pub mod tree;
pub mod types;

pub use summary::{AssemblySummary, LeafSummary, NodeSummary};
pub use tree::Leaf;
pub use types::{Assembly, AssemblyError, Node};
