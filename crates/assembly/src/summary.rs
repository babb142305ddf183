//! Serializable overview of an assembly tree, for reports and the CLI.

use std::fmt;

use serde::Serialize;

use phantom_kernel::validation::audit::audit_solid;
use phantom_kernel::Solid;

use crate::types::{Assembly, Node};

#[derive(Debug, Clone, Serialize)]
pub struct LeafSummary {
    pub label: String,
    pub material: Option<String>,
    pub volume: f64,
    pub polygons: usize,
    pub manifold: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSummary {
    Solid(LeafSummary),
    Assembly(AssemblySummary),
}

#[derive(Debug, Clone, Serialize)]
pub struct AssemblySummary {
    pub label: String,
    pub children: Vec<NodeSummary>,
}

impl LeafSummary {
    pub fn of(solid: &Solid) -> Self {
        Self {
            label: solid.label().to_string(),
            material: solid.material().map(|m| m.to_string()),
            volume: solid.volume(),
            polygons: solid.polygons().len(),
            manifold: audit_solid(solid).is_manifold(),
        }
    }
}

impl AssemblySummary {
    pub fn of(assembly: &Assembly) -> Self {
        Self {
            label: assembly.label.clone(),
            children: assembly
                .children
                .iter()
                .map(|c| match c {
                    Node::Solid(s) => NodeSummary::Solid(LeafSummary::of(s)),
                    Node::Assembly(a) => NodeSummary::Assembly(AssemblySummary::of(a)),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.label, indent = depth * 2)?;
        for child in &self.children {
            match child {
                NodeSummary::Assembly(a) => a.write_indented(f, depth + 1)?,
                NodeSummary::Solid(leaf) => writeln!(
                    f,
                    "{:indent$}{} [{}] volume={:.1} mm3 polygons={}{}",
                    "",
                    leaf.label,
                    leaf.material.as_deref().unwrap_or("-"),
                    leaf.volume,
                    leaf.polygons,
                    if leaf.manifold { "" } else { " NON-MANIFOLD" },
                    indent = (depth + 1) * 2
                )?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for AssemblySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phantom_kernel::geometry::point::Point3d;
    use phantom_kernel::topology::primitives::make_box;
    use phantom_kernel::MaterialTag;

    #[test]
    fn test_summary_text_and_json() {
        let body = make_box("Body", Point3d::ORIGIN, Point3d::new(2.0, 1.0, 1.0))
            .unwrap()
            .with_material(MaterialTag::new("pmma"));
        let tree = Assembly::group("Phantom", [Node::from(body)]);
        let summary = AssemblySummary::of(&tree);
        let text = summary.to_string();
        assert!(text.starts_with("Phantom\n"));
        assert!(text.contains("  Body [pmma] volume=2.0 mm3 polygons=6"));
        let json = summary.to_json().unwrap();
        assert!(json.contains("\"kind\": \"solid\""));
        assert!(json.contains("\"manifold\": true"));
    }
}
