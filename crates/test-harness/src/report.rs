//! Structured text model reports.
//!
//! Reports are plain text rather than JSON so a failing test can print the
//! whole model state in a readable form.

use std::fmt;

use phantom_assembly::Assembly;
use phantom_kernel::geometry::transform::BoundingBox;
use phantom_kernel::validation::audit::audit_solid;

use crate::helpers::merge_bounds;
use crate::oracle::{run_assembly_checks, OracleVerdict};

/// A complete model report with all sections.
pub struct ModelReport {
    pub label: String,
    pub leaf_entries: Vec<LeafEntry>,
    pub bounding_box: Option<BoundingBox>,
    pub oracle_results: Vec<OracleVerdict>,
}

/// A single solid's report entry.
pub struct LeafEntry {
    pub path: String,
    pub material: Option<String>,
    pub volume: f64,
    pub topology: (usize, usize, usize),
    pub euler: i64,
    pub manifold: bool,
}

impl ModelReport {
    /// Audit every leaf of `assembly` and run the assembly oracles.
    pub fn of(assembly: &Assembly) -> Self {
        let leaves = assembly.leaves();
        let leaf_entries = leaves
            .iter()
            .map(|leaf| {
                let audit = audit_solid(leaf.solid);
                LeafEntry {
                    path: leaf.path_string(),
                    material: leaf.solid.material().map(|m| m.to_string()),
                    volume: leaf.solid.volume(),
                    topology: (audit.vertices, audit.edges, audit.polygons),
                    euler: audit.euler_characteristic,
                    manifold: audit.is_manifold(),
                }
            })
            .collect();
        let bounding_box = leaves
            .iter()
            .map(|leaf| leaf.solid.bounding_box())
            .reduce(|a, b| merge_bounds(&a, &b));

        Self {
            label: assembly.label.clone(),
            leaf_entries,
            bounding_box,
            oracle_results: run_assembly_checks(assembly),
        }
    }

    pub fn total_volume(&self) -> f64 {
        self.leaf_entries.iter().map(|e| e.volume).sum()
    }

    pub fn failed_checks(&self) -> usize {
        self.oracle_results.iter().filter(|v| !v.passed).count()
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== {} ===\n\n", self.label));

        let open = self.leaf_entries.iter().filter(|e| !e.manifold).count();
        out.push_str(&format!("Solids ({} leaves, {} open):\n", self.leaf_entries.len(), open));
        for entry in &self.leaf_entries {
            let material = entry.material.as_deref().unwrap_or("-");
            out.push_str(&format!("  {} [{}]\n", entry.path, material));
            let (v, e, f) = entry.topology;
            let status = if entry.manifold { "OK" } else { "OPEN" };
            out.push_str(&format!(
                "      V={} E={} F={} | Euler={} | {:.1} mm³ ({})\n",
                v, e, f, entry.euler, entry.volume, status,
            ));
        }

        if let Some(bounds) = &self.bounding_box {
            out.push_str(&format!(
                "\nBounding Box: ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1})\n",
                bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z,
            ));
        }

        let failed: Vec<_> = self.oracle_results.iter().filter(|v| !v.passed).collect();
        out.push_str(&format!(
            "\nOracle Results ({} checks, {} failed):\n",
            self.oracle_results.len(),
            failed.len()
        ));
        if failed.is_empty() {
            out.push_str("  all passed\n");
        }
        for v in failed {
            out.push_str(&format!("  [FAIL] {} {}: {}\n", v.oracle_name, v.subject, v.detail));
        }

        out
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
