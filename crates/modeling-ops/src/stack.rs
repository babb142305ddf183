use std::time::Instant;

use tracing::{info, instrument};

use phantom_kernel::geometry::face::Face;
use phantom_kernel::geometry::Resolution;
use phantom_kernel::operations::extrude::Extrusion;

use crate::diff;
use crate::types::{Diagnostics, OpError, OpResult, OutputKey, Provenance};

/// One layer of a stacked extrusion.
#[derive(Debug, Clone)]
pub struct StackSection {
    pub face: Face,
    pub z0: f64,
    pub length: f64,
}

impl StackSection {
    pub fn new(face: Face, z0: f64, length: f64) -> Self {
        Self { face, z0, length }
    }
}

/// Extrude every section and join them bottom to top into one sealed solid.
#[instrument(skip(sections, resolution), fields(sections = sections.len()))]
pub fn execute_stacked_extrusion(
    label: &str,
    sections: Vec<StackSection>,
    resolution: &Resolution,
) -> Result<OpResult, OpError> {
    let started = Instant::now();
    let mut layers = sections.into_iter();
    let first = layers.next().ok_or(OpError::NoOperands {
        operation: "stacked extrusion",
    })?;
    let mut stack = Extrusion::new(first.face, first.z0, first.length)?.with_resolution(*resolution);
    for layer in layers {
        stack = stack.concat(Extrusion::new(layer.face, layer.z0, layer.length)?)?;
    }
    let exact_volume = stack.volume();
    let solid = stack.into_solid(label)?;

    let after = diff::snapshot(&solid);
    let diff_result = diff::diff(&diff::empty_snapshot(label), &after);
    let kernel_time_ms = started.elapsed().as_secs_f64() * 1e3;
    info!(exact_volume, mesh_volume = after.volume, "stacked extrusion built");

    Ok(OpResult {
        outputs: vec![(OutputKey::Main, solid)],
        provenance: Provenance {
            target: label.to_string(),
            tools: Vec::new(),
            diff: diff_result,
        },
        diagnostics: Diagnostics {
            warnings: Vec::new(),
            kernel_time_ms,
        },
    })
}
