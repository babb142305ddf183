use std::time::Instant;

use tracing::{info, instrument, warn};

use phantom_kernel::boolean::{BoolOp, Interaction, check_result};
use phantom_kernel::{BooleanEngine, Solid};

use crate::diff;
use crate::types::{Diagnostics, OpError, OpResult, OutputKey, Provenance, ToolRecord};

/// Execute a boolean operation between a target and a tool.
///
/// The target is consumed; the tool is only read and can be reused.
#[instrument(skip_all, fields(op = ?kind, target = target.label(), tool = tool.label()))]
pub fn execute_boolean(
    engine: &dyn BooleanEngine,
    target: Solid,
    tool: &Solid,
    kind: BoolOp,
) -> Result<OpResult, OpError> {
    fold(engine, target, std::iter::once(tool), kind, "boolean")
}

/// Subtract every tool from `target`, in order.
#[instrument(skip_all, fields(target = target.label()))]
pub fn cut_all<'a>(
    engine: &dyn BooleanEngine,
    target: Solid,
    tools: impl IntoIterator<Item = &'a Solid>,
) -> Result<OpResult, OpError> {
    fold(engine, target, tools, BoolOp::Subtract, "cut_all")
}

/// Fuse every tool into `target`, in order.
#[instrument(skip_all, fields(target = target.label()))]
pub fn fuse_all<'a>(
    engine: &dyn BooleanEngine,
    target: Solid,
    tools: impl IntoIterator<Item = &'a Solid>,
) -> Result<OpResult, OpError> {
    fold(engine, target, tools, BoolOp::Union, "fuse_all")
}

fn fold<'a>(
    engine: &dyn BooleanEngine,
    target: Solid,
    tools: impl IntoIterator<Item = &'a Solid>,
    kind: BoolOp,
    operation: &'static str,
) -> Result<OpResult, OpError> {
    let before = diff::snapshot(&target);
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let started = Instant::now();

    let mut current = target;
    for tool in tools {
        let outcome = engine.apply(kind, current, tool)?;
        check_result(&outcome.solid)?;
        if outcome.interaction == Interaction::Disjoint && kind == BoolOp::Subtract {
            warn!(tool = tool.label(), "tool does not reach the target");
            warnings.push(format!("'{}' does not reach '{}'", tool.label(), before.label));
        }
        records.push(ToolRecord {
            label: tool.label().to_string(),
            interaction: outcome.interaction,
        });
        current = outcome.solid;
    }
    if records.is_empty() {
        return Err(OpError::NoOperands { operation });
    }

    let kernel_time_ms = started.elapsed().as_secs_f64() * 1e3;
    let after = diff::snapshot(&current);
    let diff_result = diff::diff(&before, &after);
    info!(
        tools = records.len(),
        volume_change = diff_result.volume_change,
        kernel_time_ms,
        "boolean fold complete"
    );

    Ok(OpResult {
        outputs: vec![(OutputKey::Main, current)],
        provenance: Provenance {
            target: before.label,
            tools: records,
            diff: diff_result,
        },
        diagnostics: Diagnostics {
            warnings,
            kernel_time_ms,
        },
    })
}
