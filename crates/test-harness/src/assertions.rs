//! Assertion helpers with diagnostic output.
//!
//! Every failure names the context, the expected value and the actual value.

use phantom_assembly::{Assembly, Node};
use phantom_kernel::validation::audit::audit_solid;
use phantom_kernel::Solid;

use crate::helpers::HarnessError;
use crate::oracle::{failures, OracleVerdict};

/// Assert the solid's boundary is a closed manifold.
pub fn assert_manifold(solid: &Solid, ctx: &str) -> Result<(), HarnessError> {
    let audit = audit_solid(solid);
    if audit.is_manifold() {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] '{}' is not manifold: {} free edges, {} over-shared edges",
                ctx,
                solid.label(),
                audit.free_edges,
                audit.over_shared_edges,
            ),
        })
    }
}

/// Assert the solid's volume is within `rel_tol` of `expected`.
pub fn assert_volume_close(solid: &Solid, expected: f64, rel_tol: f64, ctx: &str) -> Result<(), HarnessError> {
    let actual = solid.volume();
    let error = if expected == 0.0 {
        actual.abs()
    } else {
        (actual - expected).abs() / expected.abs()
    };
    if error <= rel_tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] '{}' volume: expected {:.3}, got {:.3} (rel err {:.2e} > {:.2e})",
                ctx,
                solid.label(),
                expected,
                actual,
                error,
                rel_tol,
            ),
        })
    }
}

/// Assert the solid's bounding box matches expected values within tolerance.
pub fn assert_bounding_box(
    solid: &Solid,
    expected_min: [f64; 3],
    expected_max: [f64; 3],
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let bounds = solid.bounding_box();
    let actual_min = [bounds.min.x, bounds.min.y, bounds.min.z];
    let actual_max = [bounds.max.x, bounds.max.y, bounds.max.z];

    for i in 0..3 {
        if (actual_min[i] - expected_min[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box min[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_min[i], actual_min[i], tol,
                ),
            });
        }
        if (actual_max[i] - expected_max[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box max[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_max[i], actual_max[i], tol,
                ),
            });
        }
    }
    Ok(())
}

/// Assert the node at `path` (the root itself when empty) has exactly the
/// given child labels, in order.
pub fn assert_child_labels(assembly: &Assembly, path: &str, expected: &[&str]) -> Result<(), HarnessError> {
    let children = if path.is_empty() {
        &assembly.children
    } else {
        match assembly.find(path)? {
            Node::Assembly(group) => &group.children,
            Node::Solid(solid) => {
                return Err(HarnessError::AssertionFailed {
                    detail: format!("[{}] '{}' is a solid, not a group", path, solid.label()),
                })
            }
        }
    };
    let actual: Vec<&str> = children.iter().map(Node::label).collect();
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{}] children: expected {:?}, got {:?}", path, expected, actual),
        })
    }
}

/// Assert every verdict passed, reporting the first failure.
pub fn assert_all_pass(verdicts: &[OracleVerdict]) -> Result<(), HarnessError> {
    let failed = failures(verdicts);
    match failed.first() {
        None => Ok(()),
        Some(first) => Err(HarnessError::OracleFailure {
            oracle: first.oracle_name.clone(),
            detail: format!("{}: {} ({} failures total)", first.subject, first.detail, failed.len()),
        }),
    }
}
