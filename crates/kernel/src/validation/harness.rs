//! Operation harness for validating modeling operations.
//!
//! Captures the target's state, runs the operation, validates the result,
//! and computes deltas (volume change, polygon count change).

use crate::topology::mesh::Solid;
use super::SolidValidator;
use super::config::ValidationConfig;
use super::types::*;

/// Snapshot of a solid's state before an operation.
#[derive(Debug, Clone)]
pub struct PreOperationSnapshot {
    pub volume: f64,
    pub entity_counts: EntityCounts,
    pub validation_report: ValidationReport,
}

/// Result of running an operation through the validation harness.
#[derive(Debug)]
pub struct HarnessResult {
    pub pre_snapshot: PreOperationSnapshot,
    pub solid: Solid,
    pub post_report: ValidationReport,
    pub volume_change: f64,
    pub polygon_count_change: i64,
}

/// Run a modeling operation through the validation harness.
///
/// The operation consumes the solid, matching the boolean ownership model.
pub fn validate_operation<E>(
    solid: Solid,
    config: &ValidationConfig,
    op: impl FnOnce(Solid) -> Result<Solid, E>,
) -> Result<HarnessResult, E> {
    let validator = SolidValidator::new(config.clone());

    let pre_report = validator.validate(&solid);
    let pre_snapshot = PreOperationSnapshot {
        volume: pre_report.metrics.volume,
        entity_counts: pre_report.metrics.entity_counts,
        validation_report: pre_report,
    };

    let result = op(solid)?;

    let post_report = validator.validate(&result);
    let volume_change = post_report.metrics.volume - pre_snapshot.volume;
    let polygon_count_change =
        post_report.metrics.entity_counts.polygons as i64 - pre_snapshot.entity_counts.polygons as i64;

    Ok(HarnessResult {
        pre_snapshot,
        solid: result,
        post_report,
        volume_change,
        polygon_count_change,
    })
}

/// Assert that an operation run through the harness produced a valid solid.
#[macro_export]
macro_rules! assert_operation_valid {
    ($harness_result:expr) => {
        assert!(
            $harness_result.post_report.valid,
            "Operation produced invalid solid:\n{}",
            $harness_result.post_report
        );
    };
    ($harness_result:expr, $msg:expr) => {
        assert!(
            $harness_result.post_report.valid,
            "{}: Operation produced invalid solid:\n{}",
            $msg,
            $harness_result.post_report
        );
    };
}
