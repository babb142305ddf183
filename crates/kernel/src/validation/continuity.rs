//! G0 (positional) and G1 (tangent) continuity at wire segment joins.

use crate::Tolerance;
use crate::error::{GeometryError, GeometryResult};
use crate::geometry::wire::Wire;
use super::config::ValidationConfig;
use super::types::*;

/// Continuity measured at the join after segment `index`.
#[derive(Debug, Clone, Copy)]
pub struct JoinMetrics {
    pub index: usize,
    pub gap: f64,
    /// Angle between the outgoing and incoming tangents.
    pub angle: f64,
}

/// Measure every join of `wire`. For a closed wire the join from the last
/// segment back to the first is included.
pub fn measure_joins(wire: &Wire, closed: bool) -> Vec<JoinMetrics> {
    let segs = wire.segments();
    let n = segs.len();
    let joins = if closed { n } else { n.saturating_sub(1) };
    (0..joins)
        .map(|i| {
            let (a, b) = (&segs[i], &segs[(i + 1) % n]);
            let gap = a.end().distance_to(&b.start());
            let angle = match (a.end_tangent(), b.start_tangent()) {
                (Some(ta), Some(tb)) => ta.angle_to(&tb),
                _ => std::f64::consts::PI,
            };
            JoinMetrics { index: i, gap, angle }
        })
        .collect()
}

/// Run continuity checks on a wire, pushing findings into the report lists.
pub fn check_continuity(
    wire: &Wire,
    closed: bool,
    config: &ValidationConfig,
    errors: &mut Vec<ValidationError>,
    warnings: &mut Vec<ValidationError>,
) -> Vec<JoinMetrics> {
    let metrics = measure_joins(wire, closed);
    let tol = &config.tolerance;
    for m in &metrics {
        if m.gap > tol.resolution {
            errors.push(ValidationError {
                entity: EntityRef::Join(m.index),
                code: if closed && m.index + 1 == metrics.len() {
                    ErrorCode::WireNotClosed
                } else {
                    ErrorCode::G0Discontinuity
                },
                message: format!("segments {} and {} do not meet", m.index, (m.index + 1) % wire.len()),
                severity: Severity::Error,
                numeric_value: Some(m.gap),
                tolerance: Some(tol.resolution),
            });
        } else if m.angle > tol.angular_tol {
            let finding = ValidationError {
                entity: EntityRef::Join(m.index),
                code: ErrorCode::G1Discontinuity,
                message: format!("tangent kink after segment {}", m.index),
                severity: if config.require_tangent_joins {
                    Severity::Error
                } else {
                    Severity::Warning
                },
                numeric_value: Some(m.angle),
                tolerance: Some(tol.angular_tol),
            };
            if config.require_tangent_joins {
                errors.push(finding);
            } else {
                warnings.push(finding);
            }
        }
    }
    metrics
}

/// Fail with `GeometryInconsistency` unless `wire` is closed and tangent
/// continuous at every join.
pub fn require_closed_g1(wire: &Wire, tol: &Tolerance) -> GeometryResult<()> {
    if wire.is_empty() {
        return Err(GeometryError::inconsistency("wire has no segments"));
    }
    for m in measure_joins(wire, true) {
        if m.gap > tol.coincidence {
            return Err(GeometryError::inconsistency(format!(
                "segment {} ends {:.3e} mm away from the start of the next segment",
                m.index, m.gap
            )));
        }
        if m.angle > tol.angular {
            return Err(GeometryError::inconsistency(format!(
                "join after segment {} is not tangent ({:.3e} rad)",
                m.index, m.angle
            )));
        }
    }
    Ok(())
}
