use tracing::{debug, instrument};

use crate::Tolerance;
use crate::error::{GeometryError, GeometryResult};
use crate::geometry::Resolution;
use crate::geometry::curves::{Arc2d, CurveSegment, Line2d};
use crate::geometry::wire::{Wire, find_self_intersection};
use crate::validation::continuity::require_closed_g1;

/// Offset a closed, tangent continuous wire by `distance`.
///
/// Positive distances move toward the enclosed region whatever the wire's
/// orientation, negative distances move away from it. Lines are translated
/// along their normal and arcs keep their center, angles and sweep with an
/// adjusted radius, so the segment count and typing never change.
#[instrument(skip(wire), fields(segments = wire.len()))]
pub fn offset_wire(wire: &Wire, distance: f64) -> GeometryResult<Wire> {
    offset_wire_with(wire, distance, &crate::default_tolerance())
}

pub fn offset_wire_with(wire: &Wire, distance: f64, tol: &Tolerance) -> GeometryResult<Wire> {
    if !distance.is_finite() {
        return Err(GeometryError::out_of_range("offset distance", distance, "must be finite"));
    }
    require_closed_g1(wire, tol)?;
    let degenerate = |reason: String| GeometryError::DegenerateOffset { distance, reason };

    // Left of travel is inside for a counter-clockwise wire.
    let inward = if wire.is_ccw() { distance } else { -distance };

    let mut segments = Vec::with_capacity(wire.len());
    for (i, seg) in wire.segments().iter().enumerate() {
        let shifted = match seg {
            CurveSegment::Line(line) => {
                let dir = line
                    .direction()
                    .ok_or_else(|| degenerate(format!("segment {i} is a zero-length line")))?;
                let shift = dir.perp() * inward;
                CurveSegment::Line(Line2d::new(line.start + shift, line.end + shift))
            }
            CurveSegment::Arc(arc) => {
                let turn = if arc.is_ccw() { 1.0 } else { -1.0 };
                let radius = arc.radius - inward * turn;
                if radius <= tol.coincidence {
                    return Err(degenerate(format!(
                        "arc {i} of radius {} collapses to radius {radius:.6}",
                        arc.radius
                    )));
                }
                CurveSegment::Arc(
                    Arc2d::new(arc.center, radius, arc.start_angle, arc.sweep).map_err(|e| degenerate(e.to_string()))?,
                )
            }
        };
        if !shifted.is_arc() && tol.is_zero_length(shifted.length()) {
            return Err(degenerate(format!("line {i} vanishes")));
        }
        segments.push(shifted);
    }

    let result = Wire::new(segments);
    require_closed_g1(&result, tol).map_err(|e| degenerate(e.to_string()))?;
    if result.is_ccw() != wire.is_ccw() {
        return Err(degenerate("offset wire reverses orientation".into()));
    }
    let ring = result.discretize(&Resolution::default(), tol.coincidence);
    if let Some((a, b)) = find_self_intersection(&ring, tol.coincidence) {
        return Err(degenerate(format!("offset wire self-intersects between polyline edges {a} and {b}")));
    }

    debug!(
        distance,
        area_before = wire.area(),
        area_after = result.area(),
        "offset wire"
    );
    Ok(result)
}
