use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use super::point::Point2d;
use super::vector::Vec2;
use super::Resolution;
use crate::error::{GeometryError, GeometryResult};

/// A straight segment in the profile plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line2d {
    pub start: Point2d,
    pub end: Point2d,
}

impl Line2d {
    pub fn new(start: Point2d, end: Point2d) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Unit direction from start to end; `None` for a zero-length line.
    pub fn direction(&self) -> Option<Vec2> {
        (self.end - self.start).normalized()
    }
}

/// A circular arc in the profile plane.
///
/// The arc starts at `start_angle` and turns by `sweep` radians; a positive
/// sweep runs counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc2d {
    pub center: Point2d,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl Arc2d {
    pub fn new(center: Point2d, radius: f64, start_angle: f64, sweep: f64) -> GeometryResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::out_of_range("arc radius", radius, "must be positive"));
        }
        if sweep.abs() < 1e-12 || sweep.abs() > TAU {
            return Err(GeometryError::out_of_range(
                "arc sweep",
                sweep,
                "must be non-zero and at most one full turn",
            ));
        }
        Ok(Self {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    /// Arc of the given radius through two endpoints.
    ///
    /// The center lies on the chord's perpendicular bisector; `ccw` picks the
    /// turning direction and `major` selects the longer of the two candidate arcs.
    pub fn from_endpoints(start: Point2d, end: Point2d, radius: f64, ccw: bool, major: bool) -> GeometryResult<Self> {
        let chord = end - start;
        let half = chord.length() / 2.0;
        if half < 1e-12 {
            return Err(GeometryError::inconsistency("arc endpoints coincide"));
        }
        if radius < half {
            return Err(GeometryError::inconsistency(format!(
                "radius {radius} cannot span a chord of length {}",
                2.0 * half
            )));
        }
        let mid = start.lerp(&end, 0.5);
        let height = (radius * radius - half * half).max(0.0).sqrt();
        let unit = chord / (2.0 * half);
        // Left of the chord for a CCW minor arc.
        let side = if ccw != major { 1.0 } else { -1.0 };
        let center = mid + unit.perp() * (height * side);
        let a0 = (start.y - center.y).atan2(start.x - center.x);
        let a1 = (end.y - center.y).atan2(end.x - center.x);
        let sweep = directed_sweep(a0, a1, ccw);
        Self::new(center, radius, a0, sweep)
    }

    /// Arc leaving `start` along `tangent` and ending at `end`.
    pub fn tangent_to(start: Point2d, tangent: Vec2, end: Point2d) -> GeometryResult<Self> {
        let t = tangent
            .normalized()
            .ok_or_else(|| GeometryError::inconsistency("zero tangent for tangent arc"))?;
        let chord = end - start;
        let lateral = chord.dot(&t.perp());
        if lateral.abs() < 1e-12 {
            return Err(GeometryError::inconsistency(
                "end point lies on the tangent line; use a line segment",
            ));
        }
        let k = chord.dot(&chord) / (2.0 * lateral);
        let center = start + t.perp() * k;
        let ccw = k > 0.0;
        let a0 = (start.y - center.y).atan2(start.x - center.x);
        let a1 = (end.y - center.y).atan2(end.x - center.x);
        Self::new(center, k.abs(), a0, directed_sweep(a0, a1, ccw))
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    pub fn start(&self) -> Point2d {
        Point2d::polar(self.center, self.radius, self.start_angle)
    }

    pub fn end(&self) -> Point2d {
        Point2d::polar(self.center, self.radius, self.end_angle())
    }

    pub fn is_ccw(&self) -> bool {
        self.sweep > 0.0
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    pub fn point_at(&self, t: f64) -> Point2d {
        Point2d::polar(self.center, self.radius, self.start_angle + t * self.sweep)
    }

    /// Unit tangent in the direction of travel at angle `angle`.
    fn tangent_at_angle(&self, angle: f64) -> Vec2 {
        let radial = Vec2::from_angle(angle);
        if self.is_ccw() { radial.perp() } else { -radial.perp() }
    }
}

/// Signed sweep from `a0` to `a1` turning in the requested direction.
/// Coincident angles give a full turn.
fn directed_sweep(a0: f64, a1: f64, ccw: bool) -> f64 {
    let raw = if ccw {
        (a1 - a0).rem_euclid(TAU)
    } else {
        (a0 - a1).rem_euclid(TAU)
    };
    let magnitude = if raw < 1e-12 { TAU } else { raw };
    if ccw { magnitude } else { -magnitude }
}

/// One segment of a wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CurveSegment {
    Line(Line2d),
    Arc(Arc2d),
}

impl CurveSegment {
    pub fn start(&self) -> Point2d {
        match self {
            CurveSegment::Line(l) => l.start,
            CurveSegment::Arc(a) => a.start(),
        }
    }

    pub fn end(&self) -> Point2d {
        match self {
            CurveSegment::Line(l) => l.end,
            CurveSegment::Arc(a) => a.end(),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            CurveSegment::Line(l) => l.length(),
            CurveSegment::Arc(a) => a.length(),
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, CurveSegment::Arc(_))
    }

    /// Unit tangent at the start point, in the direction of travel.
    pub fn start_tangent(&self) -> Option<Vec2> {
        match self {
            CurveSegment::Line(l) => l.direction(),
            CurveSegment::Arc(a) => Some(a.tangent_at_angle(a.start_angle)),
        }
    }

    /// Unit tangent at the end point, in the direction of travel.
    pub fn end_tangent(&self) -> Option<Vec2> {
        match self {
            CurveSegment::Line(l) => l.direction(),
            CurveSegment::Arc(a) => Some(a.tangent_at_angle(a.end_angle())),
        }
    }

    /// The same curve traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        match self {
            CurveSegment::Line(l) => CurveSegment::Line(Line2d::new(l.end, l.start)),
            CurveSegment::Arc(a) => CurveSegment::Arc(Arc2d {
                center: a.center,
                radius: a.radius,
                start_angle: a.end_angle(),
                sweep: -a.sweep,
            }),
        }
    }

    /// Reflection across the vertical axis `x = 0`. Travel direction is kept,
    /// so arcs flip their turning sense.
    pub fn mirrored_x(&self) -> Self {
        match self {
            CurveSegment::Line(l) => CurveSegment::Line(Line2d::new(l.start.mirrored_x(), l.end.mirrored_x())),
            CurveSegment::Arc(a) => CurveSegment::Arc(Arc2d {
                center: a.center.mirrored_x(),
                radius: a.radius,
                start_angle: PI - a.start_angle,
                sweep: -a.sweep,
            }),
        }
    }

    /// Points along the segment, both endpoints included.
    pub fn discretize(&self, resolution: &Resolution) -> Vec<Point2d> {
        match self {
            CurveSegment::Line(l) => vec![l.start, l.end],
            CurveSegment::Arc(a) => {
                let n = resolution.segments_for(a.sweep);
                (0..=n).map(|i| a.point_at(i as f64 / n as f64)).collect()
            }
        }
    }

    /// Contribution of this segment to the enclosed signed area
    /// (Green's theorem, `1/2 * integral of (x dy - y dx)`).
    pub fn area_term(&self) -> f64 {
        match self {
            CurveSegment::Line(l) => 0.5 * (l.start.x * l.end.y - l.end.x * l.start.y),
            CurveSegment::Arc(a) => {
                let (a0, a1) = (a.start_angle, a.end_angle());
                let r = a.radius;
                0.5 * (r * a.center.x * (a1.sin() - a0.sin())
                    + r * a.center.y * (a0.cos() - a1.cos())
                    + r * r * (a1 - a0))
            }
        }
    }
}
