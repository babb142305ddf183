use serde::{Deserialize, Serialize};

use super::curves::CurveSegment;
use super::point::Point2d;
use super::Resolution;

/// An ordered chain of curve segments in the profile plane.
///
/// A wire is a plain value: every transform returns a new wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    segments: Vec<CurveSegment>,
}

impl Wire {
    pub fn new(segments: Vec<CurveSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn start(&self) -> Option<Point2d> {
        self.segments.first().map(|s| s.start())
    }

    pub fn end(&self) -> Option<Point2d> {
        self.segments.last().map(|s| s.end())
    }

    /// True when the last segment ends where the first one starts.
    pub fn is_closed(&self, tol: f64) -> bool {
        match (self.start(), self.end()) {
            (Some(s), Some(e)) => s.distance_to(&e) <= tol,
            _ => false,
        }
    }

    pub fn length(&self) -> f64 {
        self.segments.iter().map(|s| s.length()).sum()
    }

    /// Signed enclosed area (positive for counter-clockwise). Meaningful for closed wires.
    pub fn signed_area(&self) -> f64 {
        self.segments.iter().map(|s| s.area_term()).sum()
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// The same path traversed backwards.
    pub fn reversed(&self) -> Self {
        Self::new(self.segments.iter().rev().map(|s| s.reversed()).collect())
    }

    /// Reflection across `x = 0`, segment order preserved.
    pub fn mirrored_x(&self) -> Self {
        Self::new(self.segments.iter().map(|s| s.mirrored_x()).collect())
    }

    /// Append the segments of `other` after this wire's segments.
    pub fn concat(&self, other: &Wire) -> Self {
        let mut segments = self.segments.clone();
        segments.extend_from_slice(&other.segments);
        Self::new(segments)
    }

    /// Polyline approximation. Shared join points appear once; for a closed
    /// wire the closing point is not repeated.
    pub fn discretize(&self, resolution: &Resolution, tol: f64) -> Vec<Point2d> {
        let mut points: Vec<Point2d> = Vec::new();
        for seg in &self.segments {
            for p in seg.discretize(resolution) {
                if points.last().is_none_or(|last| last.distance_to(&p) > tol) {
                    points.push(p);
                }
            }
        }
        if points.len() > 1 && points[0].distance_to(&points[points.len() - 1]) <= tol {
            points.pop();
        }
        points
    }
}

/// Signed area of a closed polygon (shoelace formula).
pub fn polygon_signed_area(points: &[Point2d]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        * 0.5
}

/// Orientation of `c` relative to the directed line `a -> b`.
fn orient(a: Point2d, b: Point2d, c: Point2d) -> f64 {
    (b - a).cross(&(c - a))
}

fn segments_cross(p1: Point2d, p2: Point2d, q1: Point2d, q2: Point2d, tol: f64) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);
    let straddles = |a: f64, b: f64| (a > tol && b < -tol) || (a < -tol && b > tol);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }
    // Touching contacts count as intersections too.
    let on_segment = |a: Point2d, b: Point2d, c: Point2d| {
        let len = a.distance_to(&b).max(1e-300);
        orient(a, b, c).abs() / len <= tol
            && c.x >= a.x.min(b.x) - tol
            && c.x <= a.x.max(b.x) + tol
            && c.y >= a.y.min(b.y) - tol
            && c.y <= a.y.max(b.y) + tol
    };
    on_segment(q1, q2, p1) || on_segment(q1, q2, p2) || on_segment(p1, p2, q1) || on_segment(p1, p2, q2)
}

/// Index pair of the first two non-adjacent edges of a closed polygon that
/// intersect or touch, if any.
pub fn find_self_intersection(points: &[Point2d], tol: f64) -> Option<(usize, usize)> {
    let n = points.len();
    if n < 4 {
        return None;
    }
    for i in 0..n {
        let (a1, a2) = (points[i], points[(i + 1) % n]);
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b1, b2) = (points[j], points[(j + 1) % n]);
            if segments_cross(a1, a2, b1, b2, tol) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Even-odd point-in-polygon test.
pub fn point_in_polygon(p: Point2d, polygon: &[Point2d]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// True when any edge of `a` touches any edge of `b`.
pub fn polygons_touch(a: &[Point2d], b: &[Point2d], tol: f64) -> bool {
    let (na, nb) = (a.len(), b.len());
    (0..na).any(|i| {
        let (a1, a2) = (a[i], a[(i + 1) % na]);
        (0..nb).any(|j| segments_cross(a1, a2, b[j], b[(j + 1) % nb], tol))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::curves::{Arc2d, Line2d};

    fn square(size: f64) -> Wire {
        let p = [
            Point2d::new(0.0, 0.0),
            Point2d::new(size, 0.0),
            Point2d::new(size, size),
            Point2d::new(0.0, size),
        ];
        Wire::new((0..4).map(|i| CurveSegment::Line(Line2d::new(p[i], p[(i + 1) % 4]))).collect())
    }

    #[test]
    fn test_square_area_and_orientation() {
        let w = square(2.0);
        assert!(w.is_closed(1e-9));
        assert!((w.signed_area() - 4.0).abs() < 1e-12);
        assert!(w.is_ccw());
        assert!((w.reversed().signed_area() + 4.0).abs() < 1e-12);
        assert!((w.length() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_mirror_flips_orientation() {
        let w = square(3.0);
        let m = w.mirrored_x();
        assert!((m.signed_area() + w.signed_area()).abs() < 1e-12);
        assert_eq!(w.segments()[1].start(), Point2d::new(3.0, 0.0));
        assert_eq!(m.segments()[1].start(), Point2d::new(-3.0, 0.0));
    }

    #[test]
    fn test_discretize_closed_circle() {
        let circle = Wire::new(vec![CurveSegment::Arc(
            Arc2d::new(Point2d::ORIGIN, 5.0, 0.0, std::f64::consts::TAU).unwrap(),
        )]);
        let pts = circle.discretize(&Resolution::from_degrees(30.0), 1e-9);
        assert_eq!(pts.len(), 12);
    }

    #[test]
    fn test_self_intersection_detects_bow_tie() {
        let bow_tie = [
            Point2d::new(0.0, 0.0),
            Point2d::new(2.0, 2.0),
            Point2d::new(2.0, 0.0),
            Point2d::new(0.0, 2.0),
        ];
        assert!(find_self_intersection(&bow_tie, 1e-9).is_some());
        let pts = square(2.0).discretize(&Resolution::default(), 1e-9);
        assert!(find_self_intersection(&pts, 1e-9).is_none());
    }

    #[test]
    fn test_point_in_polygon() {
        let pts = square(2.0).discretize(&Resolution::default(), 1e-9);
        assert!(point_in_polygon(Point2d::new(1.0, 1.0), &pts));
        assert!(!point_in_polygon(Point2d::new(3.0, 1.0), &pts));
    }
}
