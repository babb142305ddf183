//! Mirror-symmetric cross-section built from a flat bottom, two corner arcs,
//! two side tangents and a top dome.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::Tolerance;
use crate::error::{GeometryError, GeometryResult, require_positive};
use crate::geometry::Resolution;
use crate::geometry::curves::{Arc2d, CurveSegment, Line2d};
use crate::geometry::point::Point2d;
use crate::geometry::wire::{Wire, find_self_intersection};
use crate::validation::continuity::require_closed_g1;

/// Dimensions of the symmetric cross-section. The symmetry axis is `x = 0`
/// and `y = 0` is the horizontal center line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileDimensions {
    /// Total height from the bottom to the apex.
    pub height: f64,
    /// Length of the flat bottom.
    pub width: f64,
    /// Distance from the center line down to the bottom.
    pub bottom_depth: f64,
    pub corner_radius: f64,
    pub top_radius: f64,
}

impl ProfileDimensions {
    /// NEMA IEC 61675-1 body phantom cross-section.
    pub const NEMA: Self = Self {
        height: 230.0,
        width: 150.0,
        bottom_depth: 80.0,
        corner_radius: 77.0,
        top_radius: 147.0,
    };

    pub fn validate(&self) -> GeometryResult<()> {
        require_positive("height", self.height)?;
        require_positive("width", self.width)?;
        require_positive("bottom_depth", self.bottom_depth)?;
        require_positive("corner_radius", self.corner_radius)?;
        require_positive("top_radius", self.top_radius)?;
        if self.bottom_depth >= self.height {
            return Err(GeometryError::out_of_range(
                "bottom_depth",
                self.bottom_depth,
                format!("must be below the height {}", self.height),
            ));
        }
        Ok(())
    }

    pub fn apex(&self) -> Point2d {
        Point2d::new(0.0, self.height - self.bottom_depth)
    }

    fn corner_center(&self) -> Point2d {
        Point2d::new(self.width / 2.0, self.corner_radius - self.bottom_depth)
    }

    fn top_center(&self) -> Point2d {
        Point2d::new(0.0, self.height - self.bottom_depth - self.top_radius)
    }
}

/// Angle of the outward normal of the right side tangent line, shared by
/// the corner circle and the top circle.
///
/// Solves `n · (c_corner - c_top) = r_top - r_corner` for the external
/// tangent on the right of both circles.
pub fn side_tangent_angle(dims: &ProfileDimensions) -> GeometryResult<f64> {
    let delta = dims.corner_center() - dims.top_center();
    let distance = delta.length();
    let radius_gap = dims.top_radius - dims.corner_radius;
    if distance <= radius_gap.abs() {
        return Err(GeometryError::inconsistency(format!(
            "corner circle (r={}) and top circle (r={}) are nested; no side tangent exists",
            dims.corner_radius, dims.top_radius
        )));
    }
    let theta = delta.y.atan2(delta.x) + (radius_gap / distance).acos();
    if theta <= -FRAC_PI_2 || theta >= FRAC_PI_2 {
        return Err(GeometryError::inconsistency(format!(
            "side tangent normal at {:.2} deg folds the profile across the symmetry axis",
            theta.to_degrees()
        )));
    }
    Ok(theta)
}

/// Right half of the profile, running clockwise from the apex down to the
/// bottom tangency point: top arc, side line (omitted when it has no
/// length), corner arc.
#[instrument]
pub fn build_half_profile(dims: &ProfileDimensions) -> GeometryResult<Wire> {
    dims.validate()?;
    let tol = crate::default_tolerance();
    let theta = side_tangent_angle(dims)?;

    let top = Arc2d::new(dims.top_center(), dims.top_radius, FRAC_PI_2, theta - FRAC_PI_2)?;
    let corner = Arc2d::new(dims.corner_center(), dims.corner_radius, theta, -FRAC_PI_2 - theta)?;

    let mut segments = vec![CurveSegment::Arc(top)];
    let side = Line2d::new(top.end(), corner.start());
    if tol.is_zero_length(side.length()) {
        debug!("corner and top arcs touch; no side line");
    } else {
        segments.push(CurveSegment::Line(side));
    }
    segments.push(CurveSegment::Arc(corner));

    let half = Wire::new(segments);
    if half.discretize(&Resolution::default(), tol.coincidence).iter().any(|p| p.x < -tol.coincidence) {
        return Err(GeometryError::inconsistency("half profile crosses the symmetry axis"));
    }
    debug!(
        theta_deg = theta.to_degrees(),
        side_length = side.length(),
        "half profile built"
    );
    Ok(half)
}

/// Closed cross-section: bottom line, left corner, left side, left top arc,
/// right top arc, right side, right corner.
///
/// The left half is the mirror image of the right half, traversed in the
/// opposite direction so the whole wire stays clockwise.
#[instrument]
pub fn build_profile(dims: &ProfileDimensions) -> GeometryResult<Wire> {
    let tol = crate::default_tolerance();
    let right = build_half_profile(dims)?;
    let left = right.mirrored_x().reversed();

    let bottom_y = -dims.bottom_depth;
    let bottom = Wire::new(vec![CurveSegment::Line(Line2d::new(
        Point2d::new(dims.width / 2.0, bottom_y),
        Point2d::new(-dims.width / 2.0, bottom_y),
    ))]);
    let profile = bottom.concat(&left).concat(&right);

    verify_profile(&profile, &tol)?;
    info!(
        segments = profile.len(),
        area = profile.area(),
        perimeter = profile.length(),
        "profile built"
    );
    Ok(profile)
}

/// Closed, tangent continuous and free of self-intersections.
pub fn verify_profile(wire: &Wire, tol: &Tolerance) -> GeometryResult<()> {
    require_closed_g1(wire, tol)?;
    let ring = wire.discretize(&Resolution::default(), tol.coincidence);
    if let Some((i, j)) = find_self_intersection(&ring, tol.coincidence) {
        return Err(GeometryError::inconsistency(format!(
            "profile self-intersects between polyline edges {i} and {j}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nema_tangent_angle() {
        let theta = side_tangent_angle(&ProfileDimensions::NEMA).unwrap();
        // 75 cos(t) - 6 sin(t) = 70
        assert_relative_eq!(75.0 * theta.cos() - 6.0 * theta.sin(), 70.0, epsilon = 1e-9);
        assert_relative_eq!(theta.to_degrees(), 16.93493, epsilon = 1e-4);
    }

    #[test]
    fn test_nema_profile_closed_and_tangent() {
        let wire = build_profile(&ProfileDimensions::NEMA).unwrap();
        assert_eq!(wire.len(), 7);
        assert!(wire.is_closed(1e-6));
        assert!(!wire.is_ccw());
        assert!(require_closed_g1(&wire, &Tolerance::default()).is_ok());
    }

    #[test]
    fn test_nema_profile_extents() {
        let wire = build_profile(&ProfileDimensions::NEMA).unwrap();
        let pts = wire.discretize(&Resolution::from_degrees(1.0), 1e-9);
        let max_y = pts.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let min_y = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert_relative_eq!(max_y, 150.0, epsilon = 1e-9);
        assert_relative_eq!(min_y, -80.0, epsilon = 1e-9);
        let half_width = pts.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert!(half_width > 148.0 && half_width < 152.0);
    }

    #[test]
    fn test_profile_is_mirror_symmetric() {
        let wire = build_profile(&ProfileDimensions::NEMA).unwrap();
        assert_relative_eq!(wire.signed_area(), wire.mirrored_x().reversed().signed_area(), epsilon = 1e-9);
        let segs = wire.segments();
        // left top arc (index 3) mirrors right top arc (index 4)
        assert!(segs[3].end().distance_to(&segs[4].start()) < 1e-9);
        assert!(segs[3].start().distance_to(&segs[4].end().mirrored_x()) < 1e-9);
    }

    #[test]
    fn test_nested_circles_rejected() {
        let dims = ProfileDimensions {
            corner_radius: 10.0,
            top_radius: 200.0,
            ..ProfileDimensions::NEMA
        };
        assert!(matches!(
            build_profile(&dims),
            Err(GeometryError::GeometryInconsistency { .. })
        ));
    }

    #[test]
    fn test_non_positive_dimension_rejected() {
        let dims = ProfileDimensions {
            width: 0.0,
            ..ProfileDimensions::NEMA
        };
        assert!(matches!(
            build_profile(&dims),
            Err(GeometryError::ParameterOutOfRange { .. })
        ));
    }
}
