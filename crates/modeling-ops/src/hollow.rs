//! Hollowing by subtracting a concentric cavity.

use tracing::{debug, instrument};

use phantom_kernel::boolean::BoolOp;
use phantom_kernel::geometry::point::Point3d;
use phantom_kernel::geometry::Resolution;
use phantom_kernel::topology::primitives::{make_cylinder, make_sphere};
use phantom_kernel::{BooleanEngine, Solid};

use crate::boolean::{cut_all, execute_boolean};
use crate::types::{OpError, OpResult, OutputKey};

/// Subtract `cavity` from `outer`, keeping the cavity as a second output.
///
/// The cavity is relabeled to `cavity_label`; the shell keeps the outer
/// solid's label.
#[instrument(skip_all, fields(outer = outer.label()))]
pub fn execute_hollow(
    engine: &dyn BooleanEngine,
    outer: Solid,
    cavity: Solid,
    cavity_label: &str,
) -> Result<OpResult, OpError> {
    let mut result = execute_boolean(engine, outer, &cavity, BoolOp::Subtract)?;
    result
        .outputs
        .push((OutputKey::Cavity, cavity.with_label(cavity_label)));
    Ok(result)
}

/// Spherical shell of outer radius `radius` and thickness `wall`, plus its
/// filling.
#[instrument(skip(engine, resolution))]
pub fn hollow_sphere(
    engine: &dyn BooleanEngine,
    label: &str,
    center: Point3d,
    radius: f64,
    wall: f64,
    resolution: &Resolution,
) -> Result<OpResult, OpError> {
    check_wall(radius, wall)?;
    let outer = make_sphere(label, center, radius, resolution)?;
    let cavity = make_sphere(label, center, radius - wall, resolution)?;
    debug!(inner_radius = radius - wall, "hollowing sphere");
    execute_hollow(engine, outer, cavity, &format!("{label} Filling"))
}

/// Vertical tube from `base` up by `height`, bored through along its axis
/// and trimmed by each solid in `trim`.
#[instrument(skip(engine, trim, resolution))]
#[allow(clippy::too_many_arguments)]
pub fn hollow_tube(
    engine: &dyn BooleanEngine,
    label: &str,
    base: Point3d,
    outer_radius: f64,
    inner_radius: f64,
    height: f64,
    trim: &[&Solid],
    resolution: &Resolution,
) -> Result<OpResult, OpError> {
    check_wall(outer_radius, outer_radius - inner_radius)?;
    let tube = make_cylinder(label, base.x, base.y, base.z, outer_radius, height, resolution)?;
    // The bore overshoots both ends so no cap is coplanar with the tube's.
    let overshoot = outer_radius;
    let bore = make_cylinder(
        &format!("{label} Bore"),
        base.x,
        base.y,
        base.z - overshoot,
        inner_radius,
        height + 2.0 * overshoot,
        resolution,
    )?;
    let tools = std::iter::once(&bore).chain(trim.iter().copied());
    cut_all(engine, tube, tools)
}

fn check_wall(radius: f64, wall: f64) -> Result<(), OpError> {
    if !(wall > 0.0 && wall < radius) {
        return Err(OpError::InvalidParameter {
            reason: format!("wall {wall} must be positive and below the radius {radius}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phantom_kernel::validation::audit::audit_solid;
    use phantom_kernel::BspBooleanEngine;

    #[test]
    fn test_hollow_sphere_has_uniform_wall() {
        let engine = BspBooleanEngine::default();
        let center = Point3d::new(10.0, 35.0, 82.0);
        let res = Resolution::from_degrees(15.0);
        let result = hollow_sphere(&engine, "Sphere 5 37mm", center, 18.5, 1.0, &res).unwrap();
        let shell = result.output(OutputKey::Main).unwrap();
        for v in shell.vertices() {
            let r = v.distance_to(&center);
            assert!((r - 18.5).abs() < 1e-9 || (r - 17.5).abs() < 1e-9, "vertex at radius {r}");
        }
        let cavity = result.output(OutputKey::Cavity).unwrap();
        assert_eq!(cavity.label(), "Sphere 5 37mm Filling");
        let outer = make_sphere("o", center, 18.5, &res).unwrap();
        assert!((shell.volume() + cavity.volume() - outer.volume()).abs() < 1e-6 * outer.volume());
        assert!(audit_solid(shell).is_manifold());
    }

    #[test]
    fn test_wall_thicker_than_radius_rejected() {
        let engine = BspBooleanEngine::default();
        let err = hollow_sphere(&engine, "s", Point3d::ORIGIN, 1.0, 1.0, &Resolution::default()).unwrap_err();
        assert!(matches!(err, OpError::InvalidParameter { .. }));
    }

    #[test]
    fn test_hollow_tube_volume() {
        let engine = BspBooleanEngine::default();
        let res = Resolution::from_degrees(10.0);
        let tube = hollow_tube(&engine, "Tube", Point3d::ORIGIN, 2.5, 1.0, 20.0, &[], &res)
            .unwrap()
            .into_main()
            .unwrap();
        let n = res.circle_segments() as f64;
        let polygon_area = |r: f64| 0.5 * n * r * r * (std::f64::consts::TAU / n).sin();
        let expected = (polygon_area(2.5) - polygon_area(1.0)) * 20.0;
        assert!((tube.volume() - expected).abs() < 1e-6 * expected);
        assert!(audit_solid(&tube).is_manifold());
    }
}
