//! Hollow spheres on their filling tubes.
//!
//! Each sphere is an independent branch: the solid sphere, its shell and
//! filling, and the tube trimmed by that sphere. Branches only read shared
//! inputs, so they are built in parallel.

use rayon::prelude::*;
use tracing::{info, instrument};

use phantom_kernel::geometry::point::{Point2d, Point3d};
use phantom_kernel::geometry::Resolution;
use phantom_kernel::operations::placement::CircularPattern;
use phantom_kernel::topology::primitives::{make_cylinder, make_sphere};
use phantom_kernel::{BooleanEngine, Solid};
use phantom_ops::{hollow_sphere, hollow_tube, OpError, OutputKey};

use crate::error::PhantomResult;
use crate::params::PhantomParams;

/// Everything built for one sphere.
#[derive(Debug, Clone)]
pub struct SphereBranch {
    pub index: usize,
    pub diameter: f64,
    pub center: Point3d,
    /// Solid sphere, used to trim the tube and to displace the background.
    pub envelope: Solid,
    pub shell: Solid,
    pub filling: Solid,
    /// Solid tube cylinder, used to cut the plate and the background.
    pub tube_envelope: Solid,
    pub tube: Solid,
}

impl SphereBranch {
    /// Label of the group holding the shell and its tube.
    pub fn group_label(&self) -> String {
        format!("Sphere {}mm", self.diameter)
    }

    pub fn axis(&self) -> Point2d {
        self.center.xy()
    }
}

/// Sphere centers, one per diameter, evenly spaced around the sphere axis.
pub fn sphere_pattern(params: &PhantomParams) -> PhantomResult<CircularPattern> {
    Ok(CircularPattern::new(
        params.sphere_diameters.len(),
        params.sphere_circle_diameter / 2.0,
        params.sphere_axis(),
        params.sphere_center_z(),
    )?)
}

#[instrument(skip(engine, params, resolution))]
pub fn build_sphere_branch(
    engine: &dyn BooleanEngine,
    params: &PhantomParams,
    index: usize,
    diameter: f64,
    center: Point3d,
    resolution: &Resolution,
) -> PhantomResult<SphereBranch> {
    let radius = diameter / 2.0;
    let envelope = make_sphere(&format!("Sphere {diameter}mm"), center, radius, resolution)?;

    let hollowed = hollow_sphere(
        engine,
        &format!("Sphere {index} {diameter}mm"),
        center,
        radius,
        params.sphere_wall_thickness,
        resolution,
    )?;
    let filling = hollowed
        .output(OutputKey::Cavity)
        .cloned()
        .ok_or(OpError::MissingOutput(OutputKey::Cavity))?;
    let shell = hollowed.into_main()?.with_label(format!("Hollow Sphere {diameter}mm"));

    let base = Point3d::new(center.x, center.y, 0.0);
    let outer_radius = params.tube_outer_radius();
    let tube_envelope = make_cylinder(
        &format!("Tube {index}"),
        base.x,
        base.y,
        base.z,
        outer_radius,
        center.z,
        resolution,
    )?;
    let tube = hollow_tube(
        engine,
        &format!("Hollow Tube {index}"),
        base,
        outer_radius,
        params.tube_inner_radius,
        center.z,
        &[&envelope],
        resolution,
    )?
    .into_main()?;

    info!(
        shell_volume = shell.volume(),
        filling_volume = filling.volume(),
        tube_top = tube.bounding_box().max.z,
        "sphere branch built"
    );
    Ok(SphereBranch {
        index,
        diameter,
        center,
        envelope,
        shell,
        filling,
        tube_envelope,
        tube,
    })
}

/// All sphere branches, in diameter order.
#[instrument(skip_all, fields(count = params.sphere_diameters.len()))]
pub fn build_sphere_branches<E>(engine: &E, params: &PhantomParams, resolution: &Resolution) -> PhantomResult<Vec<SphereBranch>>
where
    E: BooleanEngine + Sync,
{
    let centers = sphere_pattern(params)?.positions();
    params
        .sphere_diameters
        .par_iter()
        .zip(centers.into_par_iter())
        .enumerate()
        .map(|(index, (&diameter, center))| build_sphere_branch(engine, params, index, diameter, center, resolution))
        .collect()
}
