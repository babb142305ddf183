use tracing::{debug, instrument};

use phantom_kernel::geometry::Resolution;
use phantom_kernel::topology::primitives::make_cylinder;
use phantom_kernel::{BooleanEngine, Solid};
use phantom_ops::{execute_hollow, OpError, OutputKey};

use crate::error::PhantomResult;
use crate::params::PhantomParams;

pub const INSERT_SHELL_LABEL: &str = "Nema Lung Insert Shell";
pub const INSERT_FILLING_LABEL: &str = "Nema Lung Insert Filling";

/// The lung insert, centered along the body on the sphere axis.
#[derive(Debug, Clone)]
pub struct LungInsert {
    /// Full outside cylinder, used to cut the body, the plate and the liquid.
    pub envelope: Solid,
    pub shell: Solid,
    pub filling: Solid,
}

#[instrument(skip_all)]
pub fn build_lung_insert(
    engine: &dyn BooleanEngine,
    params: &PhantomParams,
    resolution: &Resolution,
) -> PhantomResult<LungInsert> {
    let axis = params.sphere_axis();
    let mid = params.cap_thickness() + params.body_interior_length / 2.0;
    let z0 = mid - params.insert_outside_height / 2.0;
    let inner_z0 = mid - params.insert_inside_height / 2.0;
    debug!(z0, inner_z0, "placing lung insert");

    let envelope = make_cylinder(
        "Nema Lung Insert",
        axis.x,
        axis.y,
        z0,
        params.insert_outside_diameter / 2.0,
        params.insert_outside_height,
        resolution,
    )?;
    let cavity = make_cylinder(
        INSERT_FILLING_LABEL,
        axis.x,
        axis.y,
        inner_z0,
        params.insert_inside_diameter / 2.0,
        params.insert_inside_height,
        resolution,
    )?;
    let result = execute_hollow(engine, envelope.clone(), cavity, INSERT_FILLING_LABEL)?;
    let filling = result
        .output(OutputKey::Cavity)
        .cloned()
        .ok_or(OpError::MissingOutput(OutputKey::Cavity))?;
    let shell = result.into_main()?.with_label(INSERT_SHELL_LABEL);
    Ok(LungInsert {
        envelope,
        shell,
        filling,
    })
}
