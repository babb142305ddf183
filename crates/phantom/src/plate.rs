use tracing::{info, instrument};

use phantom_kernel::geometry::Resolution;
use phantom_kernel::topology::primitives::make_cylinder;
use phantom_kernel::{BooleanEngine, Solid};
use phantom_ops::{cut_all, fuse_all};

use crate::error::PhantomResult;
use crate::params::PhantomParams;

pub const PLATE_LABEL: &str = "Sphere Mounting Plate";

/// Flange under the body fused with the seat that sits in the bottom cap,
/// then cut by `cutters` (the insert, the tubes and the screw bores).
///
/// The seat starts halfway down the flange so the two discs overlap instead
/// of touching.
#[instrument(skip_all, fields(cutters = cutters.len()))]
pub fn build_mounting_plate(
    engine: &dyn BooleanEngine,
    params: &PhantomParams,
    cutters: &[&Solid],
    resolution: &Resolution,
) -> PhantomResult<Solid> {
    let axis = params.sphere_axis();
    let t = params.mounting_plate_thickness;
    let flange = make_cylinder(
        PLATE_LABEL,
        axis.x,
        axis.y,
        -t,
        params.mounting_plate_outer_diameter / 2.0,
        t,
        resolution,
    )?;
    let overlap = 0.5 * t;
    let seat = make_cylinder(
        "Sphere Mounting Plate Seat",
        axis.x,
        axis.y,
        -overlap,
        params.mounting_plate_inner_diameter / 2.0,
        params.cap_thickness() + overlap,
        resolution,
    )?;
    let plate = fuse_all(engine, flange, [&seat])?.into_main()?;
    let result = cut_all(engine, plate, cutters.iter().copied())?;
    info!(
        volume_removed = result.provenance.diff.volume_removed(),
        warnings = result.diagnostics.warnings.len(),
        "mounting plate cut"
    );
    Ok(result.into_main()?)
}
