//! The hollow PMMA body: cap + shell + cap extruded from the NEMA profile,
//! and the background liquid that fills it.

use tracing::{info, instrument};

use phantom_kernel::geometry::face::Face;
use phantom_kernel::geometry::wire::Wire;
use phantom_kernel::geometry::Resolution;
use phantom_kernel::operations::extrude::Extrusion;
use phantom_kernel::operations::offset::offset_wire;
use phantom_kernel::operations::profile::build_profile;
use phantom_kernel::topology::primitives::make_cylinder;
use phantom_kernel::{BooleanEngine, Solid};
use phantom_ops::{cut_all, execute_stacked_extrusion, StackSection};

use crate::error::PhantomResult;
use crate::params::PhantomParams;

pub const BODY_LABEL: &str = "Nema Body";
pub const BACKGROUND_LABEL: &str = "Background Liquid";

/// Outer cross-section and its inward offset by the wall thickness.
#[derive(Debug, Clone)]
pub struct BodyProfiles {
    pub outer: Wire,
    pub inner: Wire,
}

impl BodyProfiles {
    #[instrument(skip_all)]
    pub fn build(params: &PhantomParams) -> PhantomResult<Self> {
        let outer = build_profile(&params.profile())?;
        let inner = offset_wire(&outer, params.body_wall_thickness)?;
        info!(
            outer_area = outer.area(),
            inner_area = inner.area(),
            wall = params.body_wall_thickness,
            "body profiles built"
        );
        Ok(Self { outer, inner })
    }

    /// Cross-sectional area of the wall.
    pub fn wall_area(&self) -> f64 {
        self.outer.area() - self.inner.area()
    }
}

/// Solid end caps joined to the hollow shell as one sealed body.
#[instrument(skip_all)]
pub fn build_body_blank(params: &PhantomParams, profiles: &BodyProfiles, resolution: &Resolution) -> PhantomResult<Solid> {
    let cap = params.cap_thickness();
    let interior = params.body_interior_length;
    let end_face = Face::new(profiles.outer.clone())?;
    let hollow_face = Face::with_holes(profiles.outer.clone(), vec![profiles.inner.clone()])?;
    let sections = vec![
        StackSection::new(end_face.clone(), 0.0, cap),
        StackSection::new(hollow_face, cap, interior),
        StackSection::new(end_face, cap + interior, cap),
    ];
    let blank = execute_stacked_extrusion(BODY_LABEL, sections, resolution)?.into_main()?;
    Ok(blank)
}

/// Recess for the mounting plate seat through the bottom cap, with the
/// plate clearance added to the seat radius.
pub fn seat_cutout(params: &PhantomParams, resolution: &Resolution) -> PhantomResult<Solid> {
    let axis = params.sphere_axis();
    let radius = params.mounting_plate_inner_diameter / 2.0 + params.plate_to_body_tolerance;
    let cap = params.cap_thickness();
    // Overshoots the cap by 1 mm on both sides.
    let cutout = make_cylinder("Plate Seat Cutout", axis.x, axis.y, -1.0, radius, cap + 2.0, resolution)?;
    Ok(cutout)
}

/// Liquid filling the body interior around the insert, the spheres and the
/// tubes. `displaced` must hold the finished solids it wraps around.
#[instrument(skip_all, fields(displaced = displaced.len()))]
pub fn build_background(
    engine: &dyn BooleanEngine,
    params: &PhantomParams,
    profiles: &BodyProfiles,
    displaced: &[&Solid],
    resolution: &Resolution,
) -> PhantomResult<Solid> {
    let face = Face::new(profiles.inner.clone())?;
    let liquid = Extrusion::new(face, params.cap_thickness(), params.body_interior_length)?
        .with_resolution(*resolution)
        .into_solid(BACKGROUND_LABEL)?;
    let result = cut_all(engine, liquid, displaced.iter().copied())?;
    info!(
        volume_removed = result.provenance.diff.volume_removed(),
        "background liquid displaced"
    );
    Ok(result.into_main()?)
}
