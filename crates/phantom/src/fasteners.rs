//! Cylinder-head screws and the pilot bores they sit in.

use tracing::{debug, instrument};

use phantom_kernel::geometry::point::{Point2d, Point3d};
use phantom_kernel::geometry::Resolution;
use phantom_kernel::operations::placement::{CircularPattern, Placement};
use phantom_kernel::topology::primitives::make_cylinder;
use phantom_kernel::{BooleanEngine, Solid};
use phantom_ops::{fuse_all, instance_pattern};

use crate::error::PhantomResult;
use crate::params::PhantomParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrewDims {
    pub head_diameter: f64,
    pub head_height: f64,
    pub thread_diameter: f64,
    pub thread_length: f64,
}

impl ScrewDims {
    /// Filling screw; the thread runs through an end cap.
    pub fn large(params: &PhantomParams) -> Self {
        Self {
            head_diameter: params.screw_large_head_diameter,
            head_height: params.screw_large_head_height,
            thread_diameter: params.screw_large_thread_diameter,
            thread_length: params.cap_thickness(),
        }
    }

    /// Plate screw; the thread is as long as the wall is thick.
    pub fn small(params: &PhantomParams) -> Self {
        Self {
            head_diameter: params.screw_small_head_diameter,
            head_height: params.screw_small_head_height,
            thread_diameter: params.screw_small_thread_diameter,
            thread_length: params.body_wall_thickness,
        }
    }

    /// Head on `0..head_height`, thread below `z = 0`.
    ///
    /// The thread reaches halfway into the head so the fused solid has no
    /// coplanar contact between the two cylinders.
    #[instrument(skip(self, engine, resolution))]
    pub fn build(&self, engine: &dyn BooleanEngine, label: &str, resolution: &Resolution) -> PhantomResult<Solid> {
        let overlap = 0.5 * self.head_height.min(self.thread_length);
        let head = make_cylinder(label, 0.0, 0.0, 0.0, self.head_diameter / 2.0, self.head_height, resolution)?;
        let thread = make_cylinder(
            &format!("{label} Thread"),
            0.0,
            0.0,
            -self.thread_length,
            self.thread_diameter / 2.0,
            self.thread_length + overlap,
            resolution,
        )?;
        Ok(fuse_all(engine, head, [&thread])?.into_main()?)
    }

    /// Bore along the thread, in the same frame as [`ScrewDims::build`],
    /// overshooting the thread by 1 mm at both ends.
    pub fn pilot_bore(&self, label: &str, resolution: &Resolution) -> PhantomResult<Solid> {
        let bore = make_cylinder(
            label,
            0.0,
            0.0,
            -self.thread_length - 1.0,
            self.thread_diameter / 2.0,
            self.thread_length + 2.0,
            resolution,
        )?;
        Ok(bore)
    }
}

/// Flip a screw so its head points down, out of the part, then move it to `at`.
pub fn head_outside(at: Point3d) -> Placement {
    Placement::mirror_z(0.0).then(&Placement::at(at))
}

/// Placed screws and the bores to cut for them.
#[derive(Debug, Clone, Default)]
pub struct ScrewSet {
    pub screws: Vec<Solid>,
    pub bores: Vec<Solid>,
}

/// Two filling screws low on the sides of each end cap and one at the top.
///
/// The far-end screws are the near-end ones mirrored about the mid plane, so
/// their heads also point outward.
#[instrument(skip_all)]
pub fn build_filling_screws(
    engine: &dyn BooleanEngine,
    params: &PhantomParams,
    resolution: &Resolution,
) -> PhantomResult<ScrewSet> {
    let dims = ScrewDims::large(params);
    let screw = dims.build(engine, "Filling Screw", resolution)?;
    let bore = dims.pilot_bore("Filling Screw Bore", resolution)?;

    let (x, y) = (params.filling_screw_x_offset, params.filling_screw_y());
    let mid_plane = Placement::mirror_z(params.body_length / 2.0);
    let mut placements: Vec<Placement> = [x, -x]
        .into_iter()
        .flat_map(|sx| head_outside(Point3d::new(sx, y, 0.0)).mirrored_pair(&mid_plane))
        .collect();
    placements.push(head_outside(Point3d::new(0.0, params.top_filling_screw_y(), 0.0)));
    debug!(count = placements.len(), "filling screw placements");

    Ok(ScrewSet {
        screws: instance_pattern(&screw, &placements, |i| format!("Filling Screw {}", i + 1)),
        bores: instance_pattern(&bore, &placements, |i| format!("Filling Screw Bore {}", i + 1)),
    })
}

/// Mounting screws on a circle through the plate flange, plus one screw
/// under each tube. Only the mounting screws get bores.
#[instrument(skip_all, fields(tubes = tube_positions.len()))]
pub fn build_plate_screws(
    engine: &dyn BooleanEngine,
    params: &PhantomParams,
    tube_positions: &[Point2d],
    resolution: &Resolution,
) -> PhantomResult<ScrewSet> {
    let dims = ScrewDims::small(params);
    let screw = dims.build(engine, "Small Screw", resolution)?;
    let bore = dims.pilot_bore("Mounting Screw Bore", resolution)?;
    let z = -params.mounting_plate_thickness;

    let ring = CircularPattern::new(
        params.mounting_screw_count,
        params.mounting_screw_radius(),
        params.sphere_axis(),
        z,
    )?;
    let mounting: Vec<Placement> = ring.positions().into_iter().map(head_outside).collect();
    let tubing: Vec<Placement> = tube_positions
        .iter()
        .map(|&p| head_outside(Point3d::from_2d(p, z)))
        .collect();

    let mut screws = instance_pattern(&screw, &mounting, |i| format!("Mounting Screw {}", i + 1));
    screws.extend(instance_pattern(&screw, &tubing, |i| format!("Tubing Screw {i}")));
    Ok(ScrewSet {
        screws,
        bores: instance_pattern(&bore, &mounting, |i| format!("Mounting Screw Bore {}", i + 1)),
    })
}
