//! End-to-end construction of the phantom assembly.
//!
//! Stages run in dependency order and every one is pass/fail: the first
//! error aborts the build and no assembly is returned.

use std::iter;
use std::time::Instant;

use tracing::{info, instrument, warn};

use phantom_assembly::{Assembly, Node};
use phantom_kernel::validation::audit::audit_solid;
use phantom_kernel::{BooleanEngine, BspBooleanEngine, Solid};
use phantom_ops::{apply_material, cut_all, untagged};

use crate::body::{build_background, build_body_blank, seat_cutout, BodyProfiles};
use crate::error::{PhantomError, PhantomResult};
use crate::fasteners::{build_filling_screws, build_plate_screws};
use crate::insert::build_lung_insert;
use crate::params::PhantomParams;
use crate::plate::build_mounting_plate;
use crate::spheres::{build_sphere_branches, SphereBranch};

pub const ASSEMBLY_LABEL: &str = "Nema Phantom Assembly";
pub const FILLED_LABEL: &str = "Nema Phantom Filled";

/// The finished phantom.
#[derive(Debug, Clone)]
pub struct PhantomModel {
    /// Body, mounted spheres, insert shell and filling screws.
    pub assembly: Assembly,
    /// The assembly together with the sphere fillings and background liquid.
    pub filled: Assembly,
    /// Contents of the lung insert. Tagged but not part of either tree.
    pub insert_filling: Solid,
}

/// Build the phantom with the default boolean engine.
pub fn build_phantom(params: &PhantomParams) -> PhantomResult<PhantomModel> {
    build_phantom_with(&BspBooleanEngine::default(), params)
}

#[instrument(skip_all)]
pub fn build_phantom_with<E>(engine: &E, params: &PhantomParams) -> PhantomResult<PhantomModel>
where
    E: BooleanEngine + Sync,
{
    let started = Instant::now();
    params.validate()?;
    let res = params.resolution();
    let materials = &params.materials;

    let profiles = BodyProfiles::build(params)?;
    let blank = build_body_blank(params, &profiles, &res)?;
    let insert = build_lung_insert(engine, params, &res)?;
    let branches = build_sphere_branches(engine, params, &res)?;
    info!(branches = branches.len(), "sphere branches ready");

    let filling_screws = build_filling_screws(engine, params, &res)?;
    let seat = seat_cutout(params, &res)?;
    let body_cutters = iter::once(&seat)
        .chain(iter::once(&insert.envelope))
        .chain(filling_screws.bores.iter());
    let body = cut_all(engine, blank, body_cutters)?
        .into_main()?
        .with_material(materials.phantom());

    let tube_axes: Vec<_> = branches.iter().map(SphereBranch::axis).collect();
    let plate_screws = build_plate_screws(engine, params, &tube_axes, &res)?;
    let plate_cutters: Vec<&Solid> = iter::once(&insert.envelope)
        .chain(branches.iter().map(|b| &b.tube_envelope))
        .chain(plate_screws.bores.iter())
        .collect();
    let plate = build_mounting_plate(engine, params, &plate_cutters, &res)?.with_material(materials.phantom());

    // Runs last: it wraps around the finished insert, spheres and tubes.
    let displaced: Vec<&Solid> = iter::once(&insert.envelope)
        .chain(branches.iter().map(|b| &b.envelope))
        .chain(branches.iter().map(|b| &b.tube_envelope))
        .collect();
    let background = build_background(engine, params, &profiles, &displaced, &res)?.with_material(materials.filling());

    let sphere_groups = branches.iter().map(|b| {
        Node::from(Assembly::group(
            b.group_label(),
            [
                Node::from(b.shell.clone().with_material(materials.phantom())),
                Node::from(b.tube.clone().with_material(materials.phantom())),
            ],
        ))
    });
    let spheres_mounted = Assembly::group(
        "Spheres Mounted",
        [
            Node::from(plate),
            Node::from(Assembly::group(
                "Sphere Screws",
                apply_material(plate_screws.screws, &materials.screw()).into_iter().map(Node::from),
            )),
            Node::from(Assembly::group("Spheres & Tubing", sphere_groups)),
        ],
    );
    let assembly = Assembly::group(
        ASSEMBLY_LABEL,
        [
            Node::from(body),
            Node::from(spheres_mounted),
            Node::from(insert.shell.with_material(materials.phantom())),
            Node::from(Assembly::group(
                "Filling Screws",
                apply_material(filling_screws.screws, &materials.screw()).into_iter().map(Node::from),
            )),
        ],
    );
    let liquids = apply_material(branches.into_iter().map(|b| b.filling), &materials.filling());
    let filled = Assembly::group(
        FILLED_LABEL,
        [
            Node::from(assembly.clone()),
            Node::from(Assembly::group("Sphere Liquids", liquids.into_iter().map(Node::from))),
            Node::from(background),
        ],
    );
    filled.validate()?;

    let leaves = filled.leaves();
    let missing = untagged(leaves.iter().map(|l| l.solid.as_ref()));
    if !missing.is_empty() {
        warn!(?missing, "solids without material");
    }
    check_leaves(&filled)?;
    info!(
        leaves = leaves.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        "phantom built"
    );

    Ok(PhantomModel {
        assembly,
        filled,
        insert_filling: insert.filling.with_material(materials.insert_filling()),
    })
}

/// Every leaf of the tree must be a closed manifold.
pub fn check_leaves(tree: &Assembly) -> PhantomResult<()> {
    match tree.leaves().iter().find(|l| !audit_solid(l.solid).is_manifold()) {
        Some(leaf) => Err(PhantomError::OpenSolid {
            path: leaf.path_string(),
        }),
        None => Ok(()),
    }
}
