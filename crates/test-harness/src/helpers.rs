//! Helper functions: error type, test-resolution builds, polygon area math.

use std::collections::BTreeMap;

use nema_phantom::{build_phantom, PhantomError, PhantomModel, PhantomParams};
use phantom_assembly::AssemblyError;
use phantom_kernel::geometry::transform::BoundingBox;
use phantom_kernel::geometry::Resolution;
use phantom_kernel::GeometryError;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("build error: {0}")]
    Build(#[from] PhantomError),

    #[error("tree error: {0}")]
    Tree(#[from] AssemblyError),

    #[error("kernel error: {0}")]
    Kernel(#[from] GeometryError),
}

// ── Builds ──────────────────────────────────────────────────────────────────

/// Angular step used for test builds. Coarse enough to keep the boolean
/// passes quick, fine enough that every sphere still has a tube.
pub const TEST_RESOLUTION_DEG: f64 = 30.0;

/// Default parameters at test resolution, with `overrides` applied on top.
pub fn coarse_params(overrides: &[(&str, f64)]) -> Result<PhantomParams, HarnessError> {
    let mut values: BTreeMap<String, f64> = overrides.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    values
        .entry("angular_resolution_deg".to_string())
        .or_insert(TEST_RESOLUTION_DEG);
    Ok(PhantomParams::from_map(&values)?)
}

/// Build the default phantom at test resolution.
pub fn build_coarse() -> Result<PhantomModel, HarnessError> {
    Ok(build_phantom(&coarse_params(&[])?)?)
}

// ── Polygon Math ────────────────────────────────────────────────────────────

/// Area of the regular polygon that approximates a circle of radius `r`.
pub fn disc_area(r: f64, resolution: &Resolution) -> f64 {
    let n = resolution.circle_segments() as f64;
    0.5 * n * r * r * (std::f64::consts::TAU / n).sin()
}

/// Volume of an approximated cylinder.
pub fn cylinder_volume(r: f64, height: f64, resolution: &Resolution) -> f64 {
    disc_area(r, resolution) * height
}

/// Smallest box enclosing both inputs.
pub fn merge_bounds(a: &BoundingBox, b: &BoundingBox) -> BoundingBox {
    let mut merged = *a;
    merged.expand_to_include(&b.min);
    merged.expand_to_include(&b.max);
    merged
}

/// Whether `inner` lies within `outer`, allowing `tol` slack on each side.
pub fn bounds_contain(outer: &BoundingBox, inner: &BoundingBox, tol: f64) -> bool {
    let slack = outer.expanded(tol);
    slack.contains_point(&inner.min) && slack.contains_point(&inner.max)
}
