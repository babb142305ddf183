//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics,
//! so a whole assembly can be checked in one pass.

use phantom_assembly::Assembly;
use phantom_kernel::validation::audit::audit_solid;
use phantom_kernel::validation::harness::{validate_operation, HarnessResult};
use phantom_kernel::validation::volume::{verify_boolean_volume_identity, verify_subtract_volume};
use phantom_kernel::validation::{validate_solid, ValidationConfig};
use phantom_kernel::{BooleanEngine, GeometryResult, Solid};

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    /// What was checked, usually a solid label or tree path.
    pub subject: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, subject: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            subject: subject.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, subject: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::pass(name, subject, detail)
        }
    }

    fn fail(name: &str, subject: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            subject: subject.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, subject: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::fail(name, subject, detail)
        }
    }

    fn with_subject(mut self, subject: String) -> Self {
        self.subject = subject;
        self
    }
}

// ── Solid Oracles ───────────────────────────────────────────────────────────

/// Every directed boundary edge has exactly one reverse partner.
pub fn check_manifold(solid: &Solid) -> OracleVerdict {
    let audit = audit_solid(solid);
    if audit.is_manifold() {
        OracleVerdict::pass(
            "manifold",
            solid.label(),
            format!("{} polygons, {} edges closed", audit.polygons, audit.edges),
        )
    } else {
        OracleVerdict::fail(
            "manifold",
            solid.label(),
            format!(
                "{} free edges, {} over-shared edges, {} polygons with repeated vertices",
                audit.free_edges, audit.over_shared_edges, audit.repeated_vertex_polygons
            ),
        )
    }
}

/// The solid encloses a strictly positive volume.
pub fn check_positive_volume(solid: &Solid) -> OracleVerdict {
    let volume = solid.volume();
    if volume > 0.0 {
        OracleVerdict::pass_val("positive_volume", solid.label(), format!("{volume:.3} mm³"), volume)
    } else {
        OracleVerdict::fail_val(
            "positive_volume",
            solid.label(),
            format!("volume {volume:.3} mm³ is not positive"),
            volume,
        )
    }
}

/// V - E + F is even, as for every closed orientable surface.
pub fn check_euler_parity(solid: &Solid) -> OracleVerdict {
    let audit = audit_solid(solid);
    let euler = audit.euler_characteristic;
    let detail = format!("V({}) - E({}) + F({}) = {euler}", audit.vertices, audit.edges, audit.polygons);
    if audit.euler_consistent() {
        OracleVerdict::pass_val("euler_parity", solid.label(), detail, euler as f64)
    } else {
        OracleVerdict::fail_val("euler_parity", solid.label(), detail, euler as f64)
    }
}

/// The solid carries a material tag.
pub fn check_material(solid: &Solid) -> OracleVerdict {
    match solid.material() {
        Some(material) => OracleVerdict::pass("material", solid.label(), material.to_string()),
        None => OracleVerdict::fail("material", solid.label(), "no material assigned".to_string()),
    }
}

/// Full kernel validation: topology, planarity, face area, volume sign and Euler parity.
pub fn check_validation(solid: &Solid) -> OracleVerdict {
    let report = validate_solid(solid);
    if report.valid {
        OracleVerdict::pass(
            "validation",
            solid.label(),
            format!("valid, {} warnings", report.warning_count()),
        )
    } else {
        OracleVerdict::fail("validation", solid.label(), report.to_string())
    }
}

/// `inner` lies inside `outer`'s bounding box.
pub fn check_contained(outer: &Solid, inner: &Solid, tol: f64) -> OracleVerdict {
    let subject = format!("{} in {}", inner.label(), outer.label());
    let (o, i) = (outer.bounding_box(), inner.bounding_box());
    if crate::helpers::bounds_contain(&o, &i, tol) {
        OracleVerdict::pass("contained", &subject, "bounding box inside".to_string())
    } else {
        OracleVerdict::fail(
            "contained",
            &subject,
            format!(
                "({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2}) exceeds ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2})",
                i.min.x, i.min.y, i.min.z, i.max.x, i.max.y, i.max.z, o.min.x, o.min.y, o.min.z, o.max.x, o.max.y,
                o.max.z
            ),
        )
    }
}

// ── Boolean Oracles ─────────────────────────────────────────────────────────

/// `vol(A ∪ B) = vol(A) + vol(B) - vol(A ∩ B)` for the engine's own union
/// and intersection of the operands.
pub fn check_union_identity(
    engine: &dyn BooleanEngine,
    a: &Solid,
    b: &Solid,
    max_relative_error: f64,
) -> GeometryResult<OracleVerdict> {
    let union = engine.union(a.clone(), b)?;
    let intersection = engine.intersect(a.clone(), b)?;
    let intersection = (!intersection.is_empty()).then_some(&intersection);
    let check = verify_boolean_volume_identity(a, b, &union, intersection);
    let subject = format!("{} ∪ {}", a.label(), b.label());
    let detail = format!(
        "union {:.3}, expected {:.3}, relative error {:.2e}",
        check.vol_union, check.expected_union, check.relative_error
    );
    Ok(if check.is_valid(max_relative_error) {
        OracleVerdict::pass_val("union_identity", &subject, detail, check.relative_error)
    } else {
        OracleVerdict::fail_val("union_identity", &subject, detail, check.relative_error)
    })
}

/// `vol(A - B) = vol(A) - vol(A ∩ B)`.
pub fn check_subtract_identity(
    engine: &dyn BooleanEngine,
    a: &Solid,
    b: &Solid,
    max_relative_error: f64,
) -> GeometryResult<OracleVerdict> {
    let difference = engine.subtract(a.clone(), b)?;
    let intersection = engine.intersect(a.clone(), b)?;
    let error = verify_subtract_volume(a, &difference, &intersection);
    let subject = format!("{} - {}", a.label(), b.label());
    let detail = format!("relative error {error:.2e}");
    Ok(if error < max_relative_error {
        OracleVerdict::pass_val("subtract_identity", &subject, detail, error)
    } else {
        OracleVerdict::fail_val("subtract_identity", &subject, detail, error)
    })
}

/// Run `op` through the kernel validation harness and judge its output.
pub fn check_operation<E>(
    name: &str,
    solid: Solid,
    op: impl FnOnce(Solid) -> Result<Solid, E>,
) -> Result<(OracleVerdict, HarnessResult), E> {
    let result = validate_operation(solid, &ValidationConfig::default(), op)?;
    let detail = format!(
        "volume {:+.3}, polygons {:+}",
        result.volume_change, result.polygon_count_change
    );
    let verdict = if result.post_report.valid {
        OracleVerdict::pass_val("operation", name, detail, result.volume_change)
    } else {
        OracleVerdict::fail_val(
            "operation",
            name,
            format!("{detail}\n{}", result.post_report),
            result.volume_change,
        )
    };
    Ok((verdict, result))
}

// ── Batch Runners ───────────────────────────────────────────────────────────

/// Manifold, volume and Euler checks for one solid.
pub fn run_solid_checks(solid: &Solid) -> Vec<OracleVerdict> {
    vec![check_manifold(solid), check_positive_volume(solid), check_euler_parity(solid)]
}

/// Solid checks plus a material check for every leaf, subject set to the
/// leaf's tree path.
pub fn run_assembly_checks(assembly: &Assembly) -> Vec<OracleVerdict> {
    assembly
        .leaves()
        .iter()
        .flat_map(|leaf| {
            let path = leaf.path_string();
            run_solid_checks(leaf.solid)
                .into_iter()
                .chain(std::iter::once(check_material(leaf.solid)))
                .map(move |v| v.with_subject(path.clone()))
        })
        .collect()
}

/// The verdicts that failed.
pub fn failures(verdicts: &[OracleVerdict]) -> Vec<&OracleVerdict> {
    verdicts.iter().filter(|v| !v.passed).collect()
}
