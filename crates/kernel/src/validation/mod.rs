pub mod audit;
pub mod config;
pub mod continuity;
pub mod harness;
pub mod types;
pub mod volume;

pub use config::*;
pub use types::*;

use tracing::{info, instrument};

use crate::boolean::split::Plane;
use crate::topology::mesh::Solid;

/// Unified validation engine for polygonal solids.
///
/// Runs hierarchical checks at increasing levels of sophistication:
/// - **Topology**: free edges, non-manifold edges, repeated vertices.
/// - **Geometry**: polygon planarity, zero-area polygons, volume sign.
/// - **Full**: Euler characteristic parity.
pub struct SolidValidator {
    config: ValidationConfig,
}

impl SolidValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a solid, returning a unified report.
    #[instrument(skip_all, fields(label = solid.label()))]
    pub fn validate(&self, solid: &Solid) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut metrics = ValidationMetrics {
            volume: solid.volume(),
            surface_area: solid.surface_area(),
            ..ValidationMetrics::default()
        };

        let edge_audit = audit::audit_solid(solid);
        metrics.entity_counts = EntityCounts {
            vertices: edge_audit.vertices,
            edges: edge_audit.edges,
            polygons: edge_audit.polygons,
        };
        self.check_topology(&edge_audit, &mut errors);
        let mut level_completed = ValidationLevel::Topology;

        if self.config.level >= ValidationLevel::Geometry {
            self.check_geometry(solid, &mut errors, &mut warnings, &mut metrics);
            level_completed = ValidationLevel::Geometry;
        }

        if self.config.level >= ValidationLevel::Full {
            if !edge_audit.euler_consistent() {
                errors.push(ValidationError {
                    entity: EntityRef::Solid,
                    code: ErrorCode::EulerPoincareViolation,
                    message: format!(
                        "V - E + F = {} is odd (V={} E={} F={})",
                        edge_audit.euler_characteristic, edge_audit.vertices, edge_audit.edges, edge_audit.polygons
                    ),
                    severity: Severity::Error,
                    numeric_value: Some(edge_audit.euler_characteristic as f64),
                    tolerance: None,
                });
            }
            level_completed = ValidationLevel::Full;
        }

        let valid = errors.is_empty();
        info!(
            valid,
            level = ?level_completed,
            error_count = errors.len(),
            warning_count = warnings.len(),
            "validation complete"
        );

        ValidationReport {
            valid,
            level_completed,
            errors,
            warnings,
            metrics,
        }
    }

    fn check_topology(&self, audit: &audit::TopologyAudit, errors: &mut Vec<ValidationError>) {
        if audit.polygons == 0 {
            errors.push(ValidationError {
                entity: EntityRef::Solid,
                code: ErrorCode::FreeEdge,
                message: "solid has no boundary".into(),
                severity: Severity::Error,
                numeric_value: None,
                tolerance: None,
            });
        }
        if audit.free_edges > 0 {
            errors.push(ValidationError {
                entity: EntityRef::Solid,
                code: ErrorCode::FreeEdge,
                message: format!("{} directed edges have no reverse partner", audit.free_edges),
                severity: Severity::Error,
                numeric_value: Some(audit.free_edges as f64),
                tolerance: None,
            });
        }
        if audit.over_shared_edges > 0 {
            errors.push(ValidationError {
                entity: EntityRef::Solid,
                code: ErrorCode::InvalidMultiConnexity,
                message: format!("{} directed edges are used more than once", audit.over_shared_edges),
                severity: Severity::Error,
                numeric_value: Some(audit.over_shared_edges as f64),
                tolerance: None,
            });
        }
        if audit.repeated_vertex_polygons > 0 {
            errors.push(ValidationError {
                entity: EntityRef::Solid,
                code: ErrorCode::RepeatedVertex,
                message: format!("{} polygons revisit a vertex", audit.repeated_vertex_polygons),
                severity: Severity::Error,
                numeric_value: Some(audit.repeated_vertex_polygons as f64),
                tolerance: None,
            });
        }
    }

    fn check_geometry(
        &self,
        solid: &Solid,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationError>,
        metrics: &mut ValidationMetrics,
    ) {
        let tol = &self.config.tolerance;
        for index in 0..solid.polygons().len() {
            let points = solid.polygon_points(index);
            let Some(plane) = Plane::from_polygon(&points) else {
                errors.push(ValidationError {
                    entity: EntityRef::Polygon(index),
                    code: ErrorCode::ZeroAreaFace,
                    message: "polygon encloses no area".into(),
                    severity: Severity::Error,
                    numeric_value: None,
                    tolerance: None,
                });
                continue;
            };
            let deviation = points
                .iter()
                .map(|p| plane.signed_distance(p).abs())
                .fold(0.0, f64::max);
            metrics.max_planarity_deviation = metrics.max_planarity_deviation.max(deviation);
            if deviation > tol.planarity_tol {
                warnings.push(ValidationError {
                    entity: EntityRef::Polygon(index),
                    code: ErrorCode::NonPlanarFace,
                    message: "polygon vertices leave the polygon plane".into(),
                    severity: Severity::Warning,
                    numeric_value: Some(deviation),
                    tolerance: Some(tol.planarity_tol),
                });
            }
        }

        if metrics.volume <= 0.0 {
            errors.push(ValidationError {
                entity: EntityRef::Solid,
                code: ErrorCode::NegativeVolume,
                message: "enclosed volume is not positive".into(),
                severity: Severity::Error,
                numeric_value: Some(metrics.volume),
                tolerance: None,
            });
        }
    }
}

/// Validate with the default (full) configuration.
pub fn validate_solid(solid: &Solid) -> ValidationReport {
    SolidValidator::new(ValidationConfig::default()).validate(solid)
}
