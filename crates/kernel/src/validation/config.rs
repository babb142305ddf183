//! Configuration for solid and wire validation.

use super::types::ValidationLevel;

/// Tolerance thresholds for validation checks (millimeters, radians).
#[derive(Debug, Clone, Copy)]
pub struct ToleranceConfig {
    /// Points closer than this are coincident.
    pub resolution: f64,
    /// Angular tolerance for G1 checks at wire joins.
    pub angular_tol: f64,
    /// Maximum vertex distance from its polygon's plane.
    pub planarity_tol: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        let kernel = crate::default_tolerance();
        Self {
            resolution: kernel.coincidence,
            angular_tol: kernel.angular,
            planarity_tol: kernel.plane,
        }
    }
}

/// Configuration controlling which checks are run.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// The maximum validation level to run.
    pub level: ValidationLevel,
    pub tolerance: ToleranceConfig,
    /// Report G1 kinks as errors rather than warnings.
    pub require_tangent_joins: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            level: ValidationLevel::Full,
            tolerance: ToleranceConfig::default(),
            require_tangent_joins: true,
        }
    }
}

impl ValidationConfig {
    /// Edge audit only (fastest).
    pub fn topology() -> Self {
        Self {
            level: ValidationLevel::Topology,
            ..Self::default()
        }
    }

    /// Topology + geometric consistency.
    pub fn geometry() -> Self {
        Self {
            level: ValidationLevel::Geometry,
            ..Self::default()
        }
    }

    pub fn full() -> Self {
        Self::default()
    }
}
