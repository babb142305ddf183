//! Shared types for solid and wire validation.
//!
//! Defines error codes, severity levels, entity references, validation errors,
//! metrics, and the unified `ValidationReport`.

use std::fmt;

/// Which validation levels to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationLevel {
    /// Edge usage only (free and over-shared edges, repeated vertices).
    Topology,
    /// Topology plus polygon planarity, zero-area faces, and volume sign.
    Geometry,
    /// Everything, including the Euler characteristic parity.
    Full,
}

/// Severity of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Must be fixed for a valid solid.
    Error,
    /// Informational, the result is still usable.
    Warning,
}

/// The entity an error relates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Solid,
    Polygon(usize),
    Vertex(usize),
    /// A wire segment join, by index of the segment ending there.
    Join(usize),
}

/// Enumeration of all validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // --- Boundary topology ---
    /// Directed edge without a reverse partner (open boundary).
    FreeEdge,
    /// Directed edge used more than once (non-manifold).
    InvalidMultiConnexity,
    /// A polygon visits the same vertex twice.
    RepeatedVertex,
    /// V - E + F is odd, which no closed orientable surface allows.
    EulerPoincareViolation,
    // --- Geometry ---
    /// Polygon has zero or near-zero area.
    ZeroAreaFace,
    /// Polygon vertices do not lie on a common plane.
    NonPlanarFace,
    /// Solid has negative or zero volume (inverted or empty).
    NegativeVolume,
    // --- Wires ---
    /// A closed wire does not return to its start point.
    WireNotClosed,
    /// G0 (positional) gap at a segment join.
    G0Discontinuity,
    /// G1 (tangent) kink at a segment join.
    G1Discontinuity,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single validation finding (error or warning).
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Which entity.
    pub entity: EntityRef,
    /// The error code classifying this issue.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
    pub severity: Severity,
    /// Measured numeric value (e.g. the gap distance at a join).
    pub numeric_value: Option<f64>,
    /// The tolerance threshold that was exceeded.
    pub tolerance: Option<f64>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        write!(f, "[{}] {:?}: {} (code: {})", sev, self.entity, self.message, self.code)?;
        if let Some(val) = self.numeric_value {
            write!(f, " value={val:.2e}")?;
        }
        if let Some(tol) = self.tolerance {
            write!(f, " tol={tol:.2e}")?;
        }
        Ok(())
    }
}

/// Counts of boundary entities in a solid.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityCounts {
    pub vertices: usize,
    pub edges: usize,
    pub polygons: usize,
}

/// Aggregate metrics computed during validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationMetrics {
    pub entity_counts: EntityCounts,
    pub volume: f64,
    pub surface_area: f64,
    /// Largest distance of a polygon vertex from the polygon's plane.
    pub max_planarity_deviation: f64,
}

/// The unified validation report produced by `SolidValidator`.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Whether the solid passed all checks at the requested level.
    pub valid: bool,
    /// The highest level that was actually run.
    pub level_completed: ValidationLevel,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
    pub metrics: ValidationMetrics,
}

impl ValidationReport {
    /// Filter errors by a specific error code.
    pub fn errors_of(&self, code: ErrorCode) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.code == code).collect()
    }

    /// Check that no errors of a specific code exist.
    pub fn no_errors_of(&self, code: ErrorCode) -> bool {
        !self.errors.iter().any(|e| e.code == code)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ValidationReport: valid={}, level={:?}, errors={}, warnings={}",
            self.valid,
            self.level_completed,
            self.errors.len(),
            self.warnings.len()
        )?;
        for e in &self.errors {
            writeln!(f, "  {e}")?;
        }
        for w in &self.warnings {
            writeln!(f, "  {w}")?;
        }
        Ok(())
    }
}
