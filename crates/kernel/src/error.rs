use thiserror::Error;

/// Failures raised by the geometric construction core.
///
/// Every kind is detected eagerly by the stage that would otherwise produce
/// invalid geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Profile segments fail endpoint or tangency matching, or a wire self-intersects.
    #[error("geometry inconsistency: {reason}")]
    GeometryInconsistency { reason: String },

    /// An offset distance collapses a segment or folds the wire.
    #[error("degenerate offset by {distance}: {reason}")]
    DegenerateOffset { distance: f64, reason: String },

    /// Two extrusions cannot be concatenated at their shared boundary.
    #[error("profile mismatch at z={z}: {reason}")]
    ProfileMismatch { z: f64, reason: String },

    /// A boolean operand is empty or not a closed manifold.
    #[error("invalid operand '{label}': {reason}")]
    InvalidOperand { label: String, reason: String },

    /// A dimensional parameter is non-positive or violates a cross-parameter bound.
    #[error("parameter out of range: {name} = {value} ({reason})")]
    ParameterOutOfRange {
        name: String,
        value: f64,
        reason: String,
    },
}

pub type GeometryResult<T> = Result<T, GeometryError>;

impl GeometryError {
    pub fn inconsistency(reason: impl Into<String>) -> Self {
        Self::GeometryInconsistency {
            reason: reason.into(),
        }
    }

    pub fn out_of_range(name: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        Self::ParameterOutOfRange {
            name: name.into(),
            value,
            reason: reason.into(),
        }
    }
}

/// Reject non-positive (or non-finite) dimensions.
pub fn require_positive(name: &str, value: f64) -> GeometryResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::out_of_range(name, value, "must be positive"))
    }
}
