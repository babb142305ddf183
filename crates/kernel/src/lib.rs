pub mod error;
pub mod geometry;
pub mod topology;
pub mod boolean;
pub mod operations;
pub mod validation;

// Re-export key types at crate root for convenience.
pub use boolean::{BooleanEngine, BspBooleanEngine};
pub use error::{GeometryError, GeometryResult};
pub use topology::mesh::{MaterialTag, Solid};

/// Global tolerance configuration for geometric comparisons.
///
/// All lengths are millimeters.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this are considered coincident.
    pub coincidence: f64,
    /// Angles smaller than this (radians) are considered zero.
    pub angular: f64,
    /// Distance below which a point is classified as lying on a splitting plane.
    pub plane: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-6,
            angular: 1e-4,
            plane: 1e-5,
        }
    }
}

impl Tolerance {
    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() <= self.coincidence
    }
}

/// Default tolerance used by every kernel operation that does not take one explicitly.
pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}
