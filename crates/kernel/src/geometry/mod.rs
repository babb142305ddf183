pub mod point;
pub mod vector;
pub mod transform;
pub mod curves;
pub mod wire;
pub mod face;
pub mod triangulate;

/// Tessellation density for curved geometry.
///
/// Arcs and circles are discretized so that no chord spans more than
/// `max_angle` radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub max_angle: f64,
}

impl Resolution {
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            max_angle: degrees.to_radians(),
        }
    }

    /// Number of chords used for an arc sweeping `sweep` radians (at least one).
    pub fn segments_for(&self, sweep: f64) -> usize {
        let step = self.max_angle.max(1e-3);
        ((sweep.abs() / step - 1e-9).ceil() as usize).max(1)
    }

    /// Number of chords for a full circle, never fewer than eight.
    pub fn circle_segments(&self) -> usize {
        self.segments_for(std::f64::consts::TAU).max(8)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::from_degrees(10.0)
    }
}
