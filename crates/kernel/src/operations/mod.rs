//! Construction operations: cross-section profiles, wire offsets, stacked
//! extrusions and placement patterns.

pub mod extrude;
pub mod offset;
pub mod placement;
pub mod profile;

pub use extrude::{Extrusion, ExtrusionSection};
pub use offset::offset_wire;
pub use placement::{CircularPattern, Placement};
pub use profile::{ProfileDimensions, build_half_profile, build_profile};
