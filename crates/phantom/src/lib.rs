//! Parametric NEMA IEC body phantom.
//!
//! [`build_phantom`] turns a [`PhantomParams`] set into the assembly tree of
//! the phantom: the hollow body, the hollow spheres on their tubes and
//! mounting plate, the lung insert, the fasteners, and the liquids that fill
//! them.

pub mod body;
pub mod error;
pub mod fasteners;
pub mod insert;
pub mod params;
pub mod pipeline;
pub mod plate;
pub mod spheres;

pub use error::{PhantomError, PhantomResult};
pub use params::{MaterialNames, PhantomParams};
pub use pipeline::{build_phantom, build_phantom_with, check_leaves, PhantomModel, ASSEMBLY_LABEL, FILLED_LABEL};
