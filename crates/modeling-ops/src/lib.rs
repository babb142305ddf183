//! Labeled modeling operations on top of the phantom kernel: boolean folds,
//! hollowing, pattern instancing, material tagging and stacked extrusions.

pub mod boolean;
pub mod diff;
pub mod hollow;
pub mod material;
pub mod pattern;
pub mod stack;
pub mod types;

pub use boolean::{cut_all, execute_boolean, fuse_all};
pub use diff::{diff, snapshot, DiffResult, SolidSnapshot};
pub use hollow::{execute_hollow, hollow_sphere, hollow_tube};
pub use material::{apply_material, untagged};
pub use pattern::instance_pattern;
pub use stack::{execute_stacked_extrusion, StackSection};
pub use types::*;
