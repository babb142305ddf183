//! Test harness for the phantom model.
//!
//! Tools for building the phantom at test resolution, verifying every solid
//! in an assembly tree, and describing the result as text.
//!
//! # Key Components
//!
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`report`]: Structured text model descriptions
//! - [`helpers`]: Error type, coarse builds, polygon area math
//! - [`assertions`]: Assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod oracle;
pub mod report;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use report::ModelReport;
