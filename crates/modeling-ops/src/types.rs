use phantom_kernel::boolean::Interaction;
use phantom_kernel::{GeometryError, Solid};

use crate::diff::DiffResult;

/// Which output of an operation a solid is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputKey {
    /// The primary result.
    Main,
    /// The region removed to hollow the primary result.
    Cavity,
}

/// Complete result of a modeling operation.
#[derive(Debug, Clone)]
pub struct OpResult {
    /// The solids produced by this operation.
    pub outputs: Vec<(OutputKey, Solid)>,
    /// Provenance: which operands were used and how they changed the target.
    pub provenance: Provenance,
    /// Non-fatal warnings and timing information.
    pub diagnostics: Diagnostics,
}

impl OpResult {
    pub fn output(&self, key: OutputKey) -> Option<&Solid> {
        self.outputs.iter().find(|(k, _)| *k == key).map(|(_, s)| s)
    }

    /// Take ownership of one output.
    pub fn into_output(self, key: OutputKey) -> Result<Solid, OpError> {
        self.outputs
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, s)| s)
            .ok_or(OpError::MissingOutput(key))
    }

    pub fn into_main(self) -> Result<Solid, OpError> {
        self.into_output(OutputKey::Main)
    }
}

/// Provenance tracking: which operands touched the result.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    /// Label of the solid the operation started from.
    pub target: String,
    /// Tool operands in application order.
    pub tools: Vec<ToolRecord>,
    /// Volume and boundary change from target to result.
    pub diff: DiffResult,
}

/// One tool operand and how it met the target.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRecord {
    pub label: String,
    pub interaction: Interaction,
}

/// Non-fatal diagnostics from an operation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Time spent in the kernel, in milliseconds.
    pub kernel_time_ms: f64,
}

/// Errors from modeling operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("kernel error: {0}")]
    Kernel(#[from] GeometryError),

    #[error("no operands supplied for {operation}")]
    NoOperands { operation: &'static str },

    #[error("operation produced no {0:?} output")]
    MissingOutput(OutputKey),

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}
