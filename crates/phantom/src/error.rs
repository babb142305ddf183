use std::path::PathBuf;

use phantom_assembly::AssemblyError;
use phantom_kernel::GeometryError;
use phantom_ops::OpError;

/// Any failure while configuring or building the phantom. The pipeline stops
/// at the first one.
#[derive(Debug, thiserror::Error)]
pub enum PhantomError {
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("operation failed: {0}")]
    Operation(#[from] OpError),

    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("invalid parameters: {0}")]
    Config(#[from] serde_json::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not a closed manifold")]
    OpenSolid { path: String },

    #[error("unknown parameter '{name}'")]
    UnknownParameter { name: String },
}

pub type PhantomResult<T> = Result<T, PhantomError>;
