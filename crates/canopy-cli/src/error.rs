//! CLI-level errors: wraps every lower-layer error plus the file-loading
//! and wire-parsing failures specific to the demonstration CLI (§7).

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}' as JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed wire input: {0}")]
    Wire(String),

    #[error(transparent)]
    Core(#[from] canopy_core::CoreError),

    #[error(transparent)]
    Constraint(#[from] canopy_constraints::ConstraintError),

    #[error(transparent)]
    Tree(#[from] canopy_core::TreeError),

    #[error("no valid dependency tree could be built from the given arc matrix")]
    TreeBuildFailed,
}
