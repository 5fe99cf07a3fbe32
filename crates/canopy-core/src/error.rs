//! Error types for the core linguistic data model.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing or mutating the entity model.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("constraint catalogue schema error in field '{field}': {reason}")]
    Schema { field: String, reason: String },

    #[error("dependency tree is invalid: {reason}")]
    InvalidTree { reason: String },

    #[error("token {id} has no candidate morphology and no content-word configuration to synthesize one from")]
    MissingMorphology { id: i64 },

    #[error("unknown token id {id} referenced as {role}")]
    UnknownToken { id: i64, role: &'static str },
}
