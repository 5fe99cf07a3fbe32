//! Errors raised while parsing a constraint catalogue (§6/§7).

use thiserror::Error;

pub type ConstraintResult<T> = Result<T, ConstraintError>;

#[derive(Error, Debug)]
pub enum ConstraintError {
    #[error("constraint record {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("constraint record {index} ('{description}'): {reason}")]
    Schema {
        index: usize,
        description: String,
        reason: String,
    },

    #[error("constraint record {index} ('{description}') mixes dependent/governor sub-fields with plain predicate fields in its {side}")]
    ForbiddenExtraFields {
        index: usize,
        description: String,
        side: &'static str,
    },

    #[error(transparent)]
    Core(#[from] canopy_core::CoreError),
}
