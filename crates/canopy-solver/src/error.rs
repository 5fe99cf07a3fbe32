//! Errors raised while solving labels, trees, and morphologies (§7).

use canopy_core::TokenId;
use thiserror::Error;

pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("token {0} has no candidate values to seed the beam with")]
    EmptyCandidates(TokenId),

    #[error("arc matrix is missing an entry for dependent {0}")]
    MissingArcEntry(TokenId),

    #[error("dependency tree is invalid: {0}")]
    InvalidTree(#[from] canopy_core::TreeError),

    #[error(transparent)]
    Core(#[from] canopy_core::CoreError),
}
