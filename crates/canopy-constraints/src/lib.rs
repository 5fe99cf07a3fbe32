#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
//! # Canopy Constraints
//!
//! Parses a linguistic constraint catalogue (§6), evaluates individual
//! constraints against [`canopy_core`] tokens and dependency arcs (§4.1),
//! and orchestrates the six-group sentence validator that prunes
//! `validPosMorphologies` down to a single surviving candidate per token,
//! or reports the first group of violations it finds (§4.2).

pub mod catalogue;
pub mod engine;
pub mod error;
pub mod validator;

pub use catalogue::parse_catalogue;
pub use engine::{is_verified, verify, verify_all};
pub use error::{ConstraintError, ConstraintResult};
pub use validator::{ContextOverlay, MorphologyPercolator, SentenceValidator, ValidationStep, Violations};
