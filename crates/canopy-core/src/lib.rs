// canopy-core: Core linguistic types for canopy's constraint solver

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]

//! # Canopy Core
//!
//! The entity model shared by every component of canopy's constraint
//! solver: tokens, sentences, dependency trees, grammatical
//! configurations, morphologies, and the declarative predicate/constraint
//! types constraints are built from.
//!
//! This crate has no opinion on *where* a catalogue comes from or *how*
//! a configuration is searched for — those are [`canopy-constraints`] and
//! [`canopy-solver`]. It only defines the data these components share and
//! the pure functions (POS agreement, configuration compatibility,
//! predicate evaluation, cycle detection) that don't need a search loop
//! around them.
//!
//! ## Key components
//!
//! - [`token::Token`] / [`sentence::Sentence`]: the per-word unit and its
//!   owning collection.
//! - [`tree::DependencyTree`]: a flat, cycle-tolerant arc map with
//!   marked-DFS cycle detection.
//! - [`config::GrammaticalConfiguration`]: the (POS, dependency) sequence
//!   a labels solver assigns to a token.
//! - [`predicate::UnaryPredicate`] / [`predicate::PairPredicate`]: the
//!   declarative predicate trees constraint premises/conditions are built
//!   from.
//! - [`constraint::Constraint`] / [`groups::ConstraintGroups`]: a single
//!   constraint and the six-way grouping the sentence validator verifies
//!   in sequence.

pub mod config;
pub mod constraint;
pub mod error;
pub mod groups;
pub mod morphology;
pub mod pos;
pub mod predicate;
pub mod sentence;
pub mod token;
pub mod tree;

pub use config::{ConfigComponent, Direction, GrammaticalConfiguration, SyntacticDependency};
pub use constraint::{Constraint, ConstraintBody};
pub use error::{CoreError, CoreResult};
pub use groups::ConstraintGroups;
pub use morphology::{MorphFeatures, Morphology, ScoredMorphology, SingleMorphology};
pub use pos::{BasePos, Pos};
pub use predicate::{Capabilities, EvalContext, PairPredicate, UnaryPredicate};
pub use sentence::Sentence;
pub use token::{Position, SyntacticRelation, Token, TokenId, TokenKind, ROOT_ID};
pub use tree::{Arc, DependencyTree, TreeError};
