#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
//! # Canopy Solver
//!
//! The beam-search machinery (§4.3) and the three solvers built on it:
//! the labels solver (§4.4), the dependency-tree builder with its cycle
//! fixer (§4.5, §4.6), and the morphology solver (§4.7). The labeler /
//! morphology selector contract consumed by the labels solver is defined
//! in [`selector`] (§4.8).

pub mod beam;
pub mod config;
pub mod cycle_fixer;
pub mod error;
pub mod labels;
pub mod morphology_solver;
pub mod selector;
pub mod tree_builder;

pub use beam::{BeamManager, BeamProblem, State, StateElement};
pub use config::{SolverConfig, TreeStrategy};
pub use cycle_fixer::{compute_cycles, fix_cycles};
pub use error::{SolverError, SolverResult};
pub use labels::LabelsSolver;
pub use morphology_solver::MorphologySolver;
pub use selector::{attachment_direction, LabelerSelector, ScoredConfig};
pub use tree_builder::{DependencyTreeBuilder, ScoredArc};
