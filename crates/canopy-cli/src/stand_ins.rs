//! Local stand-ins for the two external capabilities §4.8 and §4.2 model
//! as trait boundaries (the real labeler/tagger and context-morphology
//! percolator are neural components, out of scope per §1). The CLI's
//! `solve`/`validate` subcommands need *some* implementation to run
//! against, so these pass their input straight through: every candidate
//! the wire input names is already assumed compatible, and there is no
//! context percolation without a real tagger behind it.

use canopy_constraints::validator::{ContextOverlay, MorphologyPercolator};
use canopy_core::config::GrammaticalConfiguration;
use canopy_core::morphology::Morphology;
use canopy_core::{DependencyTree, Sentence, TokenId};
use canopy_solver::selector::{LabelerSelector, ScoredConfig};

pub struct PassthroughSelector;

impl LabelerSelector for PassthroughSelector {
    fn valid_configurations(
        &self,
        configurations: &[ScoredConfig],
        _sentence: &Sentence,
        _token_index: TokenId,
        _head_index: Option<TokenId>,
    ) -> Vec<ScoredConfig> {
        configurations.to_vec()
    }

    fn valid_morphologies(
        &self,
        _sentence: &Sentence,
        _token_index: TokenId,
        _config: &GrammaticalConfiguration,
    ) -> Vec<Morphology> {
        Vec::new()
    }
}

pub struct NoContextPercolator;

impl MorphologyPercolator for NoContextPercolator {
    fn percolate(&self, _sentence: &Sentence, _tree: &DependencyTree) -> Vec<ContextOverlay> {
        Vec::new()
    }
}
