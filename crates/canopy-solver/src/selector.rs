//! Labeler / morphology selector (§4.8): the pluggable capability the
//! labels solver and morphology lookups consume. Implementations typically
//! wrap an external labeler/tagger; canopy-solver ships no implementation
//! of its own, only the contract and the synthesis fallbacks it demands.

use canopy_core::config::{Direction, GrammaticalConfiguration};
use canopy_core::morphology::Morphology;
use canopy_core::{Sentence, TokenId};

/// A grammatical configuration paired with the selector's score for it.
pub type ScoredConfig = (GrammaticalConfiguration, f64);

/// §4.8's external capability: filtering candidate configurations and
/// morphologies down to what's actually compatible, with synthesis
/// fallbacks when nothing survives.
pub trait LabelerSelector {
    /// Filters `configurations` to those whose direction matches the
    /// attachment from `token_index` to `head_index`, keeping only ones
    /// compatible with some candidate morphology of the token (or, absent
    /// any match, single-content-word configurations); synthesizes an
    /// "unknown-noun" configuration with the worst observed score if
    /// everything is filtered out.
    fn valid_configurations(
        &self,
        configurations: &[ScoredConfig],
        sentence: &Sentence,
        token_index: TokenId,
        head_index: Option<TokenId>,
    ) -> Vec<ScoredConfig>;

    /// Intersects a token's candidate morphologies with `config`
    /// compatibility; synthesizes a single generic morphology when the
    /// configuration is single-component with a content-word POS and
    /// nothing else survives, else returns empty.
    fn valid_morphologies(
        &self,
        sentence: &Sentence,
        token_index: TokenId,
        config: &GrammaticalConfiguration,
    ) -> Vec<Morphology>;
}

/// The direction an attachment from `token_index` to `head_index` implies,
/// used by [`LabelerSelector::valid_configurations`] implementations.
#[must_use]
pub fn attachment_direction(token_index: TokenId, head_index: Option<TokenId>) -> Direction {
    match head_index {
        None => Direction::Root,
        Some(head) if head > token_index => Direction::Right,
        Some(_) => Direction::Left,
    }
}
