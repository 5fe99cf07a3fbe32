//! Tokens: the per-word unit the solvers assign morphologies and
//! grammatical configurations to.

use crate::config::GrammaticalConfiguration;
use crate::morphology::{Morphology, ScoredMorphology};
use serde::{Deserialize, Serialize};

/// Stable token identifier. Not necessarily dense or contiguous.
pub type TokenId = i64;

/// Sentinel governor id meaning "this token attaches to the root".
pub const ROOT_ID: TokenId = -1;

/// Character span and sentence-relative position of a token's surface form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Index of this token within the ordered sentence.
    pub index: usize,
    pub char_start: usize,
    pub char_end: usize,
}

/// Whether a token is a standalone word/trace or expands into components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Single,
    /// A composite surface token; `components` lists the ids of the
    /// single tokens it expands into, in order.
    Composite { components: Vec<TokenId> },
}

impl TokenKind {
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, TokenKind::Composite { .. })
    }
}

/// A token's syntactic relation to its governor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntacticRelation {
    pub governor: Option<TokenId>,
    pub label: String,
    pub attachment_score: f64,
}

impl SyntacticRelation {
    #[must_use]
    pub fn root(label: impl Into<String>, attachment_score: f64) -> Self {
        Self {
            governor: None,
            label: label.into(),
            attachment_score,
        }
    }

    #[must_use]
    pub fn attached(
        governor: TokenId,
        label: impl Into<String>,
        attachment_score: f64,
    ) -> Self {
        Self {
            governor: Some(governor),
            label: label.into(),
            attachment_score,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.governor.is_none()
    }
}

/// A token of the sentence: surface form, position, candidate morphologies,
/// chosen morphology/configuration, and syntactic relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub form: String,
    pub position: Position,
    pub kind: TokenKind,

    /// `allMorphologies[tokenId]`: the immutable full candidate list.
    all_morphologies: Vec<ScoredMorphology>,
    /// `validPosMorphologies[tokenId]`: the mutable, monotonically
    /// shrinking subset the validator prunes.
    valid_pos_morphologies: Vec<ScoredMorphology>,

    pub context_morphologies: Option<Vec<ScoredMorphology>>,
    pub chosen_morphology: Option<Morphology>,
    pub chosen_configuration: Option<GrammaticalConfiguration>,
    pub relation: Option<SyntacticRelation>,
}

impl Token {
    #[must_use]
    pub fn new(id: TokenId, form: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            form: form.into(),
            position,
            kind: TokenKind::Single,
            all_morphologies: Vec::new(),
            valid_pos_morphologies: Vec::new(),
            context_morphologies: None,
            chosen_morphology: None,
            chosen_configuration: None,
            relation: None,
        }
    }

    #[must_use]
    pub fn composite(id: TokenId, form: impl Into<String>, position: Position, components: Vec<TokenId>) -> Self {
        Self {
            kind: TokenKind::Composite { components },
            ..Self::new(id, form, position)
        }
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.kind.is_composite()
    }

    /// Installs the full candidate list and derives the initial
    /// `validPosMorphologies`: one representative (the highest-scoring)
    /// morphology per distinct base POS (§3).
    pub fn set_all_morphologies(&mut self, candidates: Vec<ScoredMorphology>) {
        self.all_morphologies = candidates;
        self.reset_valid_pos_morphologies();
    }

    #[must_use]
    pub fn all_morphologies(&self) -> &[ScoredMorphology] {
        &self.all_morphologies
    }

    #[must_use]
    pub fn valid_pos_morphologies(&self) -> &[ScoredMorphology] {
        &self.valid_pos_morphologies
    }

    /// Destructive, monotonic prune: keep only the candidates for which
    /// `keep` returns true.
    pub fn retain_valid_pos_morphologies(&mut self, mut keep: impl FnMut(&ScoredMorphology) -> bool) {
        self.valid_pos_morphologies.retain(|m| keep(m));
    }

    /// Restores `validPosMorphologies` to the one-representative-per-POS
    /// seed derived from the immutable `allMorphologies` backup (§3
    /// rollback-on-failure discipline). Candidates are ranked by score
    /// first, so the representative kept per base POS is always the
    /// highest-scoring one regardless of `allMorphologies`'s order.
    pub fn reset_valid_pos_morphologies(&mut self) {
        let mut candidates = self.all_morphologies.clone();
        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        let mut seen = std::collections::HashSet::new();
        self.valid_pos_morphologies = candidates
            .into_iter()
            .filter(|m| {
                let base = m.morphology.base_pos().map(|p| p.base);
                base.is_some_and(|b| seen.insert(b))
            })
            .collect();
    }

    /// Inserts a synthetic generic morphology for a token with zero
    /// candidates (§4.2 edge case: unknown word). The caller supplies the
    /// content-word POS the grammatical configuration demands.
    pub fn synthesize_generic_morphology(&mut self, pos: crate::pos::Pos) {
        use crate::morphology::SingleMorphology;
        let morphology = Morphology::single(SingleMorphology::new(self.form.clone(), pos));
        let scored = ScoredMorphology::new(morphology, 1.0);
        self.all_morphologies = vec![scored.clone()];
        self.valid_pos_morphologies = vec![scored];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::SingleMorphology;
    use crate::pos::{BasePos, Pos};

    fn scored(base: BasePos, score: f64) -> ScoredMorphology {
        ScoredMorphology::new(
            Morphology::single(SingleMorphology::new("x", Pos::new(base))),
            score,
        )
    }

    #[test]
    fn valid_pos_morphologies_seeds_one_per_base_pos() {
        let mut t = Token::new(1, "bank", Position { index: 0, char_start: 0, char_end: 4 });
        t.set_all_morphologies(vec![
            scored(BasePos::Noun, 0.9),
            scored(BasePos::Noun, 0.5),
            scored(BasePos::Verb, 0.7),
        ]);
        assert_eq!(t.valid_pos_morphologies().len(), 2);
    }

    #[test]
    fn valid_pos_morphologies_keeps_the_highest_scoring_candidate_even_when_listed_second() {
        let mut t = Token::new(1, "bank", Position { index: 0, char_start: 0, char_end: 4 });
        t.set_all_morphologies(vec![scored(BasePos::Noun, 0.5), scored(BasePos::Noun, 0.9)]);
        let kept = t.valid_pos_morphologies();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].score, 0.9);
    }

    #[test]
    fn retain_shrinks_monotonically() {
        let mut t = Token::new(1, "bank", Position { index: 0, char_start: 0, char_end: 4 });
        t.set_all_morphologies(vec![scored(BasePos::Noun, 0.9), scored(BasePos::Verb, 0.7)]);
        let before = t.valid_pos_morphologies().len();
        t.retain_valid_pos_morphologies(|m| m.morphology.base_pos().unwrap().base == BasePos::Noun);
        assert!(t.valid_pos_morphologies().len() <= before);
        assert_eq!(t.valid_pos_morphologies().len(), 1);
    }

    #[test]
    fn reset_restores_from_backup() {
        let mut t = Token::new(1, "bank", Position { index: 0, char_start: 0, char_end: 4 });
        t.set_all_morphologies(vec![scored(BasePos::Noun, 0.9), scored(BasePos::Verb, 0.7)]);
        t.retain_valid_pos_morphologies(|_| false);
        assert!(t.valid_pos_morphologies().is_empty());
        t.reset_valid_pos_morphologies();
        assert_eq!(t.valid_pos_morphologies().len(), 2);
    }
}
