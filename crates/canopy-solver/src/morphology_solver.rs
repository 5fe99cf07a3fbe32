//! Morphology solver (§4.7): once labels are fixed, enumerates each
//! token's candidate morphologies and returns the ones that survive every
//! hard constraint, scored by candidate confidence times cumulative soft
//! penalty.
//!
//! §4.7 describes this as running "via Beam Manager", but the operation
//! is an enumerate-and-filter over every candidate (there is no single
//! best state to converge on — every survivor is kept), so this reuses
//! the same install-evaluate-restore discipline the sentence validator's
//! per-token steps use (`canopy_constraints::validator`) rather than the
//! beam machinery built for single-winner search (see DESIGN.md).

use canopy_core::{Constraint, DependencyTree, EvalContext, ScoredMorphology, Sentence, TokenId};
use std::collections::HashMap;
use tracing::debug;

pub struct MorphologySolver<'a> {
    catalogue: &'a [Constraint],
}

impl<'a> MorphologySolver<'a> {
    #[must_use]
    pub fn new(catalogue: &'a [Constraint]) -> Self {
        Self { catalogue }
    }

    /// For every token, returns the candidate morphologies that violate no
    /// hard constraint, each rescored by its cumulative soft penalty.
    #[tracing::instrument(skip_all)]
    pub fn solve(&self, sentence: &mut Sentence, tree: &DependencyTree) -> HashMap<TokenId, Vec<ScoredMorphology>> {
        let mut surviving: HashMap<TokenId, Vec<ScoredMorphology>> = HashMap::new();
        for token_id in sentence.ids() {
            let candidates = sentence.get(token_id).unwrap().all_morphologies().to_vec();
            let mut kept = Vec::new();
            for candidate in candidates {
                sentence.get_mut(token_id).unwrap().chosen_morphology = Some(candidate.morphology.clone());
                let ctx = EvalContext { sentence: &*sentence, tree };
                let violated = canopy_constraints::verify(self.catalogue, token_id, &ctx);
                if violated.iter().any(|c| c.is_hard()) {
                    continue;
                }
                let penalty: f64 = violated.iter().map(|c| c.penalty).product();
                kept.push(ScoredMorphology::new(candidate.morphology, candidate.score * penalty));
            }
            debug!(token_id, survivors = kept.len(), "morphology solver finished token");
            surviving.insert(token_id, kept);
        }
        surviving
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::morphology::{Morphology, SingleMorphology};
    use canopy_core::pos::{BasePos, Pos};
    use canopy_core::predicate::UnaryPredicate;
    use canopy_core::token::Position;
    use canopy_core::{ConstraintBody, SyntacticRelation, Token};

    fn scored(base: BasePos, score: f64) -> ScoredMorphology {
        ScoredMorphology::new(Morphology::single(SingleMorphology::new("x", Pos::new(base))), score)
    }

    #[test]
    fn solve_drops_candidates_that_violate_a_hard_constraint() {
        let mut token = Token::new(1, "x", Position { index: 0, char_start: 0, char_end: 1 });
        token.set_all_morphologies(vec![scored(BasePos::Noun, 0.9), scored(BasePos::Verb, 0.8)]);
        token.relation = Some(SyntacticRelation::root("root", 1.0));
        let mut sentence = Sentence::new(vec![token]);
        let tree = DependencyTree::new();

        let hard = Constraint::new(
            "never-verb",
            0.0,
            1.0,
            ConstraintBody::Unary {
                premise: UnaryPredicate::True,
                condition: UnaryPredicate::Not(Box::new(UnaryPredicate::HasBasePos { pos: BasePos::Verb })),
            },
        )
        .unwrap();
        let catalogue = vec![hard];

        let solver = MorphologySolver::new(&catalogue);
        let survivors = solver.solve(&mut sentence, &tree);
        let kept = &survivors[&1];
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].morphology.base_pos().unwrap().base, BasePos::Noun);
    }

    #[test]
    fn solve_rescales_score_by_soft_penalty() {
        let mut token = Token::new(1, "x", Position { index: 0, char_start: 0, char_end: 1 });
        token.set_all_morphologies(vec![scored(BasePos::Noun, 0.8)]);
        token.relation = Some(SyntacticRelation::root("root", 1.0));
        let mut sentence = Sentence::new(vec![token]);
        let tree = DependencyTree::new();

        let soft = Constraint::new(
            "prefer-not-noun",
            0.5,
            1.0,
            ConstraintBody::Unary {
                premise: UnaryPredicate::True,
                condition: UnaryPredicate::Not(Box::new(UnaryPredicate::HasBasePos { pos: BasePos::Noun })),
            },
        )
        .unwrap();
        let catalogue = vec![soft];

        let solver = MorphologySolver::new(&catalogue);
        let survivors = solver.solve(&mut sentence, &tree);
        let kept = &survivors[&1];
        assert_eq!(kept.len(), 1);
        assert!((kept[0].score - 0.4).abs() < 1e-9);
    }
}
