//! Constraint engine (§4.1): evaluates a single constraint over one token
//! or a dependent-governor pair, and fans verification out across a
//! sentence. Pure function of its inputs — no retries, no state.

use canopy_core::{Constraint, EvalContext, TokenId};
use indexmap::IndexMap;

/// `isVerified` (§4.1): resolves the token's governor from the tree (for
/// binary constraints; ignored for unary ones) and checks the constraint.
#[must_use]
pub fn is_verified(constraint: &Constraint, token_id: TokenId, ctx: &EvalContext) -> bool {
    let governor_id = ctx.tree.arc(token_id).and_then(|arc| arc.governor);
    constraint.is_verified(token_id, governor_id, ctx)
}

/// `verify` (§4.1): the subset of `constraints` violated at `token_id`, in
/// catalogue order.
#[must_use]
pub fn verify<'a>(constraints: &'a [Constraint], token_id: TokenId, ctx: &EvalContext) -> Vec<&'a Constraint> {
    constraints
        .iter()
        .filter(|c| !is_verified(c, token_id, ctx))
        .collect()
}

/// `verifyAll` (§4.1): fans `verify` out across every token of the
/// sentence, in sentence (surface) order, keeping only tokens with at
/// least one violation.
#[must_use]
pub fn verify_all<'a>(
    constraints: &'a [Constraint],
    ctx: &EvalContext,
) -> IndexMap<TokenId, Vec<&'a Constraint>> {
    let mut out = IndexMap::new();
    for token_id in ctx.sentence.ids() {
        let violations = verify(constraints, token_id, ctx);
        if !violations.is_empty() {
            out.insert(token_id, violations);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::pos::BasePos;
    use canopy_core::predicate::{PairPredicate, UnaryPredicate};
    use canopy_core::token::Position;
    use canopy_core::{ConstraintBody, DependencyTree, Morphology, Pos, Sentence, SingleMorphology, SyntacticRelation, Token};

    fn noun_token(id: TokenId) -> Token {
        let mut t = Token::new(id, "x", Position { index: 0, char_start: 0, char_end: 1 });
        t.chosen_morphology = Some(Morphology::single(SingleMorphology::new("x", Pos::new(BasePos::Noun))));
        t.relation = Some(SyntacticRelation::root("root", 1.0));
        t
    }

    #[test]
    fn verify_all_reports_only_violating_tokens() {
        let constraint = Constraint::new(
            "is-not-verb",
            0.0,
            1.0,
            ConstraintBody::Unary {
                premise: UnaryPredicate::True,
                condition: UnaryPredicate::Not(Box::new(UnaryPredicate::HasBasePos { pos: BasePos::Verb })),
            },
        )
        .unwrap();
        let sentence = Sentence::new(vec![noun_token(1)]);
        let tree = DependencyTree::new();
        let ctx = EvalContext { sentence: &sentence, tree: &tree };
        let violations = verify_all(std::slice::from_ref(&constraint), &ctx);
        assert!(violations.is_empty());
    }

    #[test]
    fn verify_all_uses_tree_governor_for_binary_constraints() {
        let constraint = Constraint::new(
            "dependent-is-noun",
            0.0,
            1.0,
            ConstraintBody::Binary {
                premise: PairPredicate::default(),
                condition: PairPredicate {
                    dependent: Some(UnaryPredicate::HasBasePos { pos: BasePos::Noun }),
                    governor: None,
                },
            },
        )
        .unwrap();
        let sentence = Sentence::new(vec![noun_token(1), noun_token(2)]);
        let mut tree = DependencyTree::new();
        tree.set_arc(2, None, "root", 1.0).unwrap();
        tree.set_arc(1, Some(2), "nsubj", 0.9).unwrap();
        let ctx = EvalContext { sentence: &sentence, tree: &tree };
        let violations = verify(std::slice::from_ref(&constraint), 1, &ctx);
        assert!(violations.is_empty());
    }
}
