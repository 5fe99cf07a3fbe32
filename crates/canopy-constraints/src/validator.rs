//! Sentence validator (§4.2): orchestrates verification in the six-group
//! order of §3, short-circuiting on the first group with any violation and
//! destructively, monotonically pruning `validPosMorphologies` as it goes.

use canopy_core::groups::ConstraintGroups;
use canopy_core::{Constraint, DependencyTree, EvalContext, ScoredMorphology, Sentence, TokenId};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::engine;

pub type Violations = IndexMap<TokenId, Vec<Constraint>>;

/// A pure function `(tokens, tree) -> overlays` enumerating plausible
/// context-morphology assignments (§6 "morphology percolator"). No
/// ordering guarantees are required of the returned overlays.
pub trait MorphologyPercolator {
    fn percolate(&self, sentence: &Sentence, tree: &DependencyTree) -> Vec<ContextOverlay>;
}

/// One candidate assignment of context morphologies, keyed by token id.
pub type ContextOverlay = HashMap<TokenId, Vec<ScoredMorphology>>;

/// Which of the six groups produced the returned violations, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStep {
    Simple,
    BaseMorphoUnary,
    BaseMorphoBinary,
    BaseMorphoOthers,
    MorphoPropertiesSimple,
    MorphoPropertiesContext,
}

pub struct SentenceValidator<'a> {
    catalogue: &'a [Constraint],
}

impl<'a> SentenceValidator<'a> {
    #[must_use]
    pub fn new(catalogue: &'a [Constraint]) -> Self {
        Self { catalogue }
    }

    /// Runs the full six-step pipeline, returning the first group's
    /// violations (deduplicated per token) or `None` if every group
    /// passes. Mutates `sentence`'s `validPosMorphologies` in place as
    /// steps 2-3 prune it.
    ///
    /// Explodes composite tokens first (§3): composites don't themselves
    /// participate in constraint checks, only their components do.
    #[tracing::instrument(skip_all)]
    pub fn validate(
        &self,
        sentence: &mut Sentence,
        tree: &mut DependencyTree,
        percolator: &dyn MorphologyPercolator,
    ) -> Option<(ValidationStep, Violations)> {
        sentence.explode_composites(tree);
        ensure_candidates(sentence, tree);

        let groups = ConstraintGroups::classify(self.catalogue);

        if let Some(v) = self.step_simple(&groups, sentence, tree) {
            return Some((ValidationStep::Simple, v));
        }
        if let Some(v) = self.step_base_morpho_unary(&groups, sentence, tree) {
            return Some((ValidationStep::BaseMorphoUnary, v));
        }
        if let Some(v) = self.step_base_morpho_binary(&groups, sentence, tree) {
            return Some((ValidationStep::BaseMorphoBinary, v));
        }
        if let Some(v) = self.step_base_morpho_others(&groups, sentence, tree) {
            return Some((ValidationStep::BaseMorphoOthers, v));
        }
        if let Some(v) = self.step_morpho_properties_simple(&groups, sentence, tree) {
            return Some((ValidationStep::MorphoPropertiesSimple, v));
        }
        if let Some(v) = self.step_morpho_properties_context(&groups, sentence, tree, percolator) {
            return Some((ValidationStep::MorphoPropertiesContext, v));
        }
        None
    }

    fn step_simple(&self, groups: &ConstraintGroups, sentence: &Sentence, tree: &DependencyTree) -> Option<Violations> {
        let ctx = EvalContext { sentence, tree };
        dedup_violations(group_violations(&groups.simple, sentence.ids(), &ctx))
    }

    /// §4.2 step 2: retain only morphologies that, installed as the sole
    /// chosen morphology, violate no `baseMorphoUnary` constraint.
    fn step_base_morpho_unary(
        &self,
        groups: &ConstraintGroups,
        sentence: &mut Sentence,
        tree: &DependencyTree,
    ) -> Option<Violations> {
        let mut violations: Violations = IndexMap::new();
        for token_id in sentence.ids() {
            let candidates = sentence.get(token_id).unwrap().valid_pos_morphologies().to_vec();
            let mut survivors = Vec::new();
            let mut bad_for_token: Vec<Constraint> = Vec::new();
            for candidate in candidates {
                sentence.get_mut(token_id).unwrap().chosen_morphology = Some(candidate.morphology.clone());
                let ctx = EvalContext { sentence, tree };
                let bad = verify_against(&groups.base_morpho_unary, token_id, &ctx);
                if bad.is_empty() {
                    survivors.push(candidate);
                } else {
                    bad_for_token.extend(bad);
                }
            }
            sentence
                .get_mut(token_id)
                .unwrap()
                .retain_valid_pos_morphologies(|m| survivors.contains(m));
            if !bad_for_token.is_empty() {
                violations.entry(token_id).or_insert_with(Vec::new).extend(bad_for_token);
            }
        }
        dedup_violations(violations)
    }

    /// §4.2 step 3: for every dependent-governor pair, enumerate the
    /// Cartesian product of their valid morphologies; a morphology
    /// survives if it appears in at least one jointly-valid pair.
    fn step_base_morpho_binary(
        &self,
        groups: &ConstraintGroups,
        sentence: &mut Sentence,
        tree: &DependencyTree,
    ) -> Option<Violations> {
        let mut survivors: HashMap<TokenId, HashSet<usize>> = HashMap::new();
        let mut touched: HashMap<TokenId, Vec<ScoredMorphology>> = HashMap::new();

        for dep_id in sentence.ids() {
            let Some(gov_id) = tree.arc(dep_id).and_then(|a| a.governor) else {
                continue;
            };
            let dep_candidates = sentence.get(dep_id).unwrap().valid_pos_morphologies().to_vec();
            let gov_candidates = sentence.get(gov_id).unwrap().valid_pos_morphologies().to_vec();
            touched.entry(dep_id).or_insert_with(|| dep_candidates.clone());
            touched.entry(gov_id).or_insert_with(|| gov_candidates.clone());

            for (i, dep_m) in dep_candidates.iter().enumerate() {
                for (j, gov_m) in gov_candidates.iter().enumerate() {
                    sentence.get_mut(dep_id).unwrap().chosen_morphology = Some(dep_m.morphology.clone());
                    sentence.get_mut(gov_id).unwrap().chosen_morphology = Some(gov_m.morphology.clone());
                    let ctx = EvalContext { sentence, tree };
                    let bad = verify_against(&groups.base_morpho_binary, dep_id, &ctx);
                    if bad.is_empty() {
                        survivors.entry(dep_id).or_default().insert(i);
                        survivors.entry(gov_id).or_default().insert(j);
                    }
                }
            }
        }

        let mut violations: Violations = IndexMap::new();
        for (token_id, candidates) in &touched {
            let kept = survivors.get(token_id).cloned().unwrap_or_default();
            sentence
                .get_mut(*token_id)
                .unwrap()
                .retain_valid_pos_morphologies(|m| {
                    candidates
                        .iter()
                        .position(|c| c == m)
                        .is_some_and(|idx| kept.contains(&idx))
                });
            if sentence.get(*token_id).unwrap().valid_pos_morphologies().is_empty() {
                violations
                    .entry(*token_id)
                    .or_insert_with(Vec::new)
                    .extend(groups.base_morpho_binary.iter().map(|c| (*c).clone()));
            }
        }
        dedup_violations(violations)
    }

    /// §4.2 step 4: enumerate full sentence morphology configurations
    /// (lazily), stopping at the first that violates any
    /// `baseMorphoOthers` constraint.
    fn step_base_morpho_others(
        &self,
        groups: &ConstraintGroups,
        sentence: &mut Sentence,
        tree: &DependencyTree,
    ) -> Option<Violations> {
        if groups.base_morpho_others.is_empty() {
            return None;
        }
        let token_ids = sentence.ids();
        let candidate_sets: Vec<Vec<ScoredMorphology>> = token_ids
            .iter()
            .map(|id| sentence.get(*id).unwrap().valid_pos_morphologies().to_vec())
            .collect();

        let mut violations: Violations = IndexMap::new();
        'config: for assignment in cartesian_product(&candidate_sets) {
            for (id, morph) in token_ids.iter().zip(assignment.iter()) {
                sentence.get_mut(*id).unwrap().chosen_morphology = Some(morph.morphology.clone());
            }
            let ctx = EvalContext { sentence, tree };
            for &token_id in &token_ids {
                let bad = verify_against(&groups.base_morpho_others, token_id, &ctx);
                if !bad.is_empty() {
                    violations
                        .entry(token_id)
                        .or_insert_with(Vec::new)
                        .extend(bad);
                    break 'config;
                }
            }
        }
        dedup_violations(violations)
    }

    fn step_morpho_properties_simple(
        &self,
        groups: &ConstraintGroups,
        sentence: &Sentence,
        tree: &DependencyTree,
    ) -> Option<Violations> {
        let ctx = EvalContext { sentence, tree };
        dedup_violations(group_violations(&groups.morpho_properties_simple, sentence.ids(), &ctx))
    }

    /// §4.2 step 6: ask the external percolator for context overlays,
    /// install each, and verify context constraints.
    fn step_morpho_properties_context(
        &self,
        groups: &ConstraintGroups,
        sentence: &mut Sentence,
        tree: &DependencyTree,
        percolator: &dyn MorphologyPercolator,
    ) -> Option<Violations> {
        if groups.morpho_properties_context.is_empty() {
            return None;
        }
        let overlays = percolator.percolate(sentence, tree);
        let mut violations: Violations = IndexMap::new();
        for overlay in overlays {
            for (token_id, context_morphologies) in &overlay {
                if let Some(token) = sentence.get_mut(*token_id) {
                    token.context_morphologies = Some(context_morphologies.clone());
                }
            }
            let ctx = EvalContext { sentence, tree };
            let found = group_violations(&groups.morpho_properties_context, sentence.ids(), &ctx);
            for (token_id, bad) in found {
                violations.entry(token_id).or_insert_with(Vec::new).extend(bad);
            }
        }
        dedup_violations(violations)
    }
}

/// Inserts a synthetic generic morphology for tokens with zero candidates
/// (§4.2 edge case: unknown word), using the content-word POS demanded by
/// the chosen configuration.
fn ensure_candidates(sentence: &mut Sentence, _tree: &DependencyTree) {
    for token in sentence.iter_mut() {
        if !token.all_morphologies().is_empty() {
            continue;
        }
        let Some(config) = &token.chosen_configuration else {
            continue;
        };
        let Some(pos) = config.components().first().and_then(|c| c.pos.clone()) else {
            continue;
        };
        if !pos.base.is_content_word() {
            continue;
        }
        warn!(token.id, "token has no candidate morphology; synthesizing a generic one");
        token.synthesize_generic_morphology(pos);
    }
}

fn group_violations(
    group: &[&Constraint],
    token_ids: Vec<TokenId>,
    ctx: &EvalContext,
) -> Violations {
    let mut out = IndexMap::new();
    for token_id in token_ids {
        let bad = verify_against(group, token_id, ctx);
        if !bad.is_empty() {
            out.insert(token_id, bad);
        }
    }
    out
}

/// The subset of `group` violated at `token_id`, cloned out of the
/// catalogue so callers can accumulate them independently of the
/// catalogue's lifetime.
fn verify_against(group: &[&Constraint], token_id: TokenId, ctx: &EvalContext) -> Vec<Constraint> {
    group
        .iter()
        .filter(|c| !engine::is_verified(c, token_id, ctx))
        .map(|c| (*c).clone())
        .collect()
}

fn dedup_violations(mut violations: Violations) -> Option<Violations> {
    if violations.is_empty() {
        return None;
    }
    for constraints in violations.values_mut() {
        let mut seen = HashSet::new();
        constraints.retain(|c| seen.insert(c.description.clone()));
    }
    Some(violations)
}

fn cartesian_product(sets: &[Vec<ScoredMorphology>]) -> Vec<Vec<ScoredMorphology>> {
    sets.iter().fold(vec![Vec::new()], |acc, set| {
        acc.into_iter()
            .flat_map(|prefix| {
                set.iter().map(move |item| {
                    let mut next = prefix.clone();
                    next.push(item.clone());
                    next
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::pos::{BasePos, Pos};
    use canopy_core::predicate::UnaryPredicate;
    use canopy_core::token::Position;
    use canopy_core::{ConstraintBody, Morphology, SingleMorphology, SyntacticRelation, Token};

    struct NoOverlays;
    impl MorphologyPercolator for NoOverlays {
        fn percolate(&self, _sentence: &Sentence, _tree: &DependencyTree) -> Vec<ContextOverlay> {
            Vec::new()
        }
    }

    fn scored(base: BasePos, with_number: bool) -> ScoredMorphology {
        use canopy_core::morphology::MorphFeatures;
        use canopy_core::pos::UdNumber;
        let mut feats = MorphFeatures::default();
        if with_number {
            feats.number = Some(UdNumber::Singular);
        }
        ScoredMorphology::new(
            Morphology::single(SingleMorphology::new("x", Pos::new(base)).with_feats(feats)),
            1.0,
        )
    }

    fn token(id: TokenId, morphologies: Vec<ScoredMorphology>) -> Token {
        let mut t = Token::new(id, "x", Position { index: 0, char_start: 0, char_end: 1 });
        t.set_all_morphologies(morphologies);
        t.relation = Some(SyntacticRelation::root("root", 1.0));
        t
    }

    #[test]
    fn scenario_1_unary_hard_rejection_surfaces_at_first_nonempty_group() {
        // Tokens [cat:NOUN (no Number feature), runs:VERB]; a hard
        // constraint requires nouns to carry a Number feature.
        let cat = token(1, vec![scored(BasePos::Noun, false)]);
        let runs = token(2, vec![scored(BasePos::Verb, true)]);
        let mut sentence = Sentence::new(vec![cat, runs]);
        let mut tree = DependencyTree::new();

        let constraint = Constraint::new(
            "NOUN-has-number",
            0.0,
            1.0,
            ConstraintBody::Unary {
                premise: UnaryPredicate::HasBasePos { pos: BasePos::Noun },
                condition: UnaryPredicate::HasFeature { name: "Number".into() },
            },
        )
        .unwrap();
        let catalogue = vec![constraint];

        let validator = SentenceValidator::new(&catalogue);
        let (_, violations) = validator.validate(&mut sentence, &mut tree, &NoOverlays).unwrap();
        assert_eq!(violations.get(&1).map(Vec::len), Some(1));
        assert!(!violations.contains_key(&2));
    }

    #[test]
    fn scenario_6_short_circuits_on_earliest_failing_group() {
        let a = token(1, vec![scored(BasePos::Det, false)]);
        let mut sentence = Sentence::new(vec![a]);
        let mut tree = DependencyTree::new();

        let simple = Constraint::new(
            "never-root",
            0.0,
            1.0,
            ConstraintBody::Unary {
                premise: UnaryPredicate::True,
                condition: UnaryPredicate::Not(Box::new(UnaryPredicate::IsRoot)),
            },
        )
        .unwrap();
        let context = Constraint::new(
            "context-has-case",
            0.0,
            1.0,
            ConstraintBody::Unary {
                premise: UnaryPredicate::True,
                condition: UnaryPredicate::ContextHasFeature { name: "Case".into() },
            },
        )
        .unwrap();
        let catalogue = vec![simple, context];

        let validator = SentenceValidator::new(&catalogue);
        let (step, violations) = validator.validate(&mut sentence, &mut tree, &NoOverlays).unwrap();
        assert_eq!(step, ValidationStep::Simple);
        assert_eq!(violations.get(&1).map(Vec::len), Some(1));
        assert_eq!(violations[&1][0].description, "never-root");
    }
}
