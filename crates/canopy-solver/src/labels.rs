//! Labels solver (§4.4): beam-searches over each token's pre-filtered
//! candidate grammatical configurations, scoring a state by materializing
//! it into a sentence/tree and running the constraint catalogue over it.

use crate::beam::{BeamManager, BeamProblem, State};
use crate::selector::{LabelerSelector, ScoredConfig};
use canopy_core::config::GrammaticalConfiguration;
use canopy_core::{Constraint, DependencyTree, EvalContext, Sentence, TokenId};
use std::collections::{HashMap, HashSet};
use tracing::info;

pub struct LabelsSolver<'a> {
    catalogue: &'a [Constraint],
}

struct LabelsProblem<'p> {
    catalogue: &'p [Constraint],
    token_order: Vec<TokenId>,
    candidates: HashMap<TokenId, Vec<ScoredConfig>>,
    base_tree: DependencyTree,
    base_sentence: Sentence,
}

impl BeamProblem for LabelsProblem<'_> {
    type Value = GrammaticalConfiguration;

    fn element_ids(&self) -> Vec<TokenId> {
        self.token_order.clone()
    }

    fn values_for(&self, element_id: TokenId) -> &[ScoredConfig] {
        self.candidates
            .get(&element_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// §4.4 steps 1-5: write configurations into the tree, explode
    /// composites, run the catalogue, and accumulate hard invalidation /
    /// soft penalty per token.
    fn evaluate(&self, state: &mut State<GrammaticalConfiguration>) -> (f64, bool) {
        let mut sentence = self.base_sentence.clone();
        let mut tree = self.base_tree.clone();

        for element in &state.elements {
            if let Some(arc) = tree.arc(element.element_id).cloned() {
                let label = element
                    .value
                    .components()
                    .last()
                    .map(|c| c.dependency.label.clone())
                    .unwrap_or_else(|| "dep".to_string());
                let _ = tree.set_arc(element.element_id, arc.governor, label.clone(), arc.score);
                if let Some(token) = sentence.get_mut(element.element_id) {
                    token.chosen_configuration = Some(element.value.clone());
                    token.relation = Some(match arc.governor {
                        Some(governor) => canopy_core::SyntacticRelation::attached(governor, label, arc.score),
                        None => canopy_core::SyntacticRelation::root(label, arc.score),
                    });
                }
            }
        }

        sentence.explode_composites(&mut tree);

        let ctx = EvalContext {
            sentence: &sentence,
            tree: &tree,
        };
        let violations = canopy_constraints::verify_all(self.catalogue, &ctx);

        let mut invalid: HashSet<TokenId> = HashSet::new();
        let mut penalties: HashMap<TokenId, f64> = HashMap::new();
        for (token_id, violated) in &violations {
            for constraint in violated {
                if constraint.is_hard() {
                    invalid.insert(*token_id);
                } else {
                    *penalties.entry(*token_id).or_insert(1.0) *= constraint.penalty;
                }
            }
        }

        let mut score = 0.0;
        for element in &state.elements {
            let base_score = self
                .candidates
                .get(&element.element_id)
                .and_then(|c| c.get(element.index))
                .map(|(_, s)| *s)
                .unwrap_or(0.0);
            let attachment_score = tree.arc(element.element_id).map(|a| a.score).unwrap_or(0.0);
            let penalty = penalties.get(&element.element_id).copied().unwrap_or(1.0);
            score += base_score * penalty * attachment_score;
        }

        let is_valid = state.elements.iter().all(|e| !invalid.contains(&e.element_id));
        (score, is_valid)
    }
}

impl<'a> LabelsSolver<'a> {
    #[must_use]
    pub fn new(catalogue: &'a [Constraint]) -> Self {
        Self { catalogue }
    }

    /// Runs the beam search and writes the winning configurations back
    /// into `sentence`/`tree`. Falls back to an "unknown" stand-in
    /// configuration for any still-invalid element of the best-overall
    /// state when no fully valid state was found (§4.4).
    #[tracing::instrument(skip_all)]
    pub fn solve(
        &self,
        sentence: &mut Sentence,
        tree: &mut DependencyTree,
        selector: &dyn LabelerSelector,
        scored_configs: &HashMap<TokenId, Vec<ScoredConfig>>,
        beam_width: Option<usize>,
        fork_width: Option<usize>,
        max_iterations: Option<usize>,
    ) {
        let token_order = tree.ids();
        let mut candidates = HashMap::new();
        for &token_id in &token_order {
            let raw = scored_configs.get(&token_id).cloned().unwrap_or_default();
            let head_index = tree.arc(token_id).and_then(|a| a.governor);
            let filtered = selector.valid_configurations(&raw, sentence, token_id, head_index);
            candidates.insert(token_id, filtered);
        }

        let problem = LabelsProblem {
            catalogue: self.catalogue,
            token_order: token_order.clone(),
            candidates,
            base_tree: tree.clone(),
            base_sentence: sentence.clone(),
        };
        let mut manager = BeamManager::new(&problem, beam_width, fork_width, max_iterations);
        manager.run();

        let best = manager
            .best(true)
            .or_else(|| manager.best(false))
            .expect("beam search always retains at least its seed state");
        let has_valid = manager.best(true).is_some();

        for element in &best.elements {
            let config = if has_valid {
                element.value.clone()
            } else {
                let direction = element.value.direction();
                GrammaticalConfiguration::all_unknown(direction, element.value.components().len())
            };
            if let Some(arc) = tree.arc(element.element_id).cloned() {
                let label = config
                    .components()
                    .last()
                    .map(|c| c.dependency.label.clone())
                    .unwrap_or_else(|| "dep".to_string());
                let _ = tree.set_arc(element.element_id, arc.governor, label.clone(), arc.score);
                if let Some(token) = sentence.get_mut(element.element_id) {
                    token.chosen_configuration = Some(config.clone());
                    token.relation = Some(match arc.governor {
                        Some(governor) => canopy_core::SyntacticRelation::attached(governor, label, arc.score),
                        None => canopy_core::SyntacticRelation::root(label, arc.score),
                    });
                }
            }
        }
        tree.score = best.score;
        info!(score = best.score, valid = has_valid, "labels solver finished");
    }
}
