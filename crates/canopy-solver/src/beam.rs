//! Generic beam manager (§4.3). Bounds `beam_width` (`B`), `fork_width`
//! (`F`) and `max_iterations` (`I`) are `None` for "unbounded", matching
//! the spec's negative-means-unbounded convention translated to `Option`.

use canopy_core::TokenId;
use std::collections::HashSet;

/// One element's chosen value within a [`State`]: which sorted-list index
/// is currently selected.
#[derive(Debug, Clone)]
pub struct StateElement<V> {
    pub element_id: TokenId,
    pub value: V,
    pub index: usize,
}

/// A candidate configuration over every element, plus the subclass-computed
/// score and validity.
#[derive(Debug, Clone)]
pub struct State<V> {
    pub elements: Vec<StateElement<V>>,
    pub score: f64,
    pub is_valid: bool,
    pub forked: bool,
}

impl<V> State<V> {
    #[must_use]
    pub fn value_of(&self, element_id: TokenId) -> Option<&V> {
        self.elements.iter().find(|e| e.element_id == element_id).map(|e| &e.value)
    }

    fn index_key(&self) -> Vec<usize> {
        self.elements.iter().map(|e| e.index).collect()
    }
}

/// A concrete beam-search problem: the per-element candidate lists and the
/// scoring/validity function run over a full state (§4.3, §4.4-§4.7 use
/// this to plug in constraint checks, tree materialization, etc).
pub trait BeamProblem {
    type Value: Clone;

    /// Element ids, in a stable order used to build the initial state.
    fn element_ids(&self) -> Vec<TokenId>;

    /// Candidate values for one element, sorted by descending score. Must
    /// be non-empty.
    fn values_for(&self, element_id: TokenId) -> &[(Self::Value, f64)];

    /// Evaluates a fully-materialized state, returning its score and
    /// whether it is valid. May mutate `state`'s elements in place (e.g.
    /// to record which candidates survived hard constraints) per the
    /// resource-rollback discipline of §5.
    fn evaluate(&self, state: &mut State<Self::Value>) -> (f64, bool);
}

/// Orchestrates §4.3's beam search over a [`BeamProblem`].
pub struct BeamManager<'a, P: BeamProblem> {
    problem: &'a P,
    beam_width: Option<usize>,
    fork_width: Option<usize>,
    max_iterations: Option<usize>,
    beam: Vec<State<P::Value>>,
    visited: HashSet<Vec<usize>>,
    valid_states_only: bool,
}

impl<'a, P: BeamProblem> BeamManager<'a, P> {
    #[must_use]
    pub fn new(
        problem: &'a P,
        beam_width: Option<usize>,
        fork_width: Option<usize>,
        max_iterations: Option<usize>,
    ) -> Self {
        Self {
            problem,
            beam_width,
            fork_width,
            max_iterations,
            beam: Vec::new(),
            visited: HashSet::new(),
            valid_states_only: false,
        }
    }

    /// Seeds the beam with a single state picking the top-scoring value
    /// for every element.
    pub fn initialize(&mut self) {
        let element_ids = self.problem.element_ids();
        let mut elements = Vec::with_capacity(element_ids.len());
        for element_id in element_ids {
            let values = self.problem.values_for(element_id);
            let (value, _) = values.first().expect("beam element must have at least one candidate");
            elements.push(StateElement {
                element_id,
                value: value.clone(),
                index: 0,
            });
        }
        let mut state = State {
            elements,
            score: 0.0,
            is_valid: false,
            forked: false,
        };
        self.mark_visited(&state);
        let (score, is_valid) = self.problem.evaluate(&mut state);
        state.score = score;
        state.is_valid = is_valid;
        if is_valid {
            self.valid_states_only = true;
        }
        self.beam.push(state);
    }

    fn mark_visited(&mut self, state: &State<P::Value>) -> bool {
        self.visited.insert(state.index_key())
    }

    /// Next-step cost for element `index` within `state`: the descending
    /// score drop to its next candidate, or `1.0` if already at the last
    /// value (§4.3 ordering note).
    fn next_step_cost(&self, state: &State<P::Value>, element_index: usize) -> f64 {
        let element = &state.elements[element_index];
        let values = self.problem.values_for(element.element_id);
        if element.index + 1 >= values.len() {
            return 1.0;
        }
        let (_, current_score) = &values[element.index];
        let (_, next_score) = &values[element.index + 1];
        current_score - next_score
    }

    /// Produces up to `fork_width` successor states, each replacing one
    /// element's value with its next-lower candidate, ordered so elements
    /// with the smallest next-step cost fork first.
    fn fork(&mut self, state_index: usize) -> Vec<State<P::Value>> {
        let state = self.beam[state_index].clone();
        let mut forkable: Vec<usize> = (0..state.elements.len())
            .filter(|&i| {
                let element = &state.elements[i];
                element.index + 1 < self.problem.values_for(element.element_id).len()
            })
            .collect();
        forkable.sort_by(|&a, &b| {
            self.next_step_cost(&state, a)
                .partial_cmp(&self.next_step_cost(&state, b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(fork_width) = self.fork_width {
            forkable.truncate(fork_width);
        }

        let mut successors = Vec::with_capacity(forkable.len());
        for element_index in forkable {
            let mut next = state.clone();
            next.forked = false;
            let element = &mut next.elements[element_index];
            element.index += 1;
            let values = self.problem.values_for(element.element_id);
            element.value = values[element.index].0.clone();
            successors.push(next);
        }
        self.beam[state_index].forked = true;
        successors
    }

    /// Runs one round: forks every unforked state, admits valid successors
    /// into the beam (capped at `beam_width`, deduplicated), and flips
    /// `valid_states_only` the first time a forked state is valid. Returns
    /// the number of genuinely new states admitted.
    pub fn step(&mut self) -> usize {
        let unforked: Vec<usize> = self
            .beam
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.forked)
            .map(|(i, _)| i)
            .collect();

        let mut candidates = Vec::new();
        for state_index in unforked {
            candidates.extend(self.fork(state_index));
        }

        let mut admitted = 0;
        let mut newly_valid = false;
        for mut candidate in candidates {
            if !self.mark_visited(&candidate) {
                continue;
            }
            let (score, is_valid) = self.problem.evaluate(&mut candidate);
            candidate.score = score;
            candidate.is_valid = is_valid;
            if is_valid && !self.valid_states_only {
                newly_valid = true;
            }
            self.beam.push(candidate);
            admitted += 1;
        }

        if newly_valid {
            self.valid_states_only = true;
            self.beam.retain(|s| s.is_valid);
        }

        self.beam.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        if let Some(beam_width) = self.beam_width {
            self.beam.truncate(beam_width);
        }

        admitted
    }

    /// Runs `initialize()` then `step()` up to `max_iterations` times or
    /// until a round admits nothing new. Idempotent to call once; callers
    /// that need both the best-valid and best-overall state should call
    /// this once and then [`BeamManager::best`] twice rather than calling
    /// [`BeamManager::find_best_configuration`] twice, which would
    /// re-seed the beam on top of the previous run.
    pub fn run(&mut self) {
        self.initialize();
        let mut iterations = 0;
        loop {
            if let Some(max) = self.max_iterations {
                if iterations >= max {
                    break;
                }
            }
            let admitted = self.step();
            iterations += 1;
            if admitted == 0 {
                break;
            }
        }
    }

    /// The highest-scoring state currently in the beam: valid-only when
    /// `only_valid`, else overall. Call after [`BeamManager::run`].
    #[must_use]
    pub fn best(&self, only_valid: bool) -> Option<State<P::Value>> {
        self.beam
            .iter()
            .filter(|s| !only_valid || s.is_valid)
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
            .cloned()
    }

    /// Runs the search and returns the best state: the highest-scoring
    /// valid state when `only_valid`, else the highest-scoring state
    /// overall (§4.3).
    pub fn find_best_configuration(&mut self, only_valid: bool) -> Option<State<P::Value>> {
        self.run();
        self.best(only_valid)
    }
}
