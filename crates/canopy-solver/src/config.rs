//! Solver configuration (§2): beam bounds and the tree-build strategy
//! toggle, serializable so the CLI can load it from a file alongside the
//! sentence/catalogue/matrix inputs.

use serde::{Deserialize, Serialize};

/// How [`crate::tree_builder::DependencyTreeBuilder`] should be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeStrategy {
    /// Full beam search over the arc matrix (§4.5).
    Beam,
    /// Greedy governor-per-dependent assignment followed by
    /// [`crate::cycle_fixer::fix_cycles`] (§4.6).
    GreedyWithCycleFixer,
}

/// Beam bounds (`B`/`F`/`I`) and tree-build strategy shared by the labels
/// solver, the tree builder, and the morphology solver. `None` means
/// "unbounded", matching the prose spec's negative-bound convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub beam_width: Option<usize>,
    pub fork_width: Option<usize>,
    pub max_iterations: Option<usize>,
    pub tree_strategy: TreeStrategy,
    /// Whether the tree builder's uniform-baseline arc pre-filter
    /// (`filter_candidates`, §4.5) runs at all.
    pub filter_arc_candidates: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            beam_width: Some(16),
            fork_width: Some(8),
            max_iterations: Some(64),
            tree_strategy: TreeStrategy::Beam,
            filter_arc_candidates: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_bounded_beam_search() {
        let config = SolverConfig::default();
        assert_eq!(config.tree_strategy, TreeStrategy::Beam);
        assert!(config.beam_width.is_some());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SolverConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.beam_width, config.beam_width);
        assert_eq!(back.tree_strategy, config.tree_strategy);
    }
}
