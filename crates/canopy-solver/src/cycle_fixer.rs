//! Cycle fixer (§4.6): the greedy fallback path used instead of the beam
//! search when a tree already has a structure (possibly cyclic) to repair.

use crate::tree_builder::ScoredArc;
use canopy_core::{DependencyTree, TokenId};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Finds every cycle in `tree`, returning each as the set of token ids on
/// it. Reuses the same marked-walk strategy as
/// [`canopy_core::tree::DependencyTree::find_cycle`], but collects the
/// full membership of each cycle rather than just one offending id.
#[must_use]
pub fn compute_cycles(tree: &DependencyTree) -> Vec<HashSet<TokenId>> {
    let mut cycles = Vec::new();
    let mut resolved: HashSet<TokenId> = HashSet::new();

    for start in tree.ids() {
        if resolved.contains(&start) {
            continue;
        }
        let mut path = Vec::new();
        let mut position_in_path: HashMap<TokenId, usize> = HashMap::new();
        let mut current = start;
        loop {
            if resolved.contains(&current) {
                break;
            }
            if let Some(&pos) = position_in_path.get(&current) {
                cycles.push(path[pos..].iter().copied().collect());
                break;
            }
            position_in_path.insert(current, path.len());
            path.push(current);
            match tree.arc(current).and_then(|arc| arc.governor) {
                Some(governor) => current = governor,
                None => break,
            }
        }
        for id in path {
            resolved.insert(id);
        }
    }
    cycles
}

/// Repairs every cycle in `tree` in place: removes each cycle's
/// lowest-scoring arc, then reattaches that dependent to the
/// highest-scoring direct-element (non-cyclic) governor from
/// `arc_matrix` that does not reintroduce a cycle. `DependencyTree`
/// enforces a single root at every `set_arc` call, so when no safe
/// reattachment exists the arc is left exactly as it was (still part of
/// its cycle) rather than detached into a second root; downstream
/// validation still flags the token via `find_cycle`/`validate` (§4.6
/// failure mode).
pub fn fix_cycles(tree: &mut DependencyTree, arc_matrix: &HashMap<TokenId, Vec<ScoredArc>>) {
    let cycles = compute_cycles(tree);
    if cycles.is_empty() {
        return;
    }

    let all_cyclic: HashSet<TokenId> = cycles.iter().flatten().copied().collect();
    let direct_elements: HashSet<TokenId> = tree
        .ids()
        .into_iter()
        .filter(|id| !all_cyclic.contains(id))
        .collect();

    for cycle in cycles {
        let Some(weakest) = cycle
            .iter()
            .min_by(|a, b| {
                let score_a = tree.arc(**a).map(|arc| arc.score).unwrap_or(f64::INFINITY);
                let score_b = tree.arc(**b).map(|arc| arc.score).unwrap_or(f64::INFINITY);
                score_a.partial_cmp(&score_b).unwrap_or(std::cmp::Ordering::Equal)
            })
            .copied()
        else {
            continue;
        };

        let mut candidates: Vec<&ScoredArc> = arc_matrix
            .get(&weakest)
            .into_iter()
            .flatten()
            .filter(|(governor, _)| direct_elements.contains(governor))
            .collect();
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut reattached = false;
        for (governor, score) in candidates {
            let saved = tree.arc(weakest).cloned();
            if tree.set_arc(weakest, Some(*governor), "dep", *score).is_err() {
                continue;
            }
            if tree.find_cycle().is_none() {
                reattached = true;
                break;
            }
            if let Some(arc) = saved {
                let _ = tree.set_arc(weakest, arc.governor, arc.label, arc.score);
            }
        }

        if !reattached {
            warn!(token = weakest, "cycle fixer could not reattach dependent without reintroducing a cycle");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_cycles_finds_a_two_node_cycle() {
        let mut tree = DependencyTree::new();
        tree.set_arc(1, Some(2), "dep", 0.9).unwrap();
        tree.set_arc(2, Some(1), "dep", 0.8).unwrap();
        let cycles = compute_cycles(&tree);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], HashSet::from([1, 2]));
    }

    #[test]
    fn fix_cycles_detaches_the_weakest_arc_and_reattaches_to_a_direct_element() {
        let mut tree = DependencyTree::new();
        tree.set_arc(3, None, "root", 1.0).unwrap();
        tree.set_arc(1, Some(2), "dep", 0.4).unwrap();
        tree.set_arc(2, Some(1), "dep", 0.9).unwrap();

        let mut arc_matrix = HashMap::new();
        arc_matrix.insert(1, vec![(2_i64, 0.9), (3_i64, 0.5)]);

        fix_cycles(&mut tree, &arc_matrix);

        assert!(tree.find_cycle().is_none());
        assert_eq!(tree.arc(1).unwrap().governor, Some(3));
    }

    #[test]
    fn fix_cycles_leaves_the_cycle_intact_when_no_safe_reattachment_exists() {
        let mut tree = DependencyTree::new();
        tree.set_arc(1, Some(2), "dep", 0.4).unwrap();
        tree.set_arc(2, Some(1), "dep", 0.9).unwrap();
        let arc_matrix = HashMap::new();

        fix_cycles(&mut tree, &arc_matrix);

        assert!(tree.find_cycle().is_some());
        assert_eq!(tree.arc(1).unwrap().governor, Some(2));
    }
}
