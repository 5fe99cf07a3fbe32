//! Dependency tree: token id -> (governor, label, attachment score), plus
//! cycle detection and the positional/ancestry lookups built on top of it.
//!
//! Per the design notes, the tree is naturally a graph with cycles during
//! construction; we store it as a flat map and detect cycles with a
//! marked DFS rather than trying to materialize back-references.

use crate::token::TokenId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One arc of the tree: a token's governor (`None` at the root), its
/// dependency label, and the attachment score in [0,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub governor: Option<TokenId>,
    pub label: String,
    pub score: f64,
}

/// A dependency tree over a fixed set of token ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyTree {
    arcs: HashMap<TokenId, Arc>,
    /// Overall score of the configuration that produced this tree (§4.4).
    pub score: f64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("token {0} is not part of this tree")]
    UnknownToken(TokenId),
    #[error("more than one root: {0} and {1} both have no governor")]
    MultipleRoots(TokenId, TokenId),
    #[error("cycle detected involving token {0}")]
    Cycle(TokenId),
}

impl DependencyTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or overwrites) the arc for `id`. Returns an error if this
    /// would introduce a second root; does not itself check for cycles —
    /// use [`DependencyTree::find_cycle`] once the tree is fully built.
    pub fn set_arc(
        &mut self,
        id: TokenId,
        governor: Option<TokenId>,
        label: impl Into<String>,
        score: f64,
    ) -> Result<(), TreeError> {
        if governor.is_none() {
            if let Some(existing_root) = self.root_id() {
                if existing_root != id {
                    return Err(TreeError::MultipleRoots(existing_root, id));
                }
            }
        }
        self.arcs.insert(
            id,
            Arc {
                governor,
                label: label.into(),
                score,
            },
        );
        Ok(())
    }

    #[must_use]
    pub fn arc(&self, id: TokenId) -> Option<&Arc> {
        self.arcs.get(&id)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<TokenId> {
        self.arcs.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    #[must_use]
    pub fn root_id(&self) -> Option<TokenId> {
        self.arcs
            .iter()
            .find(|(_, arc)| arc.governor.is_none())
            .map(|(id, _)| *id)
    }

    #[must_use]
    pub fn dependents_of(&self, id: TokenId) -> Vec<TokenId> {
        let mut deps: Vec<TokenId> = self
            .arcs
            .iter()
            .filter(|(_, arc)| arc.governor == Some(id))
            .map(|(dep_id, _)| *dep_id)
            .collect();
        deps.sort_unstable();
        deps
    }

    /// Chain of governors from `id` up to (and including) the root.
    /// Returns `None` if the chain does not terminate at a root within
    /// `self.len()` steps (i.e. a cycle).
    #[must_use]
    pub fn heads_chain(&self, id: TokenId) -> Option<Vec<TokenId>> {
        let mut chain = vec![id];
        let mut current = id;
        let limit = self.arcs.len() + 1;
        for _ in 0..limit {
            match self.arcs.get(&current) {
                Some(Arc { governor: Some(g), .. }) => {
                    chain.push(*g);
                    current = *g;
                }
                Some(Arc { governor: None, .. }) => return Some(chain),
                None => return None,
            }
        }
        None
    }

    /// Marked-DFS cycle detector. Returns the first token id found to lie
    /// on a cycle, if any.
    #[must_use]
    pub fn find_cycle(&self) -> Option<TokenId> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }
        let mut marks: HashMap<TokenId, Mark> = HashMap::new();

        for &start in self.arcs.keys() {
            if marks.contains_key(&start) {
                continue;
            }
            let mut path = Vec::new();
            let mut current = start;
            loop {
                match marks.get(&current) {
                    Some(Mark::Done) => break,
                    Some(Mark::InProgress) => return Some(current),
                    None => {}
                }
                marks.insert(current, Mark::InProgress);
                path.push(current);
                match self.arcs.get(&current) {
                    Some(Arc { governor: Some(g), .. }) => current = *g,
                    _ => break,
                }
            }
            for id in path {
                marks.insert(id, Mark::Done);
            }
        }
        None
    }

    /// Validates the tree invariants (§3): exactly one root, acyclic,
    /// every governor reference belongs to the tree.
    pub fn validate(&self) -> Result<(), TreeError> {
        let roots: Vec<TokenId> = self
            .arcs
            .iter()
            .filter(|(_, arc)| arc.governor.is_none())
            .map(|(id, _)| *id)
            .collect();
        match roots.len() {
            0 => {
                // No root at all is only valid for an empty tree.
                if self.arcs.is_empty() {
                    return Ok(());
                }
                // Pick an arbitrary id to report — absence of a root
                // surfaces as an effective cycle among all tokens.
                let any = *self.arcs.keys().next().unwrap();
                return Err(TreeError::Cycle(any));
            }
            1 => {}
            _ => return Err(TreeError::MultipleRoots(roots[0], roots[1])),
        }
        for arc in self.arcs.values() {
            if let Some(gov) = arc.governor {
                if !self.arcs.contains_key(&gov) {
                    return Err(TreeError::UnknownToken(gov));
                }
            }
        }
        if let Some(cycle_id) = self.find_cycle() {
            return Err(TreeError::Cycle(cycle_id));
        }
        Ok(())
    }

    /// Rewrites every governor reference through `f`. Used by
    /// [`crate::sentence::Sentence::explode_composites`] to redirect
    /// dependents of an exploded composite to its first component.
    pub fn remap_governors(&mut self, f: impl Fn(TokenId) -> TokenId) {
        let remapped: HashMap<TokenId, Arc> = self
            .arcs
            .drain()
            .map(|(id, arc)| {
                let governor = arc.governor.map(&f);
                (f(id), Arc { governor, ..arc })
            })
            .collect();
        self.arcs = remapped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_root_acyclic_tree_validates() {
        let mut tree = DependencyTree::new();
        tree.set_arc(1, None, "root", 1.0).unwrap();
        tree.set_arc(2, Some(1), "nsubj", 0.9).unwrap();
        tree.set_arc(3, Some(1), "obj", 0.8).unwrap();
        assert!(tree.validate().is_ok());
        assert_eq!(tree.root_id(), Some(1));
        assert_eq!(tree.dependents_of(1), vec![2, 3]);
    }

    #[test]
    fn cycle_is_detected() {
        let mut tree = DependencyTree::new();
        tree.set_arc(1, Some(2), "dep", 0.9).unwrap();
        tree.set_arc(2, Some(1), "dep", 0.8).unwrap();
        assert!(tree.find_cycle().is_some());
        assert!(tree.validate().is_err());
    }

    #[test]
    fn second_root_rejected_on_insert() {
        let mut tree = DependencyTree::new();
        tree.set_arc(1, None, "root", 1.0).unwrap();
        let err = tree.set_arc(2, None, "root", 1.0).unwrap_err();
        assert_eq!(err, TreeError::MultipleRoots(1, 2));
    }

    #[test]
    fn heads_chain_reaches_root() {
        let mut tree = DependencyTree::new();
        tree.set_arc(1, None, "root", 1.0).unwrap();
        tree.set_arc(2, Some(1), "nsubj", 0.9).unwrap();
        tree.set_arc(3, Some(2), "amod", 0.7).unwrap();
        assert_eq!(tree.heads_chain(3), Some(vec![3, 2, 1]));
    }

    #[test]
    fn remap_governors_redirects_dependents() {
        let mut tree = DependencyTree::new();
        tree.set_arc(5, None, "root", 1.0).unwrap();
        tree.set_arc(7, Some(5), "case", 0.9).unwrap();
        tree.remap_governors(|id| if id == 5 { 10 } else { id });
        assert_eq!(tree.arc(7).unwrap().governor, Some(10));
    }
}
