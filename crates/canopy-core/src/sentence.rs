//! Sentence: the owning collection of tokens, plus the composite-token
//! explosion operation (§3) that downstream constraint checks require.

use crate::token::{Token, TokenId, TokenKind};
use crate::tree::DependencyTree;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A sentence owns its tokens; the dependency tree references them by id
/// only. Token order in `tokens` is surface (reading) order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    tokens: IndexMap<TokenId, Token>,
}

impl Sentence {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(&id)
    }

    pub fn get_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.tokens.get_mut(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Token> {
        self.tokens.values_mut()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<TokenId> {
        self.tokens.keys().copied().collect()
    }

    /// Position of `id` within the surface-order sequence, used by
    /// predicates inspecting token adjacency.
    #[must_use]
    pub fn index_of(&self, id: TokenId) -> Option<usize> {
        self.tokens.get_index_of(&id)
    }

    /// Replaces each composite token by its components, in place and in
    /// surface order, and rewrites governor pointers in `tree` so that any
    /// token whose governor was the composite now points at the
    /// composite's first component (§3, tested scenario 4).
    ///
    /// Component tokens are expected to already be present in the
    /// sentence as ordinary single tokens alongside the composite entry;
    /// this only drops the composite entry itself and redirects arcs.
    pub fn explode_composites(&mut self, tree: &mut DependencyTree) {
        let mut first_component: std::collections::HashMap<TokenId, TokenId> =
            std::collections::HashMap::new();
        for token in self.tokens.values() {
            if let TokenKind::Composite { components } = &token.kind {
                if let Some(&first) = components.first() {
                    first_component.insert(token.id, first);
                }
            }
        }

        self.tokens
            .retain(|_, token| !matches!(token.kind, TokenKind::Composite { .. }));

        tree.remap_governors(|gov| first_component.get(&gov).copied().unwrap_or(gov));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Position;
    use crate::tree::DependencyTree;

    fn pos(i: usize) -> Position {
        Position {
            index: i,
            char_start: 0,
            char_end: 0,
        }
    }

    #[test]
    fn explode_replaces_composite_and_remaps_governor() {
        // del (id 5) -> components [10, 11]; token x (id 7) governed by 5.
        let del = Token::composite(5, "del", pos(1), vec![10, 11]);
        let de = Token::new(10, "de", pos(1));
        let el = Token::new(11, "el", pos(1));
        let x = Token::new(7, "x", pos(2));

        let mut sentence = Sentence::new(vec![del, de, el, x]);
        let mut tree = DependencyTree::new();
        tree.set_arc(7, Some(5), "case", 0.9).unwrap();
        tree.set_arc(5, None, "root", 1.0).unwrap();

        sentence.explode_composites(&mut tree);

        assert!(sentence.get(5).is_none());
        assert!(sentence.get(10).is_some());
        assert!(sentence.get(11).is_some());
        assert_eq!(tree.arc(7).unwrap().governor, Some(10));
    }
}
