//! Predicate trees: the declarative, data-driven shape constraint
//! premises and conditions are built from (§3, §6). Kept as data rather
//! than closures so a constraint catalogue can be deserialized from JSON.

use crate::pos::BasePos;
use crate::sentence::Sentence;
use crate::token::TokenId;
use crate::tree::DependencyTree;
use serde::{Deserialize, Serialize};

/// Evaluation context a predicate is checked against.
pub struct EvalContext<'a> {
    pub sentence: &'a Sentence,
    pub tree: &'a DependencyTree,
}

/// A predicate over a single token (§3: "a predicate may inspect: the
/// token's form, its current chosen morphology ..., its context
/// morphology, its position in the dependency tree ..., and its
/// syntactic relation").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum UnaryPredicate {
    True,
    Not(Box<UnaryPredicate>),
    And(Vec<UnaryPredicate>),
    Or(Vec<UnaryPredicate>),
    FormEquals { form: String },
    HasBasePos { pos: BasePos },
    HasFeature { name: String },
    FeatureEquals { name: String, value: String },
    ContextHasFeature { name: String },
    ContextFeatureEquals { name: String, value: String },
    IsRoot,
    HasDeprel { label: String },
    /// Touches tokens beyond the token itself / its one governor — lands
    /// a constraint in `baseMorphoOthers` instead of the unary/binary
    /// groups (§3 group 4).
    HasSiblingWithBasePos { pos: BasePos },
    HasDescendantWithBasePos { pos: BasePos },
}

/// Statically-computed capability flags for a predicate (§3). These drive
/// constraint grouping and are computed once, not re-derived per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub checks_morpho: bool,
    pub checks_morpho_properties: bool,
    pub checks_context: bool,
    pub touches_beyond_pair: bool,
}

impl Capabilities {
    #[must_use]
    pub fn union(self, other: Capabilities) -> Capabilities {
        Capabilities {
            checks_morpho: self.checks_morpho || other.checks_morpho,
            checks_morpho_properties: self.checks_morpho_properties || other.checks_morpho_properties,
            checks_context: self.checks_context || other.checks_context,
            touches_beyond_pair: self.touches_beyond_pair || other.touches_beyond_pair,
        }
    }
}

impl UnaryPredicate {
    /// Statically computed capability flags (§3).
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        match self {
            UnaryPredicate::True | UnaryPredicate::FormEquals { .. } | UnaryPredicate::IsRoot | UnaryPredicate::HasDeprel { .. } => {
                Capabilities::default()
            }
            UnaryPredicate::Not(p) => p.capabilities(),
            UnaryPredicate::And(ps) | UnaryPredicate::Or(ps) => ps
                .iter()
                .map(UnaryPredicate::capabilities)
                .fold(Capabilities::default(), Capabilities::union),
            UnaryPredicate::HasBasePos { .. } => Capabilities {
                checks_morpho: true,
                ..Capabilities::default()
            },
            UnaryPredicate::HasFeature { .. } | UnaryPredicate::FeatureEquals { .. } => Capabilities {
                checks_morpho: true,
                checks_morpho_properties: true,
                ..Capabilities::default()
            },
            UnaryPredicate::ContextHasFeature { .. } | UnaryPredicate::ContextFeatureEquals { .. } => {
                Capabilities {
                    checks_morpho: true,
                    checks_morpho_properties: true,
                    checks_context: true,
                    touches_beyond_pair: false,
                }
            }
            UnaryPredicate::HasSiblingWithBasePos { .. } | UnaryPredicate::HasDescendantWithBasePos { .. } => {
                Capabilities {
                    checks_morpho: true,
                    touches_beyond_pair: true,
                    ..Capabilities::default()
                }
            }
        }
    }

    /// Fails fast (returns `false`, never panics/raises) on malformed
    /// input such as a token id absent from the sentence (§4.1).
    #[must_use]
    pub fn eval(&self, token_id: TokenId, ctx: &EvalContext) -> bool {
        let Some(token) = ctx.sentence.get(token_id) else {
            return false;
        };
        match self {
            UnaryPredicate::True => true,
            UnaryPredicate::Not(p) => !p.eval(token_id, ctx),
            UnaryPredicate::And(ps) => ps.iter().all(|p| p.eval(token_id, ctx)),
            UnaryPredicate::Or(ps) => ps.iter().any(|p| p.eval(token_id, ctx)),
            UnaryPredicate::FormEquals { form } => &token.form == form,
            UnaryPredicate::HasBasePos { pos } => token
                .chosen_morphology
                .as_ref()
                .and_then(|m| m.base_pos())
                .is_some_and(|p| p.base == *pos),
            UnaryPredicate::HasFeature { name } => token
                .chosen_morphology
                .as_ref()
                .and_then(|m| m.components.first())
                .is_some_and(|c| c.feats.has(name)),
            UnaryPredicate::FeatureEquals { name, value } => token
                .chosen_morphology
                .as_ref()
                .and_then(|m| m.components.first())
                .and_then(|c| c.feats.value_of(name))
                .is_some_and(|v| &v == value),
            UnaryPredicate::ContextHasFeature { name } => token
                .context_morphologies
                .as_ref()
                .into_iter()
                .flatten()
                .any(|m| {
                    m.morphology
                        .components
                        .first()
                        .is_some_and(|c| c.feats.has(name))
                }),
            UnaryPredicate::ContextFeatureEquals { name, value } => token
                .context_morphologies
                .as_ref()
                .into_iter()
                .flatten()
                .any(|m| {
                    m.morphology
                        .components
                        .first()
                        .and_then(|c| c.feats.value_of(name))
                        .is_some_and(|v| &v == value)
                }),
            UnaryPredicate::IsRoot => token.relation.as_ref().is_some_and(|r| r.is_root()),
            UnaryPredicate::HasDeprel { label } => {
                token.relation.as_ref().is_some_and(|r| &r.label == label)
            }
            UnaryPredicate::HasSiblingWithBasePos { pos } => {
                let Some(relation) = &token.relation else {
                    return false;
                };
                let Some(governor) = relation.governor else {
                    return false;
                };
                ctx.tree
                    .dependents_of(governor)
                    .into_iter()
                    .filter(|&id| id != token_id)
                    .filter_map(|id| ctx.sentence.get(id))
                    .any(|t| {
                        t.chosen_morphology
                            .as_ref()
                            .and_then(|m| m.base_pos())
                            .is_some_and(|p| p.base == *pos)
                    })
            }
            UnaryPredicate::HasDescendantWithBasePos { pos } => {
                descendants(ctx.tree, token_id)
                    .into_iter()
                    .filter_map(|id| ctx.sentence.get(id))
                    .any(|t| {
                        t.chosen_morphology
                            .as_ref()
                            .and_then(|m| m.base_pos())
                            .is_some_and(|p| p.base == *pos)
                    })
            }
        }
    }
}

fn descendants(tree: &DependencyTree, id: TokenId) -> Vec<TokenId> {
    let mut out = Vec::new();
    let mut stack = tree.dependents_of(id);
    while let Some(next) = stack.pop() {
        out.push(next);
        stack.extend(tree.dependents_of(next));
    }
    out
}

/// A binary constraint's premise/condition shape: an optional predicate
/// on the dependent and/or the governor (§3: "at least one side
/// non-empty").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PairPredicate {
    pub dependent: Option<UnaryPredicate>,
    pub governor: Option<UnaryPredicate>,
}

impl PairPredicate {
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        let dep = self.dependent.as_ref().map_or(Capabilities::default(), UnaryPredicate::capabilities);
        let gov = self.governor.as_ref().map_or(Capabilities::default(), UnaryPredicate::capabilities);
        dep.union(gov)
    }

    /// Verified iff both present sides hold; a missing governor-side
    /// predicate (at the root) holds vacuously (§4.1 algorithmic note).
    #[must_use]
    pub fn eval(&self, dependent_id: TokenId, governor_id: Option<TokenId>, ctx: &EvalContext) -> bool {
        let dep_ok = match &self.dependent {
            None => true,
            Some(p) => p.eval(dependent_id, ctx),
        };
        let gov_ok = match (&self.governor, governor_id) {
            (None, _) => true,
            (Some(_), None) => true, // root: governor-side predicate holds vacuously
            (Some(p), Some(gov_id)) => p.eval(gov_id, ctx),
        };
        dep_ok && gov_ok
    }
}
