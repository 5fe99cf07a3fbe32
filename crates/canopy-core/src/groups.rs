//! Constraint grouping (§3): the six disjoint groups the sentence
//! validator verifies in sequence. Grouping is a single pass over the
//! catalogue's precomputed capability flags — configuration, not control
//! flow (§9 design notes).

use crate::constraint::{Constraint, ConstraintBody};

/// The six disjoint constraint groups, in verification order.
#[derive(Debug, Clone, Default)]
pub struct ConstraintGroups<'a> {
    pub simple: Vec<&'a Constraint>,
    pub base_morpho_unary: Vec<&'a Constraint>,
    pub base_morpho_binary: Vec<&'a Constraint>,
    pub base_morpho_others: Vec<&'a Constraint>,
    pub morpho_properties_simple: Vec<&'a Constraint>,
    pub morpho_properties_context: Vec<&'a Constraint>,
}

impl<'a> ConstraintGroups<'a> {
    /// Classifies every constraint in `catalogue` into exactly one group.
    /// The six groups partition the catalogue (§8 property 3).
    #[must_use]
    pub fn classify(catalogue: &'a [Constraint]) -> Self {
        let mut groups = ConstraintGroups::default();
        for constraint in catalogue {
            let caps = constraint.capabilities();
            if !caps.checks_morpho {
                groups.simple.push(constraint);
            } else if caps.checks_morpho_properties {
                if caps.checks_context {
                    groups.morpho_properties_context.push(constraint);
                } else {
                    groups.morpho_properties_simple.push(constraint);
                }
            } else if caps.touches_beyond_pair {
                groups.base_morpho_others.push(constraint);
            } else if constraint.is_binary() {
                groups.base_morpho_binary.push(constraint);
            } else {
                groups.base_morpho_unary.push(constraint);
            }
        }
        groups
    }

    #[must_use]
    pub fn total_len(&self) -> usize {
        self.simple.len()
            + self.base_morpho_unary.len()
            + self.base_morpho_binary.len()
            + self.base_morpho_others.len()
            + self.morpho_properties_simple.len()
            + self.morpho_properties_context.len()
    }
}

/// Only used so `ConstraintBody` stays a public, documented re-export
/// point for downstream crates constructing catalogues.
pub type Body = ConstraintBody;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{PairPredicate, UnaryPredicate};

    fn unary(desc: &str, premise: UnaryPredicate, condition: UnaryPredicate) -> Constraint {
        Constraint::new(desc, 0.5, 1.0, ConstraintBody::Unary { premise, condition }).unwrap()
    }

    #[test]
    fn groups_partition_the_catalogue() {
        use crate::pos::BasePos;

        let catalogue = vec![
            unary("simple", UnaryPredicate::IsRoot, UnaryPredicate::True),
            unary(
                "unary-morpho",
                UnaryPredicate::HasBasePos { pos: BasePos::Noun },
                UnaryPredicate::True,
            ),
            Constraint::new(
                "binary-morpho",
                0.5,
                1.0,
                ConstraintBody::Binary {
                    premise: PairPredicate {
                        dependent: Some(UnaryPredicate::HasBasePos { pos: BasePos::Noun }),
                        governor: None,
                    },
                    condition: PairPredicate::default(),
                },
            )
            .unwrap(),
            unary(
                "others",
                UnaryPredicate::HasSiblingWithBasePos { pos: BasePos::Det },
                UnaryPredicate::True,
            ),
            unary(
                "prop-simple",
                UnaryPredicate::HasFeature { name: "Number".into() },
                UnaryPredicate::True,
            ),
            unary(
                "prop-context",
                UnaryPredicate::ContextHasFeature { name: "Case".into() },
                UnaryPredicate::True,
            ),
        ];

        let groups = ConstraintGroups::classify(&catalogue);
        assert_eq!(groups.total_len(), catalogue.len());
        assert_eq!(groups.simple.len(), 1);
        assert_eq!(groups.base_morpho_unary.len(), 1);
        assert_eq!(groups.base_morpho_binary.len(), 1);
        assert_eq!(groups.base_morpho_others.len(), 1);
        assert_eq!(groups.morpho_properties_simple.len(), 1);
        assert_eq!(groups.morpho_properties_context.len(), 1);
    }
}
