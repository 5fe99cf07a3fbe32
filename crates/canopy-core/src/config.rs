//! Grammatical configuration: the parallel, per-token sequence of
//! (POS, syntactic dependency) pairs the labels solver assigns.

use crate::morphology::Morphology;
use crate::pos::{BasePos, Pos};
use serde::{Deserialize, Serialize};

/// Direction of a syntactic-dependency arc relative to its governor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Root,
    Left,
    Right,
}

/// A labelled, directed dependency relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntacticDependency {
    pub label: String,
    pub direction: Direction,
}

impl SyntacticDependency {
    #[must_use]
    pub fn new(label: impl Into<String>, direction: Direction) -> Self {
        Self {
            label: label.into(),
            direction,
        }
    }

    /// The placeholder relation the labels solver installs (§4.4) when no
    /// valid state was found: same direction as the best-effort state, but
    /// an explicitly underspecified label.
    #[must_use]
    pub fn unknown(direction: Direction) -> Self {
        Self::new("UNKNOWN", direction)
    }
}

/// One component of a grammatical configuration: a POS paired with the
/// syntactic dependency that POS bears to its governor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigComponent {
    pub pos: Option<Pos>,
    pub dependency: SyntacticDependency,
}

impl ConfigComponent {
    #[must_use]
    pub fn new(pos: Pos, dependency: SyntacticDependency) -> Self {
        Self {
            pos: Some(pos),
            dependency,
        }
    }

    /// The "unknown" stand-in component (§4.4): no POS, `UNKNOWN` label,
    /// same direction as the original.
    #[must_use]
    pub fn unknown(direction: Direction) -> Self {
        Self {
            pos: None,
            dependency: SyntacticDependency::unknown(direction),
        }
    }
}

/// An ordered, non-empty sequence of grammatical-configuration components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammaticalConfiguration {
    components: Vec<ConfigComponent>,
}

impl GrammaticalConfiguration {
    /// # Panics
    /// Panics if `components` is empty — a configuration is non-empty by
    /// definition (§3).
    #[must_use]
    pub fn new(components: Vec<ConfigComponent>) -> Self {
        assert!(
            !components.is_empty(),
            "a grammatical configuration must have at least one component"
        );
        Self { components }
    }

    #[must_use]
    pub fn components(&self) -> &[ConfigComponent] {
        &self.components
    }

    #[must_use]
    pub fn is_single(&self) -> bool {
        self.components.len() == 1
    }

    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.components.len() > 1
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.components[0].dependency.direction
    }

    /// Compatible (§3): component counts match and every pair agrees on
    /// POS subtype.
    #[must_use]
    pub fn is_compatible_with(&self, morphology: &Morphology) -> bool {
        self.components.len() == morphology.components.len()
            && self
                .components
                .iter()
                .zip(&morphology.components)
                .all(|(c, m)| c.pos.as_ref().map_or(true, |p| p.agrees_with(&m.pos)))
    }

    /// Partially compatible (§3): only the "continuation" components
    /// (everything after the first) of a multi-word pair agree; the head
    /// component may disagree.
    #[must_use]
    pub fn is_partially_compatible_with(&self, morphology: &Morphology) -> bool {
        if self.components.len() != morphology.components.len() || self.components.len() < 2 {
            return false;
        }
        self.components[1..]
            .iter()
            .zip(&morphology.components[1..])
            .all(|(c, m)| c.pos.as_ref().map_or(true, |p| p.agrees_with(&m.pos)))
    }

    /// Synthesizes a single-component "unknown noun" configuration (§4.8)
    /// used when the labeler selector cannot find any valid configuration
    /// at all.
    #[must_use]
    pub fn unknown_noun(direction: Direction) -> Self {
        Self::new(vec![ConfigComponent::new(
            Pos::new(BasePos::Noun),
            SyntacticDependency::new("dep", direction),
        )])
    }

    /// An all-unknown configuration with `components.len()` matching
    /// `len`, used to underspecify a multi-word token end to end.
    #[must_use]
    pub fn all_unknown(direction: Direction, len: usize) -> Self {
        let len = len.max(1);
        Self::new((0..len).map(|_| ConfigComponent::unknown(direction)).collect())
    }
}
