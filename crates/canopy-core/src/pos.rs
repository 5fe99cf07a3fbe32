//! Part-of-speech tags and Universal-Dependencies-style morphological features.
//!
//! `BasePos` and the UD feature enums are carried over from the project's
//! earlier Universal Dependencies modelling; `Pos` adds the base/subtype
//! hierarchy the grammatical-configuration and morphology types need.

use serde::{Deserialize, Serialize};

#[cfg(test)]
use proptest_derive::Arbitrary;

/// Universal part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum BasePos {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl BasePos {
    /// Content words are the POS classes a "generic" synthesized morphology
    /// or configuration may stand in for (§4.2, §4.8 "content-word POS").
    #[must_use]
    pub fn is_content_word(self) -> bool {
        matches!(
            self,
            BasePos::Noun | BasePos::Verb | BasePos::Adj | BasePos::Adv | BasePos::Propn
        )
    }
}

impl std::str::FromStr for BasePos {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ADJ" => BasePos::Adj,
            "ADP" => BasePos::Adp,
            "ADV" => BasePos::Adv,
            "AUX" => BasePos::Aux,
            "CCONJ" => BasePos::Cconj,
            "DET" => BasePos::Det,
            "INTJ" => BasePos::Intj,
            "NOUN" => BasePos::Noun,
            "NUM" => BasePos::Num,
            "PART" => BasePos::Part,
            "PRON" => BasePos::Pron,
            "PROPN" => BasePos::Propn,
            "PUNCT" => BasePos::Punct,
            "SCONJ" => BasePos::Sconj,
            "SYM" => BasePos::Sym,
            "VERB" => BasePos::Verb,
            "X" => BasePos::X,
            _ => return Err(()),
        })
    }
}

/// A POS tag with an optional language-specific subtype, e.g. `NOUN:prop`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub base: BasePos,
    pub subtype: Option<String>,
}

impl Pos {
    #[must_use]
    pub fn new(base: BasePos) -> Self {
        Self {
            base,
            subtype: None,
        }
    }

    #[must_use]
    pub fn with_subtype(base: BasePos, subtype: impl Into<String>) -> Self {
        Self {
            base,
            subtype: Some(subtype.into()),
        }
    }

    /// Two tags "agree on POS subtype" (§3 grammatical-configuration
    /// compatibility) when the base matches and either side has no subtype
    /// opinion or the subtypes are equal.
    #[must_use]
    pub fn agrees_with(&self, other: &Pos) -> bool {
        self.base == other.base
            && match (&self.subtype, &other.subtype) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }
}

/// Person values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdPerson {
    First,
    Second,
    Third,
}

/// Number values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdNumber {
    Singular,
    Plural,
    Dual,
}

/// Gender values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdGender {
    Masculine,
    Feminine,
    Neuter,
}

/// Animacy values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdAnimacy {
    Animate,
    Inanimate,
}

/// Case values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdCase {
    Nominative,
    Accusative,
    Genitive,
    Dative,
    Instrumental,
    Locative,
    Vocative,
    Ablative,
}

/// Definiteness values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdDefiniteness {
    Definite,
    Indefinite,
    Specific,
    Unspecific,
}

/// Tense values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdTense {
    Past,
    Present,
    Future,
}

/// Aspect values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdAspect {
    Perfective,
    Imperfective,
}

/// Mood values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdMood {
    Indicative,
    Imperative,
    Conditional,
    Subjunctive,
}

/// Voice values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdVoice {
    Active,
    Passive,
    Middle,
}

/// Degree values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdDegree {
    Positive,
    Comparative,
    Superlative,
}

/// `VerbForm` values for Universal Dependencies morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum UdVerbForm {
    Finite,
    Infinitive,
    Participle,
    Gerund,
    ConverbalAdverbial,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_agrees_requires_matching_base() {
        let a = Pos::new(BasePos::Noun);
        let b = Pos::new(BasePos::Verb);
        assert!(!a.agrees_with(&b));
    }

    #[test]
    fn pos_agrees_when_one_side_has_no_subtype_opinion() {
        let a = Pos::with_subtype(BasePos::Noun, "prop");
        let b = Pos::new(BasePos::Noun);
        assert!(a.agrees_with(&b));
        assert!(b.agrees_with(&a));
    }

    #[test]
    fn pos_disagrees_on_conflicting_subtype() {
        let a = Pos::with_subtype(BasePos::Noun, "prop");
        let b = Pos::with_subtype(BasePos::Noun, "common");
        assert!(!a.agrees_with(&b));
    }

    #[test]
    fn content_word_classification() {
        assert!(BasePos::Noun.is_content_word());
        assert!(BasePos::Verb.is_content_word());
        assert!(!BasePos::Det.is_content_word());
        assert!(!BasePos::Punct.is_content_word());
    }
}
