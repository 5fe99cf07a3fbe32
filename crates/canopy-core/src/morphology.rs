//! Morphology: lemma + POS + morphological feature bag, and the ordered
//! sequences of these that make up a (possibly multi-word) morphology or
//! its scored candidates.

use crate::pos::{
    Pos, UdAnimacy, UdAspect, UdCase, UdDefiniteness, UdDegree, UdGender, UdMood, UdNumber,
    UdPerson, UdTense, UdVerbForm, UdVoice,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Morphological features following the Universal Dependencies inventory,
/// plus an open bag for anything not covered by the structured fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MorphFeatures {
    pub person: Option<UdPerson>,
    pub number: Option<UdNumber>,
    pub gender: Option<UdGender>,
    pub animacy: Option<UdAnimacy>,
    pub case: Option<UdCase>,
    pub definiteness: Option<UdDefiniteness>,
    pub tense: Option<UdTense>,
    pub aspect: Option<UdAspect>,
    pub mood: Option<UdMood>,
    pub voice: Option<UdVoice>,
    pub degree: Option<UdDegree>,
    pub verb_form: Option<UdVerbForm>,
    /// Features not covered by the structured fields above, keyed by name.
    pub other: HashMap<String, String>,
}

impl MorphFeatures {
    /// True if `name` names a feature (structured or in `other`) that is
    /// present on this bag. Backs `hasFeature` predicates (§3).
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        match name {
            "Person" => self.person.is_some(),
            "Number" => self.number.is_some(),
            "Gender" => self.gender.is_some(),
            "Animacy" => self.animacy.is_some(),
            "Case" => self.case.is_some(),
            "Definite" => self.definiteness.is_some(),
            "Tense" => self.tense.is_some(),
            "Aspect" => self.aspect.is_some(),
            "Mood" => self.mood.is_some(),
            "Voice" => self.voice.is_some(),
            "Degree" => self.degree.is_some(),
            "VerbForm" => self.verb_form.is_some(),
            other => self.other.contains_key(other),
        }
    }

    /// String value of a feature by name, for `featureEquals` predicates.
    /// Structured variants are rendered with their `Debug` spelling.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<String> {
        match name {
            "Person" => self.person.map(|v| format!("{v:?}")),
            "Number" => self.number.map(|v| format!("{v:?}")),
            "Gender" => self.gender.map(|v| format!("{v:?}")),
            "Animacy" => self.animacy.map(|v| format!("{v:?}")),
            "Case" => self.case.map(|v| format!("{v:?}")),
            "Definite" => self.definiteness.map(|v| format!("{v:?}")),
            "Tense" => self.tense.map(|v| format!("{v:?}")),
            "Aspect" => self.aspect.map(|v| format!("{v:?}")),
            "Mood" => self.mood.map(|v| format!("{v:?}")),
            "Voice" => self.voice.map(|v| format!("{v:?}")),
            "Degree" => self.degree.map(|v| format!("{v:?}")),
            "VerbForm" => self.verb_form.map(|v| format!("{v:?}")),
            other => self.other.get(other).cloned(),
        }
    }
}

/// One component of a (possibly multi-word) morphology: a lemma, a POS,
/// and its feature bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleMorphology {
    pub lemma: String,
    pub pos: Pos,
    pub feats: MorphFeatures,
}

impl SingleMorphology {
    #[must_use]
    pub fn new(lemma: impl Into<String>, pos: Pos) -> Self {
        Self {
            lemma: lemma.into(),
            pos,
            feats: MorphFeatures::default(),
        }
    }

    #[must_use]
    pub fn with_feats(mut self, feats: MorphFeatures) -> Self {
        self.feats = feats;
        self
    }
}

/// An ordered sequence of single-morphology components. Most tokens carry
/// a single-component morphology; multi-word tokens (contractions, verbs
/// with enclitics) carry one component per underlying word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Morphology {
    pub components: Vec<SingleMorphology>,
}

impl Morphology {
    #[must_use]
    pub fn single(component: SingleMorphology) -> Self {
        Self {
            components: vec![component],
        }
    }

    #[must_use]
    pub fn is_single(&self) -> bool {
        self.components.len() == 1
    }

    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.components.len() > 1
    }

    /// The base POS of the first component, used by predicates that only
    /// care about the "headline" category of a (possibly multi-word)
    /// morphology.
    #[must_use]
    pub fn base_pos(&self) -> Option<&Pos> {
        self.components.first().map(|c| &c.pos)
    }
}

/// A morphology candidate paired with the scorer's confidence in [0,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMorphology {
    pub morphology: Morphology,
    pub score: f64,
}

impl ScoredMorphology {
    #[must_use]
    pub fn new(morphology: Morphology, score: f64) -> Self {
        Self { morphology, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::BasePos;

    #[test]
    fn feature_bag_has_and_value_of_structured_field() {
        let mut feats = MorphFeatures::default();
        feats.number = Some(UdNumber::Plural);
        assert!(feats.has("Number"));
        assert_eq!(feats.value_of("Number"), Some("Plural".to_string()));
        assert!(!feats.has("Case"));
    }

    #[test]
    fn feature_bag_falls_back_to_other_map() {
        let mut feats = MorphFeatures::default();
        feats.other.insert("Evident".to_string(), "Fh".to_string());
        assert!(feats.has("Evident"));
        assert_eq!(feats.value_of("Evident"), Some("Fh".to_string()));
    }

    #[test]
    fn morphology_single_vs_multiple() {
        let m = Morphology::single(SingleMorphology::new("cat", Pos::new(BasePos::Noun)));
        assert!(m.is_single());
        assert!(!m.is_multiple());

        let m2 = Morphology {
            components: vec![
                SingleMorphology::new("de", Pos::new(BasePos::Adp)),
                SingleMorphology::new("el", Pos::new(BasePos::Det)),
            ],
        };
        assert!(m2.is_multiple());
        assert_eq!(m2.base_pos().unwrap().base, BasePos::Adp);
    }
}
