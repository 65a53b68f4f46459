//! Arabic functional morphological features.
//!
//! The treebank encodes these as short MADA-style codes in FEATS (`gen=f`,
//! `num=p`, `cas=n`, `stt=d`, `rat=i`). UD-converted files spell the same
//! information with long keys and values (`Gender=Fem`, `Definite=Def`); both
//! spellings are accepted on read. Functional gender and number describe how a
//! word *agrees*, not how it is spelled — a broken plural like `mdn` "cities"
//! is functionally feminine singular for agreement purposes even though
//! nothing in its form says so.

use crate::conllu::FeatureMap;

/// Functional gender.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Gender {
    #[serde(rename = "m")]
    Masc,
    #[serde(rename = "f")]
    Fem,
}

impl Gender {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" | "Masc" => Some(Gender::Masc),
            "f" | "Fem" => Some(Gender::Fem),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Gender::Masc => "m",
            Gender::Fem => "f",
        }
    }
}

/// Functional number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum GrammNumber {
    #[serde(rename = "s")]
    Sing,
    #[serde(rename = "d")]
    Dual,
    #[serde(rename = "p")]
    Plur,
}

impl GrammNumber {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "s" | "Sing" => Some(GrammNumber::Sing),
            "d" | "Dual" => Some(GrammNumber::Dual),
            "p" | "Plur" => Some(GrammNumber::Plur),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            GrammNumber::Sing => "s",
            GrammNumber::Dual => "d",
            GrammNumber::Plur => "p",
        }
    }
}

/// Rationality (humanness). A lexical property of nouns; it never appears on
/// adjectives but decides which agreement pattern a plural noun takes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Rationality {
    #[serde(rename = "r")]
    Rational,
    #[serde(rename = "i")]
    Irrational,
    #[serde(rename = "na")]
    NotApplicable,
}

impl Rationality {
    /// Both the `y`/`n` and `r`/`i` code families occur in MAGOLD-era data.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "y" | "r" => Some(Rationality::Rational),
            "n" | "i" => Some(Rationality::Irrational),
            "na" | "-" => Some(Rationality::NotApplicable),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Rationality::Rational => "r",
            Rationality::Irrational => "i",
            Rationality::NotApplicable => "na",
        }
    }
}

/// Morphological case. `u` marks case left undefined by the annotation
/// (typically undiacritized text).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Case {
    #[serde(rename = "n")]
    Nom,
    #[serde(rename = "a")]
    Acc,
    #[serde(rename = "g")]
    Gen,
    #[serde(rename = "u")]
    Undefined,
}

impl Case {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "n" | "Nom" => Some(Case::Nom),
            "a" | "Acc" => Some(Case::Acc),
            "g" | "Gen" => Some(Case::Gen),
            "u" => Some(Case::Undefined),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Case::Nom => "n",
            Case::Acc => "a",
            Case::Gen => "g",
            Case::Undefined => "u",
        }
    }
}

/// State (definiteness). Arabic grammar calls this the noun's state; the
/// construct state marks the head of an idafa, whose definiteness comes from
/// its annexed genitive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum State {
    #[serde(rename = "d")]
    Definite,
    #[serde(rename = "i")]
    Indefinite,
    #[serde(rename = "c")]
    Construct,
}

impl State {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "d" | "Def" => Some(State::Definite),
            "i" | "Ind" => Some(State::Indefinite),
            "c" | "Cons" => Some(State::Construct),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            State::Definite => "d",
            State::Indefinite => "i",
            State::Construct => "c",
        }
    }
}

fn lookup<'a>(feats: &'a FeatureMap, short_key: &str, ud_key: &str) -> Option<&'a str> {
    feats
        .get(short_key)
        .or_else(|| feats.get(ud_key))
        .map(String::as_str)
}

/// The head noun's functional features, as far as the FEATS column gives them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NounFeatures {
    pub gender: Option<Gender>,
    pub number: Option<GrammNumber>,
    pub rationality: Option<Rationality>,
    pub case: Option<Case>,
    pub state: Option<State>,
}

impl NounFeatures {
    pub fn from_feats(feats: &FeatureMap) -> Self {
        NounFeatures {
            gender: lookup(feats, "gen", "Gender").and_then(Gender::from_code),
            number: lookup(feats, "num", "Number").and_then(GrammNumber::from_code),
            rationality: feats.get("rat").and_then(|c| Rationality::from_code(c)),
            case: lookup(feats, "cas", "Case").and_then(Case::from_code),
            state: lookup(feats, "stt", "Definite").and_then(State::from_code),
        }
    }
}

/// The features an adjective actually carries; what the rule engine's
/// predictions are scored against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjFeatures {
    pub gender: Option<Gender>,
    pub number: Option<GrammNumber>,
    pub case: Option<Case>,
    pub state: Option<State>,
}

impl AdjFeatures {
    pub fn from_feats(feats: &FeatureMap) -> Self {
        AdjFeatures {
            gender: lookup(feats, "gen", "Gender").and_then(Gender::from_code),
            number: lookup(feats, "num", "Number").and_then(GrammNumber::from_code),
            case: lookup(feats, "cas", "Case").and_then(Case::from_code),
            state: lookup(feats, "stt", "Definite").and_then(State::from_code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conllu::parse_pairs;

    #[test]
    fn test_short_codes() {
        assert_eq!(Gender::from_code("f"), Some(Gender::Fem));
        assert_eq!(GrammNumber::from_code("d"), Some(GrammNumber::Dual));
        assert_eq!(Rationality::from_code("i"), Some(Rationality::Irrational));
        assert_eq!(Rationality::from_code("y"), Some(Rationality::Rational));
        assert_eq!(Case::from_code("g"), Some(Case::Gen));
        assert_eq!(State::from_code("c"), Some(State::Construct));
        assert_eq!(Gender::from_code("x"), None);
    }

    #[test]
    fn test_ud_fallback_codes() {
        assert_eq!(Gender::from_code("Fem"), Some(Gender::Fem));
        assert_eq!(GrammNumber::from_code("Plur"), Some(GrammNumber::Plur));
        assert_eq!(Case::from_code("Nom"), Some(Case::Nom));
        assert_eq!(State::from_code("Cons"), Some(State::Construct));
    }

    #[test]
    fn test_noun_features_from_short_keys() {
        let feats = parse_pairs("cas=n|gen=f|num=p|rat=i|stt=d");
        let noun = NounFeatures::from_feats(&feats);
        assert_eq!(noun.gender, Some(Gender::Fem));
        assert_eq!(noun.number, Some(GrammNumber::Plur));
        assert_eq!(noun.rationality, Some(Rationality::Irrational));
        assert_eq!(noun.case, Some(Case::Nom));
        assert_eq!(noun.state, Some(State::Definite));
    }

    #[test]
    fn test_noun_features_from_ud_keys() {
        let feats = parse_pairs("Case=Gen|Definite=Ind|Gender=Masc|Number=Sing");
        let noun = NounFeatures::from_feats(&feats);
        assert_eq!(noun.gender, Some(Gender::Masc));
        assert_eq!(noun.number, Some(GrammNumber::Sing));
        assert_eq!(noun.case, Some(Case::Gen));
        assert_eq!(noun.state, Some(State::Indefinite));
        assert_eq!(noun.rationality, None);
    }

    #[test]
    fn test_adj_features_partial() {
        let feats = parse_pairs("gen=m");
        let adj = AdjFeatures::from_feats(&feats);
        assert_eq!(adj.gender, Some(Gender::Masc));
        assert_eq!(adj.number, None);
        assert_eq!(adj.case, None);
        assert_eq!(adj.state, None);
    }
}
