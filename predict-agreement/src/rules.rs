//! The agreement rule engine.
//!
//! An attributive adjective agrees with its head noun in gender, number, case,
//! and definiteness — with one systematic exception. Plural nouns denoting
//! irrational (non-human) referents take *deflected* agreement: the adjective
//! is feminine singular regardless of the noun's own gender and number
//! (`mudun kabiyrap` "big cities", not `*mudun kibAr`). This is why the gold
//! morphology carries a rationality feature at all.
//!
//! Every rule abstains rather than guess when its inputs are missing; the
//! evaluation layer counts abstentions separately from errors.

use serde::Serialize;
use treebank_utils::features::{Case, Gender, GrammNumber, NounFeatures, Rationality, State};

/// Predicted adjective features. `None` means the rule abstained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub gender: Option<Gender>,
    pub number: Option<GrammNumber>,
    pub case: Option<Case>,
    pub state: Option<State>,
}

/// Predict the adjective's agreement features from its head noun's functional
/// features.
pub fn predict(head: &NounFeatures) -> Prediction {
    let (gender, number) = predict_gender_number(head);
    Prediction {
        gender,
        number,
        case: predict_case(head),
        state: predict_state(head),
    }
}

fn predict_gender_number(head: &NounFeatures) -> (Option<Gender>, Option<GrammNumber>) {
    match head.number {
        Some(GrammNumber::Plur) => match head.rationality {
            // Deflected agreement: irrational plural heads take f.sg.
            Some(Rationality::Irrational) => (Some(Gender::Fem), Some(GrammNumber::Sing)),
            // Strict agreement: rational plurals copy the head.
            Some(Rationality::Rational) => (head.gender, Some(GrammNumber::Plur)),
            // Without rationality the two patterns can't be told apart.
            Some(Rationality::NotApplicable) | None => (None, None),
        },
        // Singulars and duals always agree strictly.
        Some(n) => (head.gender, Some(n)),
        None => (head.gender, None),
    }
}

fn predict_case(head: &NounFeatures) -> Option<Case> {
    // `u` marks case the annotation left undefined; nothing to copy.
    head.case.filter(|&c| c != Case::Undefined)
}

fn predict_state(head: &NounFeatures) -> Option<State> {
    match head.state {
        Some(State::Definite) => Some(State::Definite),
        Some(State::Indefinite) => Some(State::Indefinite),
        // A construct-state head inherits definiteness from its annexed
        // genitive, which is definite in nearly all attributive contexts.
        Some(State::Construct) => Some(State::Definite),
        None => None,
    }
}
