//! MAGOLD gold-standard morphological analysis files.
//!
//! A MAGOLD file interleaves word lines with analysis lines; only the analysis
//! lines matter here. They start with `*` followed by a score, then
//! whitespace-delimited `key:value` fields, e.g.
//!
//! ```text
//! *1.000000 diac:ma$Akila lex:mu$okilap_1 bw:+ma$Akil/NOUN+a/CASE_DEF_ACC gloss:problems pos:noun gen:f num:p rat:i stt:d cas:a
//! ```
//!
//! What we take from each analysis is the *functional* gender, number, and
//! rationality — the values the agreement model needs — keyed so the analysis
//! can be matched back to treebank tokens.

use rustc_hash::FxHashMap;
use unicode_normalization::UnicodeNormalization;

/// Functional agreement features carried by one gold analysis. Raw MAGOLD
/// codes, kept as-is so synchronization writes exactly what the gold file
/// said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionalFeatures {
    pub gender: String,
    pub number: String,
    pub rationality: String,
}

/// Lookup from a token key (diacritized form or Buckwalter stem) to its
/// functional features. Later analyses overwrite earlier ones for the same
/// key.
pub type MagoldLookup = FxHashMap<String, FunctionalFeatures>;

/// NFC-normalize a lookup key. Keys are usually ASCII Buckwalter, but
/// Arabic-script diac values occur and their diacritics may arrive composed or
/// decomposed depending on the tool that wrote the file.
pub fn normalize_key(key: &str) -> String {
    key.nfc().collect()
}

/// Find `key:value` in an analysis line's whitespace-delimited fields.
pub fn extract_field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.split_whitespace()
        .find_map(|field| field.strip_prefix(key).and_then(|rest| rest.strip_prefix(':')))
}

/// The stem token of a Buckwalter analysis: the first `/`-delimited segment,
/// minus any leading `+` clitic marker. `+ma$Akil/NOUN+a/...` → `ma$Akil`.
pub fn bw_stem(bw: &str) -> &str {
    bw.split('/').next().unwrap_or(bw).trim_start_matches('+')
}

/// Build the key→features lookup from a whole MAGOLD file.
///
/// Analyses missing any of gen/num/rat, or carrying `na` for any of them, are
/// unusable for agreement and are skipped. Each usable analysis is stored
/// under its `diac` value and under its Buckwalter stem, when present.
pub fn build_lookup(text: &str) -> MagoldLookup {
    let mut lookup = MagoldLookup::default();

    for line in text.lines() {
        let line = line.trim();
        if !line.starts_with('*') {
            continue;
        }

        let (Some(gender), Some(number), Some(rationality)) = (
            extract_field(line, "gen"),
            extract_field(line, "num"),
            extract_field(line, "rat"),
        ) else {
            continue;
        };
        if gender == "na" || number == "na" || rationality == "na" {
            continue;
        }

        let features = FunctionalFeatures {
            gender: gender.to_string(),
            number: number.to_string(),
            rationality: rationality.to_string(),
        };

        if let Some(diac) = extract_field(line, "diac") {
            lookup.insert(normalize_key(diac), features.clone());
        }
        if let Some(bw) = extract_field(line, "bw") {
            lookup.insert(normalize_key(bw_stem(bw)), features);
        }
    }

    lookup
}
