//! CoNLL-U reading and writing.
//!
//! The treebank files this crate consumes are PATB-derived CoNLL-U: ten
//! tab-separated columns per token, `key=value` pairs joined with `|` in the
//! FEATS and MISC columns, sentences separated by blank lines. Multiword-token
//! ranges (`1-2`) and empty nodes (`1.1`) are carried through verbatim but are
//! never surfaced as tokens.

use indexmap::IndexMap;

/// FEATS / MISC contents, in file order. Duplicate keys keep the last value.
pub type FeatureMap = IndexMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum ConlluError {
    #[error("token line has {found} columns, expected 10: {line:?}")]
    ShortLine { line: String, found: usize },

    #[error("invalid token id {value:?}")]
    InvalidId {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// One syntactic word. Head `0` means the root (or an unparseable HEAD column,
/// which the source data occasionally contains).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: u32,
    pub form: String,
    pub lemma: String,
    pub upos: String,
    pub xpos: String,
    pub feats: FeatureMap,
    pub feats_raw: String,
    pub head: u32,
    pub deprel: String,
    pub deps: String,
    pub misc: FeatureMap,
    pub misc_raw: String,
}

#[derive(Debug, Clone, Default)]
pub struct Sentence {
    /// Comment lines and MWT/empty-node lines, verbatim.
    pub opaque_lines: Vec<String>,
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn token_by_id(&self, id: u32) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }
}

/// Parse a `k=v|k=v` column. `_` and the empty string mean "no pairs"; parts
/// without `=` are dropped, matching how the annotation tools emit them.
pub fn parse_pairs(column: &str) -> FeatureMap {
    let column = column.trim();
    let mut out = FeatureMap::new();
    if column.is_empty() || column == "_" {
        return out;
    }
    for part in column.split('|') {
        if let Some((k, v)) = part.split_once('=') {
            out.insert(k.to_string(), v.to_string());
        }
    }
    out
}

/// Render a pair map with keys sorted. Stable order keeps diffs between a
/// treebank and its synchronized copy readable.
pub fn format_pairs_sorted(pairs: &FeatureMap) -> String {
    if pairs.is_empty() {
        return "_".to_string();
    }
    let mut keys: Vec<&String> = pairs.keys().collect();
    keys.sort();
    keys.iter()
        .map(|k| format!("{k}={}", pairs[k.as_str()]))
        .collect::<Vec<_>>()
        .join("|")
}

/// Parse a single line as a token.
///
/// Returns `Ok(None)` for comments, MWT ranges, and empty nodes. Blank lines
/// are the caller's concern (they delimit sentences).
pub fn parse_token_line(line: &str) -> Result<Option<Token>, ConlluError> {
    if line.starts_with('#') {
        return Ok(None);
    }

    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < 10 {
        return Err(ConlluError::ShortLine {
            line: line.to_string(),
            found: cols.len(),
        });
    }

    let id_col = cols[0];
    if id_col.contains('-') || id_col.contains('.') {
        return Ok(None);
    }

    let id: u32 = id_col.parse().map_err(|source| ConlluError::InvalidId {
        value: id_col.to_string(),
        source,
    })?;

    // HEAD is sometimes `_` or garbage in converted treebanks; fall back to 0.
    let head: u32 = cols[6].parse().unwrap_or(0);

    Ok(Some(Token {
        id,
        form: cols[1].to_string(),
        lemma: cols[2].to_string(),
        upos: cols[3].to_string(),
        xpos: cols[4].to_string(),
        feats: parse_pairs(cols[5]),
        feats_raw: cols[5].to_string(),
        head,
        deprel: cols[7].to_string(),
        deps: cols[8].to_string(),
        misc: parse_pairs(cols[9]),
        misc_raw: cols[9].to_string(),
    }))
}

/// Group raw lines into sentences (blank-line separated). No parsing.
pub fn split_sentences(text: &str) -> Vec<Vec<String>> {
    let mut sentences: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(line.to_string());
    }
    if !current.is_empty() {
        sentences.push(current);
    }
    sentences
}

/// Parse a whole document into sentences. Malformed token lines are kept as
/// opaque lines and logged rather than aborting the read; treebank conversion
/// artifacts should not cost us the rest of the file.
pub fn parse_sentences(text: &str) -> Vec<Sentence> {
    split_sentences(text)
        .into_iter()
        .map(|lines| {
            let mut sentence = Sentence::default();
            for line in lines {
                match parse_token_line(&line) {
                    Ok(Some(token)) => sentence.tokens.push(token),
                    Ok(None) => sentence.opaque_lines.push(line),
                    Err(e) => {
                        log::warn!("skipping malformed token line: {e}");
                        sentence.opaque_lines.push(line);
                    }
                }
            }
            sentence
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs_empty_and_underscore() {
        assert!(parse_pairs("").is_empty());
        assert!(parse_pairs("_").is_empty());
        assert!(parse_pairs("  ").is_empty());
    }

    #[test]
    fn test_parse_pairs_multi() {
        let pairs = parse_pairs("gen=f|num=p|rat=i");
        assert_eq!(pairs.get("gen").map(String::as_str), Some("f"));
        assert_eq!(pairs.get("num").map(String::as_str), Some("p"));
        assert_eq!(pairs.get("rat").map(String::as_str), Some("i"));
    }

    #[test]
    fn test_parse_pairs_drops_valueless_parts() {
        let pairs = parse_pairs("gen=f|junk|num=s");
        assert_eq!(pairs.len(), 2);
        assert!(!pairs.contains_key("junk"));
    }

    #[test]
    fn test_parse_pairs_duplicate_key_last_wins() {
        let pairs = parse_pairs("gen=m|gen=f");
        assert_eq!(pairs.get("gen").map(String::as_str), Some("f"));
    }

    #[test]
    fn test_format_pairs_sorted() {
        let pairs = parse_pairs("num=p|gen=f|cas=n");
        assert_eq!(format_pairs_sorted(&pairs), "cas=n|gen=f|num=p");
        assert_eq!(format_pairs_sorted(&FeatureMap::new()), "_");
    }

    #[test]
    fn test_parse_token_line_basic() {
        let line = "3\tAlkitAbu\tkitAb\tNOM\tNOM\tcas=n|gen=m|num=s\t2\tMOD\t_\tbw=kitAb/NOUN|mada=noun";
        let token = parse_token_line(line).unwrap().unwrap();
        assert_eq!(token.id, 3);
        assert_eq!(token.form, "AlkitAbu");
        assert_eq!(token.head, 2);
        assert_eq!(token.deprel, "MOD");
        assert_eq!(token.feats.get("cas").map(String::as_str), Some("n"));
        assert_eq!(token.misc.get("mada").map(String::as_str), Some("noun"));
    }

    #[test]
    fn test_parse_token_line_skips_comments_and_ranges() {
        assert!(parse_token_line("# sent_id = 1").unwrap().is_none());
        assert!(
            parse_token_line("1-2\tbAlqalami\t_\t_\t_\t_\t_\t_\t_\t_")
                .unwrap()
                .is_none()
        );
        assert!(
            parse_token_line("2.1\t_\t_\t_\t_\t_\t_\t_\t_\t_")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_parse_token_line_short_line_errors() {
        let err = parse_token_line("1\tkitAb\tkitAb").unwrap_err();
        assert!(matches!(err, ConlluError::ShortLine { found: 3, .. }));
    }

    #[test]
    fn test_parse_token_line_nondigit_head_falls_back() {
        let line = "1\tkitAb\tkitAb\tNOM\tNOM\t_\t_\tMOD\t_\t_";
        let token = parse_token_line(line).unwrap().unwrap();
        assert_eq!(token.head, 0);
    }

    #[test]
    fn test_parse_sentences_splits_on_blank_lines() {
        let text = "# first\n1\tA\ta\tNOM\tNOM\t_\t0\tROOT\t_\t_\n\n1\tB\tb\tNOM\tNOM\t_\t0\tROOT\t_\t_\n";
        let sentences = parse_sentences(text);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].opaque_lines, vec!["# first"]);
        assert_eq!(sentences[0].tokens.len(), 1);
        assert_eq!(sentences[1].tokens[0].form, "B");
    }

    #[test]
    fn test_token_by_id() {
        let text = "1\tA\ta\tNOM\tNOM\t_\t2\tMOD\t_\t_\n2\tB\tb\tNOM\tNOM\t_\t0\tROOT\t_\t_\n";
        let sentences = parse_sentences(text);
        let head = sentences[0].token_by_id(2).unwrap();
        assert_eq!(head.form, "B");
        assert!(sentences[0].token_by_id(9).is_none());
    }
}
