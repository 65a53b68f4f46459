//! Extracting adjective–noun modifier pairs.
//!
//! In the CATiB-style trees this data uses, UPOS/XPOS is usually just `NOM`,
//! so part of speech has to come from the MISC column, where the conversion
//! kept the Buckwalter (`bw`), MADA (`mada`), and Kulick (`kulick`) tags. A
//! pair is an adjective attached to a noun-like head with the `MOD` relation.

use std::io::Write as _;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use treebank_utils::conllu::{FeatureMap, Sentence};

/// One extracted adjective–noun pair. FEATS and MISC are kept raw so the
/// output is a faithful slice of the treebank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjNounPair {
    pub sent_idx: usize,
    pub adj_id: u32,
    pub adj_form: String,
    pub adj_lemma: String,
    pub adj_feats: String,
    pub adj_misc: String,
    pub head_id: u32,
    pub head_form: String,
    pub head_lemma: String,
    pub head_feats: String,
    pub head_misc: String,
    pub deprel: String,
}

/// Does MISC mark this token as an adjective? Any of the three tag schemes is
/// enough; `ADJ` may also sit after a clitic inside the bw tag.
pub fn is_adjective(misc: &FeatureMap) -> bool {
    let bw = misc.get("bw").map(String::as_str).unwrap_or("");
    if bw.starts_with("ADJ") {
        return true;
    }
    if misc.get("mada").map(String::as_str) == Some("adj") {
        return true;
    }
    if misc.get("kulick").map(String::as_str) == Some("JJ") {
        return true;
    }
    bw.split('+').any(|segment| segment == "ADJ")
}

/// Does MISC mark this token as noun-like? Deliberately stricter than the
/// adjective test: NUM, PROPN and friends also head MOD dependents, and those
/// pairs follow different agreement patterns.
pub fn is_noun_like(misc: &FeatureMap) -> bool {
    let bw = misc.get("bw").map(String::as_str).unwrap_or("");
    bw.starts_with("NOUN") || misc.get("mada").map(String::as_str) == Some("noun")
}

/// Extract all adjective→noun MOD pairs. Sentence indices are 1-based, in
/// file order.
pub fn extract_pairs(sentences: &[Sentence]) -> Vec<AdjNounPair> {
    let mut pairs = Vec::new();

    for (sent_idx, sentence) in sentences.iter().enumerate() {
        for dep in &sentence.tokens {
            if dep.deprel != "MOD" || !is_adjective(&dep.misc) {
                continue;
            }
            let Some(head) = sentence.token_by_id(dep.head) else {
                continue;
            };
            if !is_noun_like(&head.misc) {
                continue;
            }

            pairs.push(AdjNounPair {
                sent_idx: sent_idx + 1,
                adj_id: dep.id,
                adj_form: dep.form.clone(),
                adj_lemma: dep.lemma.clone(),
                adj_feats: dep.feats_raw.clone(),
                adj_misc: dep.misc_raw.clone(),
                head_id: head.id,
                head_form: head.form.clone(),
                head_lemma: head.lemma.clone(),
                head_feats: head.feats_raw.clone(),
                head_misc: head.misc_raw.clone(),
                deprel: dep.deprel.clone(),
            });
        }
    }

    pairs
}

const CSV_HEADER: &str = "sent_idx,adj_id,adj_form,adj_lemma,adj_feats,adj_misc,\
head_id,head_form,head_lemma,head_feats,head_misc,deprel";

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write pairs as CSV, one row per pair.
pub fn write_csv(pairs: &[AdjNounPair], path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);

    writeln!(writer, "{CSV_HEADER}")?;
    for pair in pairs {
        let row = [
            pair.sent_idx.to_string(),
            pair.adj_id.to_string(),
            csv_field(&pair.adj_form),
            csv_field(&pair.adj_lemma),
            csv_field(&pair.adj_feats),
            csv_field(&pair.adj_misc),
            pair.head_id.to_string(),
            csv_field(&pair.head_form),
            csv_field(&pair.head_lemma),
            csv_field(&pair.head_feats),
            csv_field(&pair.head_misc),
            csv_field(&pair.deprel),
        ];
        writeln!(writer, "{}", row.join(","))?;
    }

    Ok(())
}

/// Write pairs as JSONL, one object per line.
pub fn write_jsonl(pairs: &[AdjNounPair], path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);

    for pair in pairs {
        let json = serde_json::to_string(pair)?;
        writeln!(writer, "{json}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use treebank_utils::conllu::{parse_pairs, parse_sentences};

    #[test]
    fn test_is_adjective_signals() {
        assert!(is_adjective(&parse_pairs("bw=ADJ+NSUFF_FEM_SG")));
        assert!(is_adjective(&parse_pairs("mada=adj")));
        assert!(is_adjective(&parse_pairs("kulick=JJ")));
        assert!(is_adjective(&parse_pairs("bw=DET+ADJ")));
        assert!(!is_adjective(&parse_pairs("bw=NOUN|mada=noun")));
        assert!(!is_adjective(&parse_pairs("_")));
    }

    #[test]
    fn test_is_noun_like() {
        assert!(is_noun_like(&parse_pairs("bw=NOUN+CASE_DEF_NOM")));
        assert!(is_noun_like(&parse_pairs("mada=noun")));
        assert!(!is_noun_like(&parse_pairs("bw=ADJ|mada=adj")));
        assert!(!is_noun_like(&parse_pairs("mada=noun_prop")));
    }

    fn sentence(lines: &[&str]) -> String {
        lines.join("\n") + "\n"
    }

    #[test]
    fn test_extract_pairs_basic() {
        let text = sentence(&[
            "1\tAlmdynp\tmadiynap\tNOM\tNOM\tgen=f|num=s|rat=n\t0\tROOT\t_\tbw=NOUN|mada=noun",
            "2\tAlkbyrp\tkabiyr\tNOM\tNOM\tgen=f|num=s\t1\tMOD\t_\tbw=ADJ|mada=adj",
        ]);
        let pairs = extract_pairs(&parse_sentences(&text));

        assert_eq!(pairs.len(), 1);
        let pair = &pairs[0];
        assert_eq!(pair.sent_idx, 1);
        assert_eq!(pair.adj_form, "Alkbyrp");
        assert_eq!(pair.head_form, "Almdynp");
        assert_eq!(pair.head_feats, "gen=f|num=s|rat=n");
        assert_eq!(pair.deprel, "MOD");
    }

    #[test]
    fn test_extract_requires_mod_relation() {
        let text = sentence(&[
            "1\tAlmdynp\tmadiynap\tNOM\tNOM\t_\t0\tROOT\t_\tbw=NOUN",
            "2\tAlkbyrp\tkabiyr\tNOM\tNOM\t_\t1\tPRD\t_\tbw=ADJ",
        ]);
        assert!(extract_pairs(&parse_sentences(&text)).is_empty());
    }

    #[test]
    fn test_extract_requires_noun_like_head() {
        // Adjective modifying an adjective (e.g. inside a coordination
        // artifact) is not an agreement pair.
        let text = sentence(&[
            "1\tkbyr\tkabiyr\tNOM\tNOM\t_\t0\tROOT\t_\tbw=ADJ|mada=adj",
            "2\tjdyd\tjadiyd\tNOM\tNOM\t_\t1\tMOD\t_\tbw=ADJ|mada=adj",
        ]);
        assert!(extract_pairs(&parse_sentences(&text)).is_empty());
    }

    #[test]
    fn test_extract_skips_dangling_head() {
        let text = sentence(&[
            "2\tAlkbyrp\tkabiyr\tNOM\tNOM\t_\t7\tMOD\t_\tbw=ADJ",
        ]);
        assert!(extract_pairs(&parse_sentences(&text)).is_empty());
    }

    #[test]
    fn test_sentence_indices_are_one_based_and_ordered() {
        let text = concat!(
            "1\tA\ta\tNOM\tNOM\t_\t0\tROOT\t_\tbw=NOUN\n",
            "\n",
            "1\tAlmdn\tmadiynap\tNOM\tNOM\t_\t0\tROOT\t_\tbw=NOUN\n",
            "2\tAlkbyrp\tkabiyr\tNOM\tNOM\t_\t1\tMOD\t_\tbw=ADJ\n",
        );
        let pairs = extract_pairs(&parse_sentences(text));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].sent_idx, 2);
    }

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"no\""), "\"say \"\"no\"\"\"");
    }

    #[test]
    fn test_write_csv_and_jsonl() {
        let text = sentence(&[
            "1\tAlmdynp\tmadiynap\tNOM\tNOM\tgen=f|num=s\t0\tROOT\t_\tbw=NOUN",
            "2\tAlkbyrp\tkabiyr\tNOM\tNOM\tgen=f|num=s\t1\tMOD\t_\tbw=ADJ",
        ]);
        let pairs = extract_pairs(&parse_sentences(&text));
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("pairs.csv");
        write_csv(&pairs, &csv_path).unwrap();
        let csv = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(
            lines.next(),
            Some("1,2,Alkbyrp,kabiyr,gen=f|num=s,bw=ADJ,1,Almdynp,madiynap,gen=f|num=s,bw=NOUN,MOD")
        );

        let jsonl_path = dir.path().join("pairs.jsonl");
        write_jsonl(&pairs, &jsonl_path).unwrap();
        let jsonl = std::fs::read_to_string(&jsonl_path).unwrap();
        let parsed: AdjNounPair = serde_json::from_str(jsonl.lines().next().unwrap()).unwrap();
        assert_eq!(parsed.adj_form, "Alkbyrp");
    }
}
