//! Synchronizing MAGOLD functional features into a CoNLL-U file.
//!
//! The treebank's FEATS column carries surface-form features from the
//! conversion pipeline; the MAGOLD gold analyses carry the functional gender,
//! number, and rationality the agreement model needs. This pass overwrites
//! `gen`/`num`/`rat` in FEATS with the gold values wherever a token can be
//! keyed back to an analysis through its MISC column.
//!
//! Lines are rewritten only when a value actually changes, so a diff of input
//! against output shows exactly the tokens the gold data corrected.

use std::path::Path;

use anyhow::Context;
use treebank_utils::conllu::{format_pairs_sorted, parse_pairs};
use treebank_utils::magold::{self, MagoldLookup};

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncStats {
    /// Keys in the MAGOLD lookup.
    pub lookup_keys: usize,
    /// Tokens whose MISC key found a MAGOLD analysis.
    pub matched: usize,
    /// Matched tokens whose gen/num/rat actually changed.
    pub updated: usize,
}

/// The MISC key a token can be matched to MAGOLD under. `surface_plus_bw` is
/// the full clitic-attached Buckwalter and matches most reliably;
/// `surface_form_bw` is the fallback.
fn choose_key(misc: &treebank_utils::FeatureMap) -> Option<&str> {
    misc.get("surface_plus_bw")
        .or_else(|| misc.get("surface_form_bw"))
        .map(String::as_str)
}

/// Sync one document's lines against a MAGOLD lookup.
///
/// Comments, blank lines, short lines, and tokens without a usable key or
/// without a lookup hit pass through byte-identical.
pub fn sync_lines(conllu: &str, lookup: &MagoldLookup) -> (Vec<String>, SyncStats) {
    let mut stats = SyncStats {
        lookup_keys: lookup.len(),
        ..SyncStats::default()
    };
    let mut out: Vec<String> = Vec::new();

    for line in conllu.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            out.push(line.to_string());
            continue;
        }

        let mut cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 10 {
            log::debug!("passing through short line: {line:?}");
            out.push(line.to_string());
            continue;
        }

        let mut feats = parse_pairs(cols[5]);
        let misc = parse_pairs(cols[9]);

        let Some(key) = choose_key(&misc) else {
            out.push(line.to_string());
            continue;
        };

        let Some(gold) = lookup.get(&magold::normalize_key(key)) else {
            out.push(line.to_string());
            continue;
        };

        stats.matched += 1;

        let mut changed = false;
        for (feat_key, gold_value) in [
            ("gen", &gold.gender),
            ("num", &gold.number),
            ("rat", &gold.rationality),
        ] {
            if feats.get(feat_key).map(String::as_str) != Some(gold_value) {
                feats.insert(feat_key.to_string(), gold_value.clone());
                changed = true;
            }
        }

        if changed {
            stats.updated += 1;
            let formatted = format_pairs_sorted(&feats);
            cols[5] = &formatted;
            out.push(cols.join("\t"));
        } else {
            out.push(line.to_string());
        }
    }

    (out, stats)
}

/// Read a CoNLL-U file and a MAGOLD file, write the synchronized CoNLL-U.
pub fn run(conllu_in: &Path, magold_in: &Path, conllu_out: &Path) -> anyhow::Result<SyncStats> {
    let conllu = std::fs::read_to_string(conllu_in)
        .with_context(|| format!("Failed to read CoNLL-U input {}", conllu_in.display()))?;
    let magold = std::fs::read_to_string(magold_in)
        .with_context(|| format!("Failed to read MAGOLD input {}", magold_in.display()))?;

    let lookup = magold::build_lookup(&magold);
    let (lines, stats) = sync_lines(&conllu, &lookup);

    std::fs::write(conllu_out, lines.join("\n") + "\n")
        .with_context(|| format!("Failed to write {}", conllu_out.display()))?;

    Ok(stats)
}
