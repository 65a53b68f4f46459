//! Scoring rule predictions against observed adjective features.
//!
//! Every pair is scored on four dimensions independently. A dimension is
//! *skipped* (not wrong) when the rule abstained or the treebank doesn't
//! annotate the adjective for it; accuracy is reported over the scored subset
//! so missing annotation never inflates or deflates the numbers.

use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use serde::Serialize;
use treebank_utils::conllu::parse_pairs;
use treebank_utils::features::{AdjFeatures, Case, NounFeatures};

use crate::pairs::AdjNounPair;
use crate::rules;

/// Outcome counts for one agreement dimension.
#[derive(Debug, Clone, Default)]
pub struct DimensionTally {
    pub correct: usize,
    pub incorrect: usize,
    pub skipped: usize,
    /// (predicted code, observed code) → count, over scored pairs.
    pub confusion: BTreeMap<(&'static str, &'static str), usize>,
}

impl DimensionTally {
    /// Accuracy over scored pairs; `None` when nothing was scored.
    pub fn accuracy(&self) -> Option<f64> {
        let scored = self.correct + self.incorrect;
        (scored > 0).then(|| self.correct as f64 / scored as f64)
    }

    /// Returns the (predicted, observed) codes when they disagree.
    fn score(
        &mut self,
        predicted: Option<&'static str>,
        observed: Option<&'static str>,
    ) -> Option<(&'static str, &'static str)> {
        let (Some(predicted), Some(observed)) = (predicted, observed) else {
            self.skipped += 1;
            return None;
        };
        *self.confusion.entry((predicted, observed)).or_default() += 1;
        if predicted == observed {
            self.correct += 1;
            None
        } else {
            self.incorrect += 1;
            Some((predicted, observed))
        }
    }
}

/// One prediction that disagreed with the treebank.
#[derive(Debug, Clone, Serialize)]
pub struct Mismatch {
    pub sent_idx: usize,
    pub adj_id: u32,
    pub adj_form: String,
    pub adj_lemma: String,
    pub head_form: String,
    pub head_lemma: String,
    pub dimension: &'static str,
    pub predicted: &'static str,
    pub observed: &'static str,
    pub head_feats: String,
    pub adj_feats: String,
}

#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub pairs_total: usize,
    pub gender: DimensionTally,
    pub number: DimensionTally,
    pub case: DimensionTally,
    pub definiteness: DimensionTally,
    pub mismatches: Vec<Mismatch>,
}

impl Evaluation {
    pub fn dimensions(&self) -> [(&'static str, &DimensionTally); 4] {
        [
            ("gender", &self.gender),
            ("number", &self.number),
            ("case", &self.case),
            ("definiteness", &self.definiteness),
        ]
    }

    fn score_pair(&mut self, pair: &AdjNounPair) {
        self.pairs_total += 1;

        let head = NounFeatures::from_feats(&parse_pairs(&pair.head_feats));
        let observed = AdjFeatures::from_feats(&parse_pairs(&pair.adj_feats));
        let predicted = rules::predict(&head);

        // An adjective whose own case is undefined gives nothing to score
        // against.
        let observed_case = observed.case.filter(|&c| c != Case::Undefined);

        let outcomes: [(&'static str, &mut DimensionTally, Option<&'static str>, Option<&'static str>); 4] = [
            (
                "gender",
                &mut self.gender,
                predicted.gender.map(|v| v.code()),
                observed.gender.map(|v| v.code()),
            ),
            (
                "number",
                &mut self.number,
                predicted.number.map(|v| v.code()),
                observed.number.map(|v| v.code()),
            ),
            (
                "case",
                &mut self.case,
                predicted.case.map(|v| v.code()),
                observed_case.map(|v| v.code()),
            ),
            (
                "definiteness",
                &mut self.definiteness,
                predicted.state.map(|v| v.code()),
                observed.state.map(|v| v.code()),
            ),
        ];

        for (dimension, tally, predicted_code, observed_code) in outcomes {
            if let Some((predicted, observed)) = tally.score(predicted_code, observed_code) {
                self.mismatches.push(Mismatch {
                    sent_idx: pair.sent_idx,
                    adj_id: pair.adj_id,
                    adj_form: pair.adj_form.clone(),
                    adj_lemma: pair.adj_lemma.clone(),
                    head_form: pair.head_form.clone(),
                    head_lemma: pair.head_lemma.clone(),
                    dimension,
                    predicted,
                    observed,
                    head_feats: pair.head_feats.clone(),
                    adj_feats: pair.adj_feats.clone(),
                });
            }
        }
    }
}

/// Score every pair. Pure; no output.
pub fn evaluate_pairs(pairs: &[AdjNounPair]) -> Evaluation {
    let mut evaluation = Evaluation::default();
    for pair in pairs {
        evaluation.score_pair(pair);
    }
    evaluation
}

/// Score every pair and write the report files into `out_dir`:
/// `report.md`, `mismatches.jsonl`, and a deterministic mismatch sample
/// inside the report for qualitative review.
pub fn run(
    pairs: &[AdjNounPair],
    out_dir: &Path,
    sample_target: usize,
) -> anyhow::Result<Evaluation> {
    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut evaluation = Evaluation::default();
    for pair in pairs {
        evaluation.score_pair(pair);
        pb.inc(1);
    }
    pb.finish_and_clear();

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    write_mismatches_jsonl(&evaluation.mismatches, &out_dir.join("mismatches.jsonl"))?;
    write_report(&evaluation, sample_target, &out_dir.join("report.md"))?;

    Ok(evaluation)
}

fn write_mismatches_jsonl(mismatches: &[Mismatch], path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    for mismatch in mismatches {
        writeln!(writer, "{}", serde_json::to_string(mismatch)?)?;
    }
    Ok(())
}

fn write_report(
    evaluation: &Evaluation,
    sample_target: usize,
    path: &Path,
) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = std::io::BufWriter::new(file);

    writeln!(w, "# Adjectival agreement evaluation")?;
    writeln!(w)?;
    writeln!(w, "Scored {} adjective–noun pairs.", evaluation.pairs_total)?;
    writeln!(w)?;
    writeln!(w, "| Dimension | Correct | Incorrect | Skipped | Accuracy |")?;
    writeln!(w, "|---|---:|---:|---:|---:|")?;
    for (name, tally) in evaluation.dimensions() {
        let accuracy = tally
            .accuracy()
            .map(|a| format!("{:.1}%", a * 100.0))
            .unwrap_or_else(|| "—".to_string());
        writeln!(
            w,
            "| {name} | {} | {} | {} | {accuracy} |",
            tally.correct, tally.incorrect, tally.skipped
        )?;
    }

    for (name, tally) in evaluation.dimensions() {
        if tally.confusion.is_empty() {
            continue;
        }
        writeln!(w)?;
        writeln!(w, "## Confusions: {name}")?;
        writeln!(w)?;
        writeln!(w, "| Predicted | Observed | Count |")?;
        writeln!(w, "|---|---|---:|")?;
        for (&(predicted, observed), &count) in tally
            .confusion
            .iter()
            .sorted_by_key(|&(_, &count)| std::cmp::Reverse(count))
        {
            writeln!(w, "| {predicted} | {observed} | {count} |")?;
        }
    }

    let (sample, stats) = pair_sampler::sample_to_target_with_stats(
        evaluation.mismatches.clone(),
        sample_target,
        |m| (m.sent_idx, m.adj_id, m.dimension),
    );
    writeln!(w)?;
    if stats.was_sampled {
        writeln!(
            w,
            "## Mismatch sample ({} of {})",
            stats.kept_count, stats.input_count
        )?;
    } else {
        writeln!(w, "## All mismatches ({})", stats.kept_count)?;
    }
    writeln!(w)?;
    writeln!(
        w,
        "| Sentence | Adjective | Head noun | Dimension | Predicted | Observed |"
    )?;
    writeln!(w, "|---:|---|---|---|---|---|")?;
    for m in &sample {
        writeln!(
            w,
            "| {} | {} | {} | {} | {} | {} |",
            m.sent_idx, m.adj_form, m.head_form, m.dimension, m.predicted, m.observed
        )?;
    }

    Ok(())
}

/// One-paragraph stdout summary for the operator.
pub fn print_summary(evaluation: &Evaluation) {
    println!("Evaluated {} pairs", evaluation.pairs_total);
    for (name, tally) in evaluation.dimensions() {
        match tally.accuracy() {
            Some(accuracy) => println!(
                "  {name}: {:.1}% ({} correct, {} incorrect, {} skipped)",
                accuracy * 100.0,
                tally.correct,
                tally.incorrect,
                tally.skipped
            ),
            None => println!("  {name}: nothing scored ({} skipped)", tally.skipped),
        }
    }
}
