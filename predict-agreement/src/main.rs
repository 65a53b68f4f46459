use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use predict_agreement::{evaluate, pairs, sync};
use treebank_utils::conllu;

const DEFAULT_SAMPLE: usize = 20;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "sync" => {
            let [conllu_in, magold_in, conllu_out] = take_args(&args, "sync")?;
            run_sync(Path::new(conllu_in), Path::new(magold_in), Path::new(conllu_out))
        }
        "extract" => {
            let [conllu_in, out_dir] = take_args(&args, "extract")?;
            run_extract(Path::new(conllu_in), Path::new(out_dir))
        }
        "evaluate" => {
            let [conllu_in, out_dir] = take_args(&args, "evaluate")?;
            let sample = parse_sample_arg(&args, 4)?;
            run_evaluate(Path::new(conllu_in), Path::new(out_dir), sample)
        }
        "pipeline" => {
            let [conllu_in, magold_in, out_dir] = take_args(&args, "pipeline")?;
            let sample = parse_sample_arg(&args, 5)?;
            run_pipeline(
                Path::new(conllu_in),
                Path::new(magold_in),
                Path::new(out_dir),
                sample,
            )
        }
        _ => {
            eprintln!("Error: Unknown command '{command}'");
            print_usage();
            Err(anyhow!("Unknown command"))
        }
    }
}

fn print_usage() {
    eprintln!("Usage: predict-agreement <command> [args...]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  sync <in.conllu> <in.magold> <out.conllu>");
    eprintln!("      Overwrite gen/num/rat in FEATS with MAGOLD functional values");
    eprintln!("  extract <in.conllu> <out-dir>");
    eprintln!("      Extract adjective-noun MOD pairs to CSV and JSONL");
    eprintln!("  evaluate <in.conllu> <out-dir> [--sample N]");
    eprintln!("      Predict adjective agreement from head nouns and score it");
    eprintln!("  pipeline <in.conllu> <in.magold> <out-dir> [--sample N]");
    eprintln!("      sync, extract, and evaluate in one run");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  predict-agreement sync e100.conllu e100.magold e100.SYNC.conllu");
    eprintln!("  predict-agreement pipeline e100.conllu e100.magold ./out --sample 40");
}

fn take_args<'a, const N: usize>(
    args: &'a [String],
    command: &str,
) -> anyhow::Result<[&'a str; N]> {
    if args.len() < 2 + N {
        eprintln!("Error: '{command}' requires {N} arguments");
        print_usage();
        return Err(anyhow!("Missing arguments for '{command}' command"));
    }
    let mut out = [""; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = &args[2 + i];
    }
    Ok(out)
}

/// The mismatch sample size, given either as `--sample N` or as a bare
/// trailing count. Defaults when absent.
fn parse_sample_arg(args: &[String], position: usize) -> anyhow::Result<usize> {
    match args.get(position).map(String::as_str) {
        None => Ok(DEFAULT_SAMPLE),
        Some("--sample") => match args.get(position + 1) {
            Some(value) => value
                .parse()
                .context("Failed to parse sample count as a number"),
            None => Err(anyhow!("'--sample' requires a count")),
        },
        Some(value) => value
            .parse()
            .context("Failed to parse sample count as a number"),
    }
}

fn run_sync(conllu_in: &Path, magold_in: &Path, conllu_out: &Path) -> anyhow::Result<()> {
    println!("CONLLU_IN  : {}", conllu_in.display());
    println!("MAGOLD_IN  : {}", magold_in.display());
    println!("CONLLU_OUT : {}", conllu_out.display());

    let stats = sync::run(conllu_in, magold_in, conllu_out)?;

    println!("MAGOLD lookup size (keys): {}", stats.lookup_keys);
    println!("Tokens matched to MAGOLD (by key): {}", stats.matched);
    println!(
        "Tokens actually updated (gen/num/rat changed): {}",
        stats.updated
    );
    Ok(())
}

fn load_pairs(conllu_in: &Path) -> anyhow::Result<Vec<pairs::AdjNounPair>> {
    let text = std::fs::read_to_string(conllu_in)
        .with_context(|| format!("Failed to read {}", conllu_in.display()))?;
    let sentences = conllu::parse_sentences(&text);
    println!("Read sentences: {}", sentences.len());

    let extracted = pairs::extract_pairs(&sentences);
    println!("Extracted ADJ->NOUN MOD pairs: {}", extracted.len());
    Ok(extracted)
}

fn write_pair_files(extracted: &[pairs::AdjNounPair], out_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let csv_path = out_dir.join("adj_mod_pairs.csv");
    pairs::write_csv(extracted, &csv_path)?;
    println!("Wrote: {}", csv_path.display());

    let jsonl_path = out_dir.join("adj_mod_pairs.jsonl");
    pairs::write_jsonl(extracted, &jsonl_path)?;
    println!("Wrote: {}", jsonl_path.display());
    Ok(())
}

fn run_extract(conllu_in: &Path, out_dir: &Path) -> anyhow::Result<()> {
    let extracted = load_pairs(conllu_in)?;
    write_pair_files(&extracted, out_dir)
}

fn run_evaluate(conllu_in: &Path, out_dir: &Path, sample: usize) -> anyhow::Result<()> {
    let extracted = load_pairs(conllu_in)?;

    let evaluation = evaluate::run(&extracted, out_dir, sample)?;
    evaluate::print_summary(&evaluation);

    println!("Wrote: {}", out_dir.join("report.md").display());
    println!("Wrote: {}", out_dir.join("mismatches.jsonl").display());
    Ok(())
}

fn run_pipeline(
    conllu_in: &Path,
    magold_in: &Path,
    out_dir: &Path,
    sample: usize,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let synced: PathBuf = out_dir.join("synced.conllu");
    run_sync(conllu_in, magold_in, &synced)?;

    println!();
    let extracted = load_pairs(&synced)?;
    write_pair_files(&extracted, out_dir)?;

    println!();
    let evaluation = evaluate::run(&extracted, out_dir, sample)?;
    evaluate::print_summary(&evaluation);
    println!("Wrote: {}", out_dir.join("report.md").display());
    println!("Wrote: {}", out_dir.join("mismatches.jsonl").display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sample_arg_defaults_when_absent() {
        let a = args(&["predict-agreement", "evaluate", "in.conllu", "out"]);
        assert_eq!(parse_sample_arg(&a, 4).unwrap(), DEFAULT_SAMPLE);
    }

    #[test]
    fn test_sample_arg_flag_form() {
        let a = args(&[
            "predict-agreement",
            "evaluate",
            "in.conllu",
            "out",
            "--sample",
            "40",
        ]);
        assert_eq!(parse_sample_arg(&a, 4).unwrap(), 40);
    }

    #[test]
    fn test_sample_arg_positional_form() {
        let a = args(&["predict-agreement", "evaluate", "in.conllu", "out", "40"]);
        assert_eq!(parse_sample_arg(&a, 4).unwrap(), 40);
    }

    #[test]
    fn test_sample_arg_flag_without_count_errors() {
        let a = args(&[
            "predict-agreement",
            "evaluate",
            "in.conllu",
            "out",
            "--sample",
        ]);
        assert!(parse_sample_arg(&a, 4).is_err());
    }

    #[test]
    fn test_sample_arg_non_numeric_errors() {
        let a = args(&["predict-agreement", "evaluate", "in.conllu", "out", "many"]);
        assert!(parse_sample_arg(&a, 4).is_err());
    }
}
