//! Non-interactive screening: print what a review session would see.

use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::ValueEnum;

use termcull_core::{open_session, write_candidates_csv, Candidate, CostPerConversion, ReviewProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanFormat {
    Table,
    Csv,
    Json,
}

pub fn cmd_scan(
    report_path: &Path,
    profile: &ReviewProfile,
    format: ScanFormat,
    verbose: bool,
) -> Result<ExitCode> {
    let text = fs::read_to_string(report_path)
        .with_context(|| format!("failed to read report {}", report_path.display()))?;
    let setup = open_session(&text, profile)?;
    let candidates = setup.session.candidates();

    match format {
        ScanFormat::Table => print_table(candidates),
        ScanFormat::Csv => {
            write_candidates_csv(io::stdout().lock(), candidates)
                .context("failed to write CSV to stdout")?;
        }
        ScanFormat::Json => {
            serde_json::to_writer_pretty(io::stdout().lock(), candidates)
                .context("failed to write JSON to stdout")?;
            println!();
        }
    }

    if verbose {
        for skipped in &setup.skipped {
            eprintln!(
                "skipped line {}: {:?} ({})",
                skipped.line, skipped.term, skipped.reason
            );
        }
    }
    eprintln!(
        "kept {} of {} rows",
        candidates.len(),
        candidates.len() + setup.skipped.len()
    );

    Ok(ExitCode::SUCCESS)
}

fn print_table(candidates: &[Candidate]) {
    let term_width = candidates
        .iter()
        .map(|c| c.term.len())
        .chain([11])
        .max()
        .unwrap_or(11);

    println!(
        "{:<term_width$}  {:>10}  {:>11}  {:>7}  {:>10}",
        "Search term", "Spend", "Impressions", "Clicks", "Cost/conv"
    );
    for candidate in candidates {
        println!(
            "{:<term_width$}  {:>10}  {:>11}  {:>7}  {:>10}",
            candidate.term,
            format!("${:.2}", candidate.spend),
            candidate.impressions,
            candidate.clicks,
            cost_cell(candidate.cost_per_conversion),
        );
    }
}

fn cost_cell(cost: CostPerConversion) -> String {
    match cost {
        CostPerConversion::Finite(value) => format!("${:.2}", value),
        CostPerConversion::Unbounded => "--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_cell() {
        assert_eq!(cost_cell(CostPerConversion::Finite(11.275)), "$11.28");
        assert_eq!(cost_cell(CostPerConversion::Unbounded), "--");
    }
}
