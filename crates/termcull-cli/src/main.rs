//! termcull: cull advertising search terms into negative keyword lists.

mod review;
mod scan;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use termcull_core::{
    validate_profile_schema, ReportFormat, ReviewProfile, Thresholds,
};

use scan::ScanFormat;

#[derive(Parser)]
#[command(name = "termcull")]
#[command(about = "Review advertising search terms and build negative keyword lists")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively review filtered search terms (y/n per term)
    #[command(after_help = "\
Keys during review:
  y   add the term as a negative keyword
  n   skip the term
  q   abort without writing anything

Examples:
  termcull review search-terms.csv --min-spend 10 --min-cpc 5
  termcull review search-terms.csv --profile profiles/google-ads.yaml
  termcull review report.csv --min-spend 10 --min-cpc 5 --plain -o negatives.txt")]
    Review {
        /// Search-term report CSV
        report: PathBuf,

        #[command(flatten)]
        select: SelectArgs,

        /// Output file for accepted terms (default from the profile)
        #[arg(long, short = 'o', value_name = "FILE")]
        out: Option<PathBuf>,

        /// Write bare terms instead of [exact match] syntax
        #[arg(long)]
        plain: bool,
    },

    /// Filter a report and print the surviving terms without reviewing
    Scan {
        /// Search-term report CSV
        report: PathBuf,

        #[command(flatten)]
        select: SelectArgs,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "table")]
        format: ScanFormat,

        /// Also print skipped rows, with reasons
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Check a review profile file against the profile schema
    Validate {
        /// Profile file (YAML or JSON)
        profile: PathBuf,
    },
}

/// Profile and threshold selection, shared by review and scan.
#[derive(Args)]
struct SelectArgs {
    /// Review profile file (YAML or JSON)
    #[arg(long, short = 'p', value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Minimum spend for a term to surface (overrides the profile)
    #[arg(long, value_name = "DOLLARS")]
    min_spend: Option<f64>,

    /// Minimum cost per conversion for a term to surface (overrides the profile)
    #[arg(long, value_name = "DOLLARS")]
    min_cpc: Option<f64>,

    /// Report layout
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    GoogleAds,
    AmazonAds,
}

impl From<LayoutArg> for ReportFormat {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::GoogleAds => ReportFormat::GoogleAds,
            LayoutArg::AmazonAds => ReportFormat::AmazonAds,
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so piped stdout stays clean. `TERMCULL_LOG` takes
/// the usual env-filter directives.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TERMCULL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Review {
            report,
            select,
            out,
            plain,
        } => {
            let profile = resolve_profile(&select)?;
            review::cmd_review(&report, profile, out, plain)
        }
        Commands::Scan {
            report,
            select,
            format,
            verbose,
        } => {
            let profile = resolve_profile(&select)?;
            scan::cmd_scan(&report, &profile, format, verbose)
        }
        Commands::Validate { profile } => cmd_validate(&profile),
    }
}

/// Build the session profile: a file if given, otherwise an ad-hoc one,
/// with any flags layered on top.
fn resolve_profile(select: &SelectArgs) -> Result<ReviewProfile> {
    let mut profile = match &select.profile {
        Some(path) => load_profile_file(path)?,
        None => ReviewProfile::ad_hoc(Thresholds {
            min_spend: 0.0,
            min_cost_per_conversion: 0.0,
        }),
    };

    if let Some(layout) = select.layout {
        profile.format = layout.into();
    }
    if let Some(min_spend) = select.min_spend {
        profile.thresholds.min_spend = min_spend;
    }
    if let Some(min_cpc) = select.min_cpc {
        profile.thresholds.min_cost_per_conversion = min_cpc;
    }

    Ok(profile)
}

fn load_profile_file(path: &Path) -> Result<ReviewProfile> {
    let profile = if path.extension().is_some_and(|ext| ext == "json") {
        ReviewProfile::from_json_file(path)
    } else {
        ReviewProfile::from_yaml_file(path)
    };
    profile.with_context(|| format!("failed to load profile {}", path.display()))
}

fn cmd_validate(path: &Path) -> Result<ExitCode> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;

    let value: serde_json::Value = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&contents).context("profile is not valid JSON")?
    } else {
        serde_yaml::from_str(&contents).context("profile is not valid YAML")?
    };

    if let Err(errors) = validate_profile_schema(&value) {
        for error in errors {
            eprintln!("schema: {}", error);
        }
        return Ok(ExitCode::FAILURE);
    }

    let profile = load_profile_file(path)?;
    println!("profile OK: {}", profile.name);
    Ok(ExitCode::SUCCESS)
}
