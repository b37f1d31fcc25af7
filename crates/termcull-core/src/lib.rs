//! # termcull-core
//!
//! Deterministic search-term screening and review engine.
//!
//! This crate turns an advertising search-term report into a negative
//! keyword list in three steps:
//! - screen report rows against spend and cost-per-conversion thresholds
//! - walk the survivors one at a time through an accept/reject session
//! - serialize the accepted terms for export
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same report and profile always produce the same
//!    candidate list
//! 2. **Row-isolated**: A malformed row is skipped with a recorded
//!    reason, never fatal to the batch
//! 3. **Forward-only**: The review cursor advances exactly one candidate
//!    per decision and never moves back
//! 4. **No terminal I/O**: All interaction lives in the CLI crate
//!
//! ## Example
//!
//! ```rust,ignore
//! use termcull_core::{open_session, render_terms, Decision, ReviewProfile};
//!
//! let profile = ReviewProfile::from_yaml_file("profiles/google-ads.yaml")?;
//! let report = std::fs::read_to_string("search-terms.csv")?;
//! let mut setup = open_session(&report, &profile)?;
//!
//! while let Some(candidate) = setup.session.current() {
//!     println!("{} (${:.2})", candidate.term, candidate.spend);
//!     setup.session.decide(Decision::Accept);
//! }
//!
//! let list = render_terms(setup.session.accepted(), profile.export.style);
//! ```

pub mod export;
pub mod filter;
pub mod profile;
pub mod report;
pub mod session;
pub mod types;

// Re-export main types at crate root
pub use export::{render_terms, write_candidates_csv, write_terms, ExportStyle};
pub use filter::{screen, ScreenResult, SkipReason, SkippedRow};
pub use profile::{
    validate_profile_schema, ColumnMap, ProfileError, ReportFormat, ReviewProfile, Thresholds,
};
pub use report::{read_report, read_report_file, RawRow, Report, ReportError};
pub use session::{ReviewSession, SessionState, SessionSummary};
pub use types::{Candidate, CostPerConversion, Decision, Progress};

use thiserror::Error;

/// Errors from the load-and-screen pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// A session ready to review, plus the screening diagnostics behind it.
#[derive(Debug)]
pub struct SessionSetup {
    pub session: ReviewSession,
    pub skipped: Vec<SkippedRow>,
}

/// Parse a report, screen it against a profile, and open a review session.
///
/// This is the main entry point. The profile is validated first so that
/// flag-overridden profiles get the same checks as parsed ones, and the
/// report's header row is checked for the columns the profile expects.
pub fn open_session(
    report_text: &str,
    profile: &ReviewProfile,
) -> Result<SessionSetup, PipelineError> {
    profile.validate()?;

    let report = read_report(report_text)?;
    report.check_columns(&profile.resolve_columns())?;

    let ScreenResult {
        candidates,
        skipped,
    } = screen(&report.rows, profile);

    Ok(SessionSetup {
        session: ReviewSession::new(candidates),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_pipeline() {
        let profile = ReviewProfile::ad_hoc(Thresholds {
            min_spend: 10.0,
            min_cost_per_conversion: 5.0,
        });
        let report = "\
Search term,Search term status,Cost,Impressions,Clicks,Conversions,Cost / conv.
free shoes,None,12.00,840,31,0,--
cheap socks,None,2.00,90,4,1,2.00
";

        let setup = open_session(report, &profile).unwrap();
        assert_eq!(setup.session.candidates().len(), 1);
        assert_eq!(setup.session.candidates()[0].term, "free shoes");
        assert_eq!(setup.skipped.len(), 1);
    }

    #[test]
    fn test_missing_column_surfaces() {
        let profile = ReviewProfile::ad_hoc(Thresholds {
            min_spend: 1.0,
            min_cost_per_conversion: 1.0,
        });
        let report = "Search term,Cost\nfree shoes,12.00\n";

        let result = open_session(report, &profile);
        assert!(matches!(
            result,
            Err(PipelineError::Report(ReportError::MissingColumn(_)))
        ));
    }

    #[test]
    fn test_invalid_profile_surfaces() {
        let mut profile = ReviewProfile::ad_hoc(Thresholds {
            min_spend: 1.0,
            min_cost_per_conversion: 1.0,
        });
        profile.thresholds.min_spend = f64::NAN;

        let result = open_session("Search term,Cost\n", &profile);
        assert!(matches!(result, Err(PipelineError::Profile(_))));
    }
}
