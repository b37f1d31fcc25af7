//! Record screening: raw report rows to review candidates.
//!
//! Screening is row-isolated. A row that cannot be read is skipped and
//! recorded with a reason; it never fails the batch. Kept rows preserve
//! their order in the report.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::profile::{ColumnMap, ReviewProfile, Thresholds};
use crate::report::{self, RawRow};
use crate::types::{Candidate, CostPerConversion};

/// Prefixes marking the summary/footer rows platforms append to reports.
const TOTAL_ROW_MARKERS: [&str; 2] = ["Total:", "Total -"];

/// Status value for terms an upstream system already excluded.
const EXCLUDED_STATUS: &str = "excluded";

/// Why a row was left out of the candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Summary/footer row emitted by the reporting platform.
    TotalRow,

    /// The platform already excluded this term.
    AlreadyExcluded,

    /// Term column empty.
    EmptyTerm,

    /// The named field failed to parse as a number.
    Malformed(String),

    BelowSpendThreshold,

    BelowCostThreshold,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalRow => write!(f, "summary row"),
            Self::AlreadyExcluded => write!(f, "already excluded upstream"),
            Self::EmptyTerm => write!(f, "empty term"),
            Self::Malformed(field) => write!(f, "malformed field {:?}", field),
            Self::BelowSpendThreshold => write!(f, "below spend threshold"),
            Self::BelowCostThreshold => write!(f, "below cost-per-conversion threshold"),
        }
    }
}

/// A row that did not survive screening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub term: String,
    pub reason: SkipReason,
}

/// Outcome of screening a report against a profile.
#[derive(Debug, Clone, Default)]
pub struct ScreenResult {
    /// Rows that cleared every rule, in report order.
    pub candidates: Vec<Candidate>,

    /// Everything else, with reasons.
    pub skipped: Vec<SkippedRow>,
}

/// Screen raw rows into candidates.
///
/// Rules, in order: summary rows out, upstream-excluded terms out,
/// numerics parsed (zero conversions become `Unbounded`), then both
/// thresholds applied. See `SkipReason` for the full taxonomy.
pub fn screen(rows: &[RawRow], profile: &ReviewProfile) -> ScreenResult {
    let columns = profile.resolve_columns();
    let thresholds = profile.thresholds;

    let mut result = ScreenResult::default();
    for row in rows {
        match screen_row(row, &columns, thresholds) {
            Ok(candidate) => result.candidates.push(candidate),
            Err(reason) => {
                let term = row.get(&columns.term).unwrap_or("").to_string();
                debug!(line = row.line, term = %term, reason = %reason, "row skipped");
                result.skipped.push(SkippedRow {
                    line: row.line,
                    term,
                    reason,
                });
            }
        }
    }

    info!(
        kept = result.candidates.len(),
        skipped = result.skipped.len(),
        "report screened"
    );
    result
}

fn screen_row(
    row: &RawRow,
    columns: &ColumnMap,
    thresholds: Thresholds,
) -> Result<Candidate, SkipReason> {
    let term = row.get(&columns.term).unwrap_or("").trim();
    if term.is_empty() {
        return Err(SkipReason::EmptyTerm);
    }
    if is_total_row(term) {
        return Err(SkipReason::TotalRow);
    }

    if let Some(status_column) = &columns.status {
        if let Some(status) = row.get(status_column) {
            if status.trim().eq_ignore_ascii_case(EXCLUDED_STATUS) {
                return Err(SkipReason::AlreadyExcluded);
            }
        }
    }

    let spend = field_decimal(row, &columns.cost)?;
    if spend < 0.0 {
        return Err(SkipReason::Malformed(columns.cost.clone()));
    }
    let impressions = field_count(row, &columns.impressions)?;
    let clicks = field_count(row, &columns.clicks)?;
    let cost_per_conversion = resolve_cost_per_conversion(row, columns, spend)?;

    if spend < thresholds.min_spend {
        return Err(SkipReason::BelowSpendThreshold);
    }
    if !cost_per_conversion.meets(thresholds.min_cost_per_conversion) {
        return Err(SkipReason::BelowCostThreshold);
    }

    Ok(Candidate {
        term: term.to_string(),
        spend,
        impressions,
        clicks,
        cost_per_conversion,
    })
}

fn is_total_row(term: &str) -> bool {
    TOTAL_ROW_MARKERS
        .iter()
        .any(|marker| term.starts_with(marker))
}

/// Cost per conversion for a row. A direct column wins when the row
/// carries one; an absent value there means no conversions were
/// recorded. Otherwise spend is divided by the conversion count.
fn resolve_cost_per_conversion(
    row: &RawRow,
    columns: &ColumnMap,
    spend: f64,
) -> Result<CostPerConversion, SkipReason> {
    if let Some(column) = &columns.cost_per_conversion {
        if let Some(raw) = row.get(column) {
            if report::is_absent(raw) {
                return Ok(CostPerConversion::Unbounded);
            }
            return report::parse_decimal(raw)
                .map(CostPerConversion::Finite)
                .map_err(|_| SkipReason::Malformed(column.clone()));
        }
    }

    if let Some(column) = &columns.conversions {
        if let Some(raw) = row.get(column) {
            let conversions = if report::is_absent(raw) {
                0.0
            } else {
                report::parse_decimal(raw)
                    .map_err(|_| SkipReason::Malformed(column.clone()))?
            };
            if conversions < 0.0 {
                return Err(SkipReason::Malformed(column.clone()));
            }
            return Ok(CostPerConversion::from_ratio(spend, conversions));
        }
        return Err(SkipReason::Malformed(column.clone()));
    }

    // Profile validation guarantees one source is configured; a row can
    // still end up here when the report dropped the column mid-file.
    Err(SkipReason::Malformed("cost per conversion".to_string()))
}

fn field_decimal(row: &RawRow, column: &str) -> Result<f64, SkipReason> {
    let raw = row.get(column).unwrap_or("");
    if report::is_absent(raw) {
        return Ok(0.0);
    }
    report::parse_decimal(raw).map_err(|_| SkipReason::Malformed(column.to_string()))
}

fn field_count(row: &RawRow, column: &str) -> Result<u64, SkipReason> {
    let raw = row.get(column).unwrap_or("");
    if report::is_absent(raw) {
        return Ok(0);
    }
    report::parse_count(raw).map_err(|_| SkipReason::Malformed(column.to_string()))
}
