//! Tolerant numeric parsing for report fields.
//!
//! Ad platform exports format numbers for humans: currency symbols,
//! thousands separators, and `--` where a metric has no value. Parsing
//! strips the decoration; anything left that still is not a number is an
//! error for the caller to handle at row granularity.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// Decoration reports wrap around numeric values.
    static ref NUMERIC_NOISE: Regex = Regex::new(r#"[$€£,"\s]"#).unwrap();
}

/// Markers platforms use for "no value recorded".
const ABSENT_MARKERS: [&str; 2] = ["--", "\u{2014}"];

/// A field value that could not be read as a number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a numeric value: {raw:?}")]
pub struct NotNumeric {
    pub raw: String,
}

/// Whether a field holds the platform's "no value" marker (or nothing).
pub fn is_absent(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || ABSENT_MARKERS.contains(&trimmed)
}

/// Parse a decimal field such as `"$1,234.56"`.
pub fn parse_decimal(raw: &str) -> Result<f64, NotNumeric> {
    let cleaned = NUMERIC_NOISE.replace_all(raw.trim(), "");
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(NotNumeric {
            raw: raw.to_string(),
        }),
    }
}

/// Parse an integer count field such as `"1,204"`.
pub fn parse_count(raw: &str) -> Result<u64, NotNumeric> {
    let cleaned = NUMERIC_NOISE.replace_all(raw.trim(), "");
    cleaned.parse::<u64>().map_err(|_| NotNumeric {
        raw: raw.to_string(),
    })
}
