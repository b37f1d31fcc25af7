//! Core data types shared by the screening and review stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A search term that survived screening and awaits a verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    /// The search term exactly as it appeared in the report.
    pub term: String,

    /// Total spend attributed to the term.
    pub spend: f64,

    pub impressions: u64,

    pub clicks: u64,

    pub cost_per_conversion: CostPerConversion,
}

/// Cost per conversion, with the zero-conversion case made explicit.
///
/// A term with zero conversions has no finite cost per conversion. The
/// pipeline represents that as `Unbounded` rather than leaning on float
/// infinity, so the sentinel cannot leak into arithmetic unnoticed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CostPerConversion {
    Finite(f64),
    Unbounded,
}

impl CostPerConversion {
    /// Divide spend by conversion count. Zero conversions yields
    /// `Unbounded`, never a division.
    pub fn from_ratio(cost: f64, conversions: f64) -> Self {
        if conversions == 0.0 {
            Self::Unbounded
        } else {
            Self::Finite(cost / conversions)
        }
    }

    /// Whether this value is at or above a minimum threshold.
    /// `Unbounded` satisfies every finite threshold.
    pub fn meets(&self, threshold: f64) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Finite(value) => *value >= threshold,
        }
    }

    pub fn as_finite(&self) -> Option<f64> {
        match self {
            Self::Finite(value) => Some(*value),
            Self::Unbounded => None,
        }
    }
}

impl fmt::Display for CostPerConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(value) => write!(f, "${:.2}", value),
            Self::Unbounded => write!(f, "no conversions"),
        }
    }
}

/// A reviewer's verdict on a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Reject,
}

/// Review position, for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Candidates decided so far.
    pub reviewed: usize,

    /// Total candidates in the session.
    pub total: usize,
}

impl Progress {
    /// Percentage complete. An empty session reports 0 rather than
    /// dividing by zero.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.reviewed as f64 / self.total as f64 * 100.0
        }
    }
}
