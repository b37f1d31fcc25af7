//! Profile parsing from YAML/JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::ExportStyle;

/// Default output file for accepted terms.
pub const DEFAULT_EXPORT_PATH: &str = "negative-keywords.csv";

/// Errors that can occur when parsing profiles.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read profile file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Profile validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Report layout variants.
///
/// The layout determines the default column names and where cost per
/// conversion comes from: Google Ads search-term reports carry a direct
/// `Cost / conv.` column, Amazon reports carry an order count that the
/// screener divides spend by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    #[default]
    GoogleAds,
    AmazonAds,
}

impl ReportFormat {
    /// Column names this layout ships with.
    pub fn default_columns(&self) -> ColumnMap {
        match self {
            Self::GoogleAds => ColumnMap {
                term: "Search term".to_string(),
                cost: "Cost".to_string(),
                impressions: "Impressions".to_string(),
                clicks: "Clicks".to_string(),
                cost_per_conversion: Some("Cost / conv.".to_string()),
                conversions: Some("Conversions".to_string()),
                status: Some("Search term status".to_string()),
            },
            Self::AmazonAds => ColumnMap {
                term: "Customer Search Term".to_string(),
                cost: "Spend".to_string(),
                impressions: "Impressions".to_string(),
                clicks: "Clicks".to_string(),
                cost_per_conversion: None,
                conversions: Some("7 Day Total Orders (#)".to_string()),
                status: None,
            },
        }
    }
}

/// Resolved column names used to pull fields out of a report row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnMap {
    pub term: String,
    pub cost: String,
    pub impressions: String,
    pub clicks: String,

    /// Direct cost-per-conversion column, when the report carries one.
    pub cost_per_conversion: Option<String>,

    /// Conversion-count column, for reports where cost per conversion
    /// must be computed.
    pub conversions: Option<String>,

    /// Status column flagging terms an upstream system already excluded.
    pub status: Option<String>,
}

/// Per-field column overrides from a profile. Unset fields fall back to
/// the layout defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ColumnOverrides {
    pub term: Option<String>,
    pub cost: Option<String>,
    pub impressions: Option<String>,
    pub clicks: Option<String>,
    pub cost_per_conversion: Option<String>,
    pub conversions: Option<String>,
    pub status: Option<String>,
}

/// Screening thresholds for one session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    /// Minimum spend for a term to surface for review.
    pub min_spend: f64,

    /// Minimum cost per conversion for a term to surface for review.
    pub min_cost_per_conversion: f64,
}

/// How accepted terms are written out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    pub style: ExportStyle,
    pub path: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            style: ExportStyle::default(),
            path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }
}

/// A review profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewProfile {
    /// Version of this profile (semver).
    pub profile_version: String,

    /// Human-readable name.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Report layout to expect.
    #[serde(default)]
    pub format: ReportFormat,

    /// Screening thresholds.
    pub thresholds: Thresholds,

    /// Column overrides on top of the layout defaults.
    #[serde(default)]
    pub columns: ColumnOverrides,

    /// Export settings for accepted terms.
    #[serde(default)]
    pub export: ExportSettings,
}

impl ReviewProfile {
    /// Parse a profile from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let profile: ReviewProfile = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Parse a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profile: ReviewProfile = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Parse a profile from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a profile from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Minimal profile for flag-driven runs where no file is involved.
    pub fn ad_hoc(thresholds: Thresholds) -> Self {
        Self {
            profile_version: "1.0".to_string(),
            name: "ad hoc".to_string(),
            description: None,
            format: ReportFormat::default(),
            thresholds,
            columns: ColumnOverrides::default(),
            export: ExportSettings::default(),
        }
    }

    /// Validate the profile structure.
    ///
    /// Callers that mutate a parsed profile (threshold overrides from CLI
    /// flags) should re-validate before opening a session.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.is_empty() {
            return Err(ProfileError::MissingField("name".to_string()));
        }

        if self.profile_version.is_empty() {
            return Err(ProfileError::MissingField("profile_version".to_string()));
        }

        let thresholds = [
            ("thresholds.min_spend", self.thresholds.min_spend),
            (
                "thresholds.min_cost_per_conversion",
                self.thresholds.min_cost_per_conversion,
            ),
        ];
        for (field, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ProfileError::ValidationError(format!(
                    "{} must be a non-negative number, got {}",
                    field, value
                )));
            }
        }

        let columns = self.resolve_columns();
        if columns.term.is_empty() {
            return Err(ProfileError::MissingField("columns.term".to_string()));
        }
        if columns.cost_per_conversion.is_none() && columns.conversions.is_none() {
            return Err(ProfileError::MissingField(
                "columns.cost_per_conversion or columns.conversions".to_string(),
            ));
        }

        Ok(())
    }

    /// Layout defaults with the profile's overrides applied.
    pub fn resolve_columns(&self) -> ColumnMap {
        let mut resolved = self.format.default_columns();
        let overrides = &self.columns;

        if let Some(term) = &overrides.term {
            resolved.term = term.clone();
        }
        if let Some(cost) = &overrides.cost {
            resolved.cost = cost.clone();
        }
        if let Some(impressions) = &overrides.impressions {
            resolved.impressions = impressions.clone();
        }
        if let Some(clicks) = &overrides.clicks {
            resolved.clicks = clicks.clone();
        }
        if let Some(cpc) = &overrides.cost_per_conversion {
            resolved.cost_per_conversion = Some(cpc.clone());
        }
        if let Some(conversions) = &overrides.conversions {
            resolved.conversions = Some(conversions.clone());
        }
        if let Some(status) = &overrides.status {
            resolved.status = Some(status.clone());
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_PROFILE: &str = r#"
profile_version: "1.0"
name: "Weekly cull"
format: google-ads
thresholds:
  min_spend: 10.0
  min_cost_per_conversion: 5.0
"#;

    #[test]
    fn test_parse_valid_profile() {
        let profile = ReviewProfile::from_yaml(VALID_PROFILE).unwrap();
        assert_eq!(profile.name, "Weekly cull");
        assert_eq!(profile.format, ReportFormat::GoogleAds);
        assert_eq!(profile.thresholds.min_spend, 10.0);
        assert_eq!(profile.export.path, PathBuf::from(DEFAULT_EXPORT_PATH));
    }

    #[test]
    fn test_parse_json_profile() {
        let json = r#"{
            "profile_version": "1.0",
            "name": "From JSON",
            "thresholds": { "min_spend": 1.0, "min_cost_per_conversion": 2.0 }
        }"#;
        let profile = ReviewProfile::from_json(json).unwrap();
        assert_eq!(profile.name, "From JSON");
    }

    #[test]
    fn test_missing_name_rejected() {
        let yaml = r#"
profile_version: "1.0"
name: ""
thresholds:
  min_spend: 1.0
  min_cost_per_conversion: 1.0
"#;
        let result = ReviewProfile::from_yaml(yaml);
        assert!(matches!(result, Err(ProfileError::MissingField(_))));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let yaml = r#"
profile_version: "1.0"
name: "Bad"
thresholds:
  min_spend: -1.0
  min_cost_per_conversion: 1.0
"#;
        let result = ReviewProfile::from_yaml(yaml);
        assert!(matches!(result, Err(ProfileError::ValidationError(_))));
    }

    #[test]
    fn test_column_overrides_merge_onto_defaults() {
        let yaml = r#"
profile_version: "1.0"
name: "Custom columns"
format: google-ads
thresholds:
  min_spend: 1.0
  min_cost_per_conversion: 1.0
columns:
  term: "Query"
  status: "State"
"#;
        let profile = ReviewProfile::from_yaml(yaml).unwrap();
        let columns = profile.resolve_columns();
        assert_eq!(columns.term, "Query");
        assert_eq!(columns.status.as_deref(), Some("State"));
        // Untouched fields keep the layout defaults.
        assert_eq!(columns.cost, "Cost");
        assert_eq!(columns.cost_per_conversion.as_deref(), Some("Cost / conv."));
    }

    #[test]
    fn test_amazon_layout_computes_cost_per_conversion() {
        let columns = ReportFormat::AmazonAds.default_columns();
        assert!(columns.cost_per_conversion.is_none());
        assert_eq!(
            columns.conversions.as_deref(),
            Some("7 Day Total Orders (#)")
        );
    }

    #[test]
    fn test_ad_hoc_profile_is_valid() {
        let profile = ReviewProfile::ad_hoc(Thresholds {
            min_spend: 10.0,
            min_cost_per_conversion: 5.0,
        });
        assert!(profile.validate().is_ok());
    }
}
