//! Review profile parsing and validation.
//!
//! A profile describes one review session: which report layout to expect,
//! the screening thresholds, and how accepted terms are exported. Profiles
//! are structured data validated against a JSON Schema.

mod parser;
mod schema;

pub use parser::{
    ColumnMap, ColumnOverrides, ExportSettings, ProfileError, ReportFormat, ReviewProfile,
    Thresholds, DEFAULT_EXPORT_PATH,
};
pub use schema::{is_valid_profile, validate_profile_schema, SchemaError};
