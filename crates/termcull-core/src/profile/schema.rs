//! JSON Schema validation for profiles.
//!
//! Profiles are validated against schema/profile.schema.json. This module
//! provides schema loading and validation utilities.

use std::sync::OnceLock;

use thiserror::Error;

/// Embedded profile schema (loaded at compile time).
const PROFILE_SCHEMA_JSON: &str = include_str!("../../../../schema/profile.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

/// Get or initialize the compiled schema validator.
fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(PROFILE_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// Validate a profile JSON value against the schema.
///
/// # Arguments
///
/// * `profile_json` - The profile as a JSON value
///
/// # Returns
///
/// * `Ok(())` - Profile is valid
/// * `Err(Vec<String>)` - List of validation errors
pub fn validate_profile_schema(profile_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = validator
        .iter_errors(profile_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check if a profile JSON value is valid against the schema.
///
/// Returns true if valid, false otherwise. Use `validate_profile_schema`
/// for detailed error messages.
pub fn is_valid_profile(profile_json: &serde_json::Value) -> bool {
    get_validator()
        .map(|v| v.is_valid(profile_json))
        .unwrap_or(false)
}
