//! Workflow configuration.
//!
//! Loaded from the `[workflow]` table of the server's TOML config file, or
//! built in code via the validating builder.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// Smallest allowed `max_scan_results`.
const MIN_SCAN_RESULTS: usize = 1;

/// Configuration validation error.
///
/// Returned when a configuration value is outside its valid range.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[snafu(display("invalid config: {message}"))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },
}

/// Behavioural switches for the workflow handlers.
///
/// # Validation Rules
///
/// - `max_scan_results`, when set, must be >= 1
///
/// # Example
///
/// ```
/// # use claimledger_types::config::WorkflowConfig;
/// let config = WorkflowConfig::builder()
///     .strict_contract_types(true)
///     .build()
///     .expect("valid workflow config");
/// assert!(config.strict_contract_types);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowConfig {
    /// Reject `contract_type_create` for a uuid that already exists.
    ///
    /// Off by default: creation overwrites the existing catalog entry.
    #[serde(default)]
    pub strict_contract_types: bool,
    /// Upper bound on the number of results a list operation may return.
    ///
    /// Unset by default. A list operation that would exceed the bound fails
    /// instead of returning a partial result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_scan_results: Option<usize>,
}

#[bon::bon]
impl WorkflowConfig {
    /// Creates a new workflow configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `max_scan_results` is 0.
    #[builder]
    pub fn new(
        #[builder(default)] strict_contract_types: bool,
        max_scan_results: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let config = Self { strict_contract_types, max_scan_results };
        config.validate()?;
        Ok(config)
    }
}

impl WorkflowConfig {
    /// Validates the configuration values.
    ///
    /// Call after deserialization to ensure values are within valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limit) = self.max_scan_results.filter(|limit| *limit < MIN_SCAN_RESULTS) {
            return Err(ConfigError::Validation {
                message: format!("max_scan_results must be >= {MIN_SCAN_RESULTS}, got {limit}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorkflowConfig::builder().build().expect("defaults should be valid");
        assert_eq!(config, WorkflowConfig::default());
        assert!(!config.strict_contract_types);
        assert_eq!(config.max_scan_results, None);
    }

    #[test]
    fn test_zero_scan_results_rejected() {
        let err = WorkflowConfig::builder().max_scan_results(0).build().unwrap_err();
        assert!(err.to_string().contains("max_scan_results"), "got: {err}");
    }

    #[test]
    fn test_toml_fills_defaults() {
        let config: WorkflowConfig = toml::from_str("strict_contract_types = true").expect("parse");
        assert!(config.strict_contract_types);
        assert_eq!(config.max_scan_results, None);
        config.validate().expect("valid");
    }

    #[test]
    fn test_deserialized_config_can_be_invalid_until_validated() {
        let config: WorkflowConfig = toml::from_str("max_scan_results = 0").expect("parse");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scan_bound_is_optional() {
        let config = WorkflowConfig::builder().max_scan_results(1).build().expect("valid");
        assert_eq!(config.max_scan_results, Some(1));
        let config: WorkflowConfig = toml::from_str("max_scan_results = 25").expect("parse");
        assert_eq!(config.max_scan_results, Some(25));
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = schemars::schema_for!(WorkflowConfig);
        let json = serde_json::to_string(&schema).expect("serialize schema");
        assert!(json.contains("strict_contract_types"));
        assert!(json.contains("max_scan_results"));
    }
}
