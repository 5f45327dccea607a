//! Configuration for column type inference

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Layout token for RFC 3339 timestamps in [`InferenceConfig::date_formats`]
pub const RFC3339: &str = "rfc3339";

/// Configuration for column type inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Fraction of a column's sample that must agree on a type (0.0 - 1.0)
    pub type_threshold: f64,

    /// Thresholds at or above this value make any unclassifiable sample
    /// force the column to TEXT. Lower thresholds let the fraction checks
    /// decide even when text values are present.
    pub strict_text_cutoff: f64,

    /// Date layouts tried in order (chrono format strings, or `rfc3339`)
    pub date_formats: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            type_threshold: 0.8,
            strict_text_cutoff: 0.8,
            date_formats: default_date_formats(),
        }
    }
}

/// ISO, US and UK calendar layouts, then RFC 3339 and naive ISO timestamps
pub fn default_date_formats() -> Vec<String> {
    [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%m-%d-%Y",
        "%d/%m/%Y",
        "%d-%m-%Y",
        RFC3339,
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }

    /// Reject values a deserialized config may carry outside 0.0 - 1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        for value in [self.type_threshold, self.strict_text_cutoff] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold(value));
            }
        }
        Ok(())
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the agreement threshold
    pub fn type_threshold(mut self, threshold: f64) -> Self {
        self.config.type_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the threshold from which text samples force TEXT
    pub fn strict_text_cutoff(mut self, cutoff: f64) -> Self {
        self.config.strict_text_cutoff = cutoff.clamp(0.0, 1.0);
        self
    }

    /// Replace the date layouts
    pub fn date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.date_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InferenceConfig::default();
        assert_eq!(config.type_threshold, 0.8);
        assert_eq!(config.date_formats.first().map(String::as_str), Some("%Y-%m-%d"));
        assert!(config.date_formats.iter().any(|f| f == RFC3339));
    }

    #[test]
    fn test_builder_clamps() {
        let config = InferenceConfig::builder()
            .type_threshold(1.5)
            .strict_text_cutoff(-0.2)
            .date_formats(["%Y-%m-%d"])
            .build();
        assert_eq!(config.type_threshold, 1.0);
        assert_eq!(config.strict_text_cutoff, 0.0);
        assert_eq!(config.date_formats, vec!["%Y-%m-%d"]);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config: InferenceConfig = serde_json::from_str(r#"{"typeThreshold": 2.0}"#).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::InvalidThreshold(2.0)));
        assert!(InferenceConfig::default().validate().is_ok());
    }
}
