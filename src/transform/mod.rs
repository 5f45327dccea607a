//! Dataset transformations
//!
//! Rules are read from a JSON document and applied in order before SQL is
//! generated:
//!
//! ```json
//! {
//!   "transformations": [
//!     { "type": "rename_columns", "mapping": { "fname": "first_name" } },
//!     { "type": "add_column", "name": "full_name", "expression": "first_name + ' ' + last_name" },
//!     { "type": "filter_rows", "condition": "country in ['MZ', 'ZA']" },
//!     { "type": "apply_function", "column": "email", "function": "lower" },
//!     { "type": "replace_values", "column": "status", "mapping": { "1": "active" } },
//!     { "type": "drop_columns", "columns": ["internal_id"] },
//!     { "type": "sort", "columns": ["last_name"], "ascending": true }
//!   ]
//! }
//! ```

mod rules;

pub use rules::Transformation;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::models::Dataset;

/// Error while reading or applying transformations
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Failed to read transform config {path}: {message}")]
    Read { path: String, message: String },
    #[error("Failed to parse transform config: {0}")]
    Parse(String),
    #[error("{rule} transformation requires {parameter}")]
    MissingParameter {
        rule: &'static str,
        parameter: &'static str,
    },
    #[error("Invalid condition: {0} (expected: column in [value, ...])")]
    InvalidCondition(String),
    #[error("Unsupported function: {0}. Expected: lower, upper, trim")]
    UnsupportedFunction(String),
}

/// Ordered list of transformations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub transformations: Vec<Transformation>,
}

/// Applies a [`TransformConfig`] to datasets
#[derive(Debug, Clone, Default)]
pub struct TransformEngine {
    config: TransformConfig,
}

impl TransformEngine {
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    /// Parse a JSON rule document
    pub fn from_json_str(text: &str) -> Result<Self, TransformError> {
        let config: TransformConfig =
            serde_json::from_str(text).map_err(|e| TransformError::Parse(e.to_string()))?;
        Ok(Self::new(config))
    }

    /// Read a JSON rule file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TransformError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TransformError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    pub fn transformations(&self) -> &[Transformation] {
        &self.config.transformations
    }

    /// Apply every rule in order; stops at the first failing rule
    pub fn apply(&self, dataset: &mut Dataset) -> Result<(), TransformError> {
        for rule in &self.config.transformations {
            rule.apply(dataset)?;
            debug!(rule = rule.name(), rows = dataset.len(), "Applied transformation");
        }
        info!(
            rules = self.config.transformations.len(),
            rows = dataset.len(),
            "Transformations applied"
        );
        Ok(())
    }
}
