//! Column type inference over dataset samples

use serde_json::Value;
use std::collections::HashMap;

use super::config::InferenceConfig;
use super::formats::{ValueClass, ValueClassifier, is_boolean_like};
use crate::models::{DataRow, SqlType};

/// Per-category counts for one column sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub integer: usize,
    pub float: usize,
    pub boolean: usize,
    pub date: usize,
    pub datetime: usize,
    pub text: usize,
}

impl TypeCounts {
    fn record(&mut self, class: ValueClass) {
        match class {
            ValueClass::Integer => self.integer += 1,
            ValueClass::Float => self.float += 1,
            ValueClass::Boolean => self.boolean += 1,
            ValueClass::Date => self.date += 1,
            ValueClass::DateTime => self.datetime += 1,
            ValueClass::Text => self.text += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.integer + self.float + self.boolean + self.date + self.datetime + self.text
    }
}

/// Infers canonical SQL types for dataset columns
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tabular_sql::inference::TypeInferenceEngine;
/// use tabular_sql::models::SqlType;
///
/// let engine = TypeInferenceEngine::new();
/// let sample = [json!(1), json!(2), json!("3")];
/// assert_eq!(engine.infer_type(sample.iter()), SqlType::Integer);
/// ```
#[derive(Debug, Clone)]
pub struct TypeInferenceEngine {
    config: InferenceConfig,
    classifier: ValueClassifier,
}

impl Default for TypeInferenceEngine {
    fn default() -> Self {
        Self::with_config(InferenceConfig::default())
    }
}

impl TypeInferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InferenceConfig) -> Self {
        let classifier = ValueClassifier::new(config.date_formats.clone());
        Self { config, classifier }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer one type per column from the non-null values across `rows`
    pub fn infer_column_types(&self, columns: &[String], rows: &[DataRow]) -> HashMap<String, SqlType> {
        columns
            .iter()
            .map(|column| {
                let sample = rows.iter().filter_map(|row| row.get(column));
                (column.clone(), self.infer_type(sample))
            })
            .collect()
    }

    /// Infer the type of a column sample; nulls are ignored
    pub fn infer_type<'a>(&self, values: impl IntoIterator<Item = &'a Value>) -> SqlType {
        let sample: Vec<&Value> = values.into_iter().filter(|v| !v.is_null()).collect();
        if sample.is_empty() {
            return SqlType::Text;
        }

        if sample.iter().all(|v| is_boolean_like(v)) {
            return SqlType::Boolean;
        }

        let mut counts = TypeCounts::default();
        for value in &sample {
            counts.record(self.classifier.classify(value));
        }
        self.decide(&counts)
    }

    fn decide(&self, counts: &TypeCounts) -> SqlType {
        let threshold = self.config.type_threshold;
        if counts.text > 0 && threshold >= self.config.strict_text_cutoff {
            return SqlType::Text;
        }

        let total = counts.total() as f64;
        let fraction = |n: usize| n as f64 / total;

        if fraction(counts.boolean) >= threshold {
            SqlType::Boolean
        } else if fraction(counts.integer) >= threshold {
            SqlType::Integer
        } else if fraction(counts.integer + counts.float) >= threshold {
            SqlType::Float
        } else if fraction(counts.datetime) >= threshold {
            SqlType::DateTime
        } else if fraction(counts.date) >= threshold {
            SqlType::Date
        } else {
            SqlType::Text
        }
    }

    /// Type of a single scalar field value (no threshold logic)
    pub fn scalar_type(&self, value: &Value) -> SqlType {
        match self.classifier.classify_scalar(value) {
            ValueClass::Integer => SqlType::Integer,
            ValueClass::Float => SqlType::Float,
            ValueClass::Boolean => SqlType::Boolean,
            ValueClass::Date => SqlType::Date,
            ValueClass::DateTime => SqlType::DateTime,
            ValueClass::Text => SqlType::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn infer(values: Value) -> SqlType {
        let engine = TypeInferenceEngine::new();
        infer_with(&engine, values)
    }

    fn infer_with(engine: &TypeInferenceEngine, values: Value) -> SqlType {
        engine.infer_type(values.as_array().unwrap().iter())
    }

    #[test]
    fn test_empty_sample_is_text() {
        assert_eq!(infer(json!([])), SqlType::Text);
        assert_eq!(infer(json!([null, null])), SqlType::Text);
    }

    #[test]
    fn test_integers() {
        assert_eq!(infer(json!([1, 2, 3, 4, 5])), SqlType::Integer);
        assert_eq!(infer(json!(["1", "2", "3", "4", "5"])), SqlType::Integer);
        assert_eq!(infer(json!([1, null, 3])), SqlType::Integer);
    }

    #[test]
    fn test_any_text_forces_text_at_default_threshold() {
        assert_eq!(infer(json!([1, 2, 3, 4, "abc"])), SqlType::Text);
        assert_eq!(infer(json!(["a", "b", "c", 1])), SqlType::Text);
    }

    #[test]
    fn test_floats() {
        assert_eq!(infer(json!([1.1, 2.2, 3.3])), SqlType::Float);
        assert_eq!(infer(json!([1, 2, 3.3, 4.4, 5])), SqlType::Float);
        assert_eq!(infer(json!(["1.1", "2.2", "3.3"])), SqlType::Float);
    }

    #[test]
    fn test_booleans() {
        assert_eq!(infer(json!([true, false, true])), SqlType::Boolean);
        assert_eq!(
            infer(json!(["true", "false", "yes", "no", "1", "0"])),
            SqlType::Boolean
        );
        assert_eq!(infer(json!([true, "no", "Y"])), SqlType::Boolean);
    }

    #[test]
    fn test_dates() {
        assert_eq!(infer(json!(["2023-01-15", "2023-02-20"])), SqlType::Date);
        assert_eq!(
            infer(json!(["2023-01-15T14:30:00Z", "2023-02-20T15:45:00Z"])),
            SqlType::DateTime
        );
    }

    #[test]
    fn test_mixed_is_text() {
        assert_eq!(infer(json!([1, "abc", true, 2.5, "2023-01-15"])), SqlType::Text);
    }

    #[test]
    fn test_custom_threshold() {
        let values = json!([1, 2, 3, "abc", "def"]);

        let lenient = TypeInferenceEngine::with_config(
            InferenceConfig::builder().type_threshold(0.6).build(),
        );
        assert_eq!(infer_with(&lenient, values.clone()), SqlType::Integer);

        let stricter = TypeInferenceEngine::with_config(
            InferenceConfig::builder().type_threshold(0.7).build(),
        );
        assert_eq!(infer_with(&stricter, values), SqlType::Text);
    }

    #[test]
    fn test_infer_column_types() {
        let rows: Vec<DataRow> = [
            json!({"id": 1, "name": "Product 1", "age": 30, "price": 19.99, "is_active": true,
                   "created_at": "2023-01-15", "updated_at": "2023-01-15T14:30:00Z", "notes": "Some notes"}),
            json!({"id": 2, "name": "Product 2", "age": 25, "price": 29.99, "is_active": false,
                   "created_at": "2023-02-20", "updated_at": "2023-02-20T15:45:00Z", "notes": "More notes"}),
            json!({"id": 3, "name": "Product 3", "age": 40, "price": 39.99, "is_active": true,
                   "created_at": "2023-03-25", "updated_at": "2023-03-25T16:00:00Z", "notes": "Even more notes"}),
        ]
        .into_iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect();
        let columns: Vec<String> = rows[0].keys().cloned().collect();

        let types = TypeInferenceEngine::new().infer_column_types(&columns, &rows);

        assert_eq!(types["id"], SqlType::Integer);
        assert_eq!(types["name"], SqlType::Text);
        assert_eq!(types["age"], SqlType::Integer);
        assert_eq!(types["price"], SqlType::Float);
        assert_eq!(types["is_active"], SqlType::Boolean);
        assert_eq!(types["created_at"], SqlType::Date);
        assert_eq!(types["updated_at"], SqlType::DateTime);
        assert_eq!(types["notes"], SqlType::Text);
        assert_eq!(types.len(), 8);
    }

    #[test]
    fn test_scalar_type() {
        let engine = TypeInferenceEngine::new();
        assert_eq!(engine.scalar_type(&json!(7)), SqlType::Integer);
        assert_eq!(engine.scalar_type(&json!("Maputo")), SqlType::Text);
        assert_eq!(engine.scalar_type(&json!("2023-01-15")), SqlType::Date);
        assert_eq!(engine.scalar_type(&json!("-25.9")), SqlType::Float);
        assert_eq!(engine.scalar_type(&Value::Null), SqlType::Text);
    }
}
