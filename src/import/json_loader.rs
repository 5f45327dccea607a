//! JSON loader

use serde_json::Value;

use super::{InputFormat, LoadError, Loader};
use crate::models::Dataset;

/// Loads a JSON array of objects, or a single object, keeping nested values
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl Loader for JsonLoader {
    fn format(&self) -> InputFormat {
        InputFormat::Json
    }

    fn parse(&self, text: &str) -> Result<Dataset, LoadError> {
        parse_json_dataset(text.as_bytes())
    }
}

/// Decode JSON bytes into a dataset whose columns are the union of the
/// object keys in first-seen order
pub fn parse_json_dataset(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| LoadError::parse(InputFormat::Json, e))?;
    Dataset::from_json_value(value)
}
