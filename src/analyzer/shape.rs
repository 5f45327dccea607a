//! Two-step classification of JSON-ish values
//!
//! A value is first checked for native structure; strings are then decoded
//! and checked again. A failed decode always means "scalar".

use serde_json::Value;
use std::borrow::Cow;

use crate::models::DataRow;

/// Structural shape of a field value
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a> {
    Object(Cow<'a, DataRow>),
    Array(Cow<'a, Vec<Value>>),
    Scalar,
}

fn decode(text: &str) -> Option<Value> {
    let trimmed = text.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

/// Classify `value` as an object, an array or a scalar
pub fn shape_of(value: &Value) -> Shape<'_> {
    match value {
        Value::Object(map) => Shape::Object(Cow::Borrowed(map)),
        Value::Array(items) => Shape::Array(Cow::Borrowed(items)),
        Value::String(text) => match decode(text) {
            Some(Value::Object(map)) => Shape::Object(Cow::Owned(map)),
            Some(Value::Array(items)) => Shape::Array(Cow::Owned(items)),
            _ => Shape::Scalar,
        },
        _ => Shape::Scalar,
    }
}

/// The object behind `value`, decoding JSON text if needed
pub fn as_object(value: &Value) -> Option<Cow<'_, DataRow>> {
    match shape_of(value) {
        Shape::Object(map) => Some(map),
        _ => None,
    }
}

/// The array behind `value`, decoding JSON text if needed
pub fn as_array(value: &Value) -> Option<Cow<'_, Vec<Value>>> {
    match shape_of(value) {
        Shape::Array(items) => Some(items),
        _ => None,
    }
}

pub fn is_object_like(value: &Value) -> bool {
    as_object(value).is_some()
}

/// Whether `value` calls for child tables: an object, or an array holding one
pub fn is_nested(value: &Value) -> bool {
    match shape_of(value) {
        Shape::Object(_) => true,
        Shape::Array(items) => items.iter().any(is_object_like),
        Shape::Scalar => false,
    }
}

/// Whether any row of `rows` holds a nested value
pub fn has_nested_values(rows: &[DataRow]) -> bool {
    rows.iter().any(|row| row.values().any(is_nested))
}
