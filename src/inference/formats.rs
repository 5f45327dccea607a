//! Per-value classification of dataset samples

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::config::RFC3339;

// A colon-separated time of day promotes a parsed date to a datetime.
static TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,2}:\d{1,2}").unwrap());

static FOUR_DIGIT_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

const BOOLEAN_TOKENS: &[&str] = &["true", "false", "yes", "no", "1", "0", "t", "f", "y", "n"];

/// Category a single sampled value falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueClass {
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Text,
}

pub fn is_integer(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.parse::<i64>().is_ok()
}

pub fn is_float(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.parse::<f64>().is_ok()
}

/// `true false yes no 1 0 t f y n`, trimmed and case-insensitive
pub fn is_boolean_token(s: &str) -> bool {
    let s = s.trim().to_lowercase();
    BOOLEAN_TOKENS.contains(&s.as_str())
}

/// Native booleans and boolean token strings
pub fn is_boolean_like(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::String(s) => is_boolean_token(s),
        _ => false,
    }
}

fn parses_with(layout: &str, s: &str) -> bool {
    if layout.eq_ignore_ascii_case(RFC3339) {
        DateTime::parse_from_rfc3339(s).is_ok()
    } else if layout.contains("%H") || layout.contains("%T") {
        NaiveDateTime::parse_from_str(s, layout).is_ok()
    } else {
        NaiveDate::parse_from_str(s, layout).is_ok()
    }
}

/// Parse `s` against `layouts` in order.
///
/// Returns `None` when no layout matches, otherwise whether the string
/// carries a time of day.
pub fn detect_date(s: &str, layouts: &[String]) -> Option<bool> {
    let s = s.trim();
    if s.is_empty() || !FOUR_DIGIT_YEAR.is_match(s) {
        return None;
    }
    layouts
        .iter()
        .any(|layout| parses_with(layout, s))
        .then(|| TIME_OF_DAY.is_match(s))
}

/// Classifies sampled values using a fixed list of date layouts
#[derive(Debug, Clone)]
pub struct ValueClassifier {
    date_formats: Vec<String>,
}

impl ValueClassifier {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self { date_formats }
    }

    fn date_class(&self, s: &str) -> Option<ValueClass> {
        detect_date(s, &self.date_formats).map(|has_time| {
            if has_time {
                ValueClass::DateTime
            } else {
                ValueClass::Date
            }
        })
    }

    /// Full classification used for column inference.
    ///
    /// Strings are tried as integer, float, boolean token and date, in that
    /// order. Arrays and objects count as text.
    pub fn classify(&self, value: &Value) -> ValueClass {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => ValueClass::Integer,
            Value::Number(_) => ValueClass::Float,
            Value::Bool(_) => ValueClass::Boolean,
            Value::String(s) => {
                if is_integer(s) {
                    ValueClass::Integer
                } else if is_float(s) {
                    ValueClass::Float
                } else if is_boolean_token(s) {
                    ValueClass::Boolean
                } else {
                    self.date_class(s).unwrap_or(ValueClass::Text)
                }
            }
            _ => ValueClass::Text,
        }
    }

    /// Classifies one scalar field of a nested document.
    ///
    /// Same order as [`ValueClassifier::classify`]; nulls are text.
    pub fn classify_scalar(&self, value: &Value) -> ValueClass {
        match value {
            Value::Null => ValueClass::Text,
            other => self.classify(other),
        }
    }
}
