//! Individual transformation rules

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use super::TransformError;
use crate::models::{DataRow, Dataset};

/// A single dataset transformation, tagged by its `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transformation {
    /// Rename columns, `mapping` is old name to new name
    RenameColumns {
        #[serde(default)]
        mapping: Option<BTreeMap<String, String>>,
    },
    /// Add a column computed from `expression`
    ///
    /// `a + b + "-"` concatenates the values of columns `a` and `b` (or the
    /// parts themselves when no such column exists); any other expression is
    /// used as a literal.
    AddColumn {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        expression: Option<String>,
    },
    /// Keep rows matching `column in [v1, v2]`
    FilterRows {
        #[serde(default)]
        condition: Option<String>,
    },
    /// Apply `lower`, `upper` or `trim` to a string column
    ApplyFunction {
        #[serde(default)]
        column: Option<String>,
        #[serde(default)]
        function: Option<String>,
    },
    /// Replace values of a column, matching on their text form
    ReplaceValues {
        #[serde(default)]
        column: Option<String>,
        #[serde(default)]
        mapping: Option<BTreeMap<String, String>>,
    },
    /// Remove columns
    DropColumns {
        #[serde(default)]
        columns: Vec<String>,
    },
    /// Stable sort by the text form of `columns`
    Sort {
        #[serde(default)]
        columns: Vec<String>,
        #[serde(default = "default_ascending")]
        ascending: bool,
    },
}

fn default_ascending() -> bool {
    true
}

fn required<'a, T>(value: &'a Option<T>, rule: &'static str, parameter: &'static str) -> Result<&'a T, TransformError> {
    value
        .as_ref()
        .ok_or(TransformError::MissingParameter { rule, parameter })
}

/// Text form of a value used for matching and sorting
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Transformation {
    /// Rule name as written in config files
    pub fn name(&self) -> &'static str {
        match self {
            Transformation::RenameColumns { .. } => "rename_columns",
            Transformation::AddColumn { .. } => "add_column",
            Transformation::FilterRows { .. } => "filter_rows",
            Transformation::ApplyFunction { .. } => "apply_function",
            Transformation::ReplaceValues { .. } => "replace_values",
            Transformation::DropColumns { .. } => "drop_columns",
            Transformation::Sort { .. } => "sort",
        }
    }

    /// Apply the rule to `dataset` in place
    pub fn apply(&self, dataset: &mut Dataset) -> Result<(), TransformError> {
        let rule = self.name();
        match self {
            Transformation::RenameColumns { mapping } => {
                rename_columns(dataset, required(mapping, rule, "a mapping")?);
            }
            Transformation::AddColumn { name, expression } => {
                let name = required(name, rule, "a name")?;
                let expression = required(expression, rule, "an expression")?;
                add_column(dataset, name, expression);
            }
            Transformation::FilterRows { condition } => {
                let (column, values) = parse_in_condition(required(condition, rule, "a condition")?)?;
                dataset.rows.retain(|row| {
                    row.get(&column)
                        .is_some_and(|value| values.contains(&value_text(value)))
                });
            }
            Transformation::ApplyFunction { column, function } => {
                let column = required(column, rule, "a column")?;
                let function = required(function, rule, "a function")?;
                let apply: fn(&str) -> String = match function.as_str() {
                    "lower" => |s| s.to_lowercase(),
                    "upper" => |s| s.to_uppercase(),
                    "trim" => |s| s.trim().to_string(),
                    other => return Err(TransformError::UnsupportedFunction(other.to_string())),
                };
                for row in &mut dataset.rows {
                    if let Some(Value::String(text)) = row.get_mut(column) {
                        *text = apply(text);
                    }
                }
            }
            Transformation::ReplaceValues { column, mapping } => {
                let column = required(column, rule, "a column")?;
                let mapping = required(mapping, rule, "a mapping")?;
                for row in &mut dataset.rows {
                    if let Some(value) = row.get_mut(column)
                        && let Some(replacement) = mapping.get(&value_text(value))
                    {
                        *value = Value::String(replacement.clone());
                    }
                }
            }
            Transformation::DropColumns { columns } => {
                if columns.is_empty() {
                    return Err(TransformError::MissingParameter { rule, parameter: "columns" });
                }
                let drop: HashSet<&str> = columns.iter().map(String::as_str).collect();
                dataset.columns.retain(|c| !drop.contains(c.as_str()));
                for row in &mut dataset.rows {
                    row.retain(|key, _| !drop.contains(key.as_str()));
                }
            }
            Transformation::Sort { columns, ascending } => {
                if columns.is_empty() {
                    return Err(TransformError::MissingParameter { rule, parameter: "columns" });
                }
                dataset
                    .rows
                    .sort_by(|a, b| compare_rows(a, b, columns, *ascending));
            }
        }
        Ok(())
    }
}

fn rename_columns(dataset: &mut Dataset, mapping: &BTreeMap<String, String>) {
    let renamed = |name: &String| mapping.get(name).unwrap_or(name).clone();
    dataset.columns = dataset.columns.iter().map(renamed).collect();
    for row in &mut dataset.rows {
        *row = std::mem::take(row)
            .into_iter()
            .map(|(key, value)| (renamed(&key), value))
            .collect();
    }
}

fn add_column(dataset: &mut Dataset, name: &str, expression: &str) {
    if !dataset.columns.iter().any(|c| c == name) {
        dataset.columns.push(name.to_string());
    }
    for row in &mut dataset.rows {
        let value = if expression.contains('+') {
            expression
                .split('+')
                .map(str::trim)
                .map(|part| match row.get(part) {
                    Some(value) => value_text(value),
                    None => part.trim_matches(|c| c == '"' || c == '\'').to_string(),
                })
                .collect::<String>()
        } else {
            expression.to_string()
        };
        row.insert(name.to_string(), Value::String(value));
    }
}

/// Split `column in [a, 'b', "c"]` into the column and its accepted values
fn parse_in_condition(condition: &str) -> Result<(String, Vec<String>), TransformError> {
    let Some((column, list)) = condition.split_once(" in ") else {
        return Err(TransformError::InvalidCondition(condition.to_string()));
    };
    let column = column.trim();
    if column.is_empty() {
        return Err(TransformError::InvalidCondition(condition.to_string()));
    }
    let values = list
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|v| v.trim_matches(|c| c == ' ' || c == '\'' || c == '"').to_string())
        .collect();
    Ok((column.to_string(), values))
}

/// Rows lacking a sort column go last when ascending and first when descending
fn compare_rows(a: &DataRow, b: &DataRow, columns: &[String], ascending: bool) -> Ordering {
    for column in columns {
        let ordering = match (a.get(column), b.get(column)) {
            (None, None) => continue,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => value_text(x).cmp(&value_text(y)),
        };
        if ordering != Ordering::Equal {
            return if ascending { ordering } else { ordering.reverse() };
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset() -> Dataset {
        Dataset::from_json_value(json!([
            {"first": "Alice", "last": "Smith", "city": "Maputo", "age": 30},
            {"first": "Bob", "last": "Jones", "city": "Beira", "age": 25},
            {"first": "Carol", "last": "Ng", "age": 41}
        ]))
        .unwrap()
    }

    #[test]
    fn test_rename_columns() {
        let mut data = dataset();
        let rule: Transformation =
            serde_json::from_value(json!({"type": "rename_columns", "mapping": {"first": "given"}})).unwrap();
        rule.apply(&mut data).unwrap();
        assert_eq!(data.columns, vec!["given", "last", "city", "age"]);
        assert_eq!(data.rows[0]["given"], json!("Alice"));
        assert!(!data.rows[0].contains_key("first"));
        assert_eq!(data.rows[0].keys().next().map(String::as_str), Some("given"));
    }

    #[test]
    fn test_add_column_concatenates() {
        let mut data = dataset();
        let rule = Transformation::AddColumn {
            name: Some("full".to_string()),
            expression: Some("first + ' ' + last".to_string()),
        };
        rule.apply(&mut data).unwrap();
        assert_eq!(data.rows[0]["full"], json!("Alice Smith"));
        assert_eq!(data.columns.last().map(String::as_str), Some("full"));
    }

    #[test]
    fn test_add_column_literal() {
        let mut data = dataset();
        let rule = Transformation::AddColumn {
            name: Some("source".to_string()),
            expression: Some("import".to_string()),
        };
        rule.apply(&mut data).unwrap();
        assert!(data.rows.iter().all(|r| r["source"] == json!("import")));
    }

    #[test]
    fn test_filter_rows() {
        let mut data = dataset();
        let rule = Transformation::FilterRows {
            condition: Some("city in ['Maputo', \"Beira\"]".to_string()),
        };
        rule.apply(&mut data).unwrap();
        assert_eq!(data.len(), 2);

        let mut data = dataset();
        let numeric = Transformation::FilterRows {
            condition: Some("age in [25]".to_string()),
        };
        numeric.apply(&mut data).unwrap();
        assert_eq!(data.rows[0]["first"], json!("Bob"));
    }

    #[test]
    fn test_filter_rejects_unknown_condition() {
        let rule = Transformation::FilterRows {
            condition: Some("age > 3".to_string()),
        };
        assert!(matches!(
            rule.apply(&mut dataset()),
            Err(TransformError::InvalidCondition(_))
        ));
    }

    #[test]
    fn test_apply_function() {
        let mut data = dataset();
        let rule = Transformation::ApplyFunction {
            column: Some("city".to_string()),
            function: Some("upper".to_string()),
        };
        rule.apply(&mut data).unwrap();
        assert_eq!(data.rows[0]["city"], json!("MAPUTO"));
        assert!(!data.rows[2].contains_key("city"));

        let unknown = Transformation::ApplyFunction {
            column: Some("city".to_string()),
            function: Some("reverse".to_string()),
        };
        assert!(matches!(
            unknown.apply(&mut data),
            Err(TransformError::UnsupportedFunction(_))
        ));
    }

    #[test]
    fn test_replace_values() {
        let mut data = dataset();
        let mut mapping = BTreeMap::new();
        mapping.insert("30".to_string(), "thirty".to_string());
        let rule = Transformation::ReplaceValues {
            column: Some("age".to_string()),
            mapping: Some(mapping),
        };
        rule.apply(&mut data).unwrap();
        assert_eq!(data.rows[0]["age"], json!("thirty"));
        assert_eq!(data.rows[1]["age"], json!(25));
    }

    #[test]
    fn test_drop_columns() {
        let mut data = dataset();
        let rule = Transformation::DropColumns {
            columns: vec!["age".to_string(), "city".to_string()],
        };
        rule.apply(&mut data).unwrap();
        assert_eq!(data.columns, vec!["first", "last"]);
        assert!(data.rows.iter().all(|r| r.len() == 2));
    }

    #[test]
    fn test_sort_missing_values_last() {
        let mut data = dataset();
        let rule = Transformation::Sort {
            columns: vec!["city".to_string()],
            ascending: true,
        };
        rule.apply(&mut data).unwrap();
        let names: Vec<&Value> = data.rows.iter().map(|r| &r["first"]).collect();
        assert_eq!(names, [&json!("Bob"), &json!("Alice"), &json!("Carol")]);

        let descending = Transformation::Sort {
            columns: vec!["city".to_string()],
            ascending: false,
        };
        descending.apply(&mut data).unwrap();
        assert_eq!(data.rows[0]["first"], json!("Carol"));
        assert_eq!(data.rows[1]["first"], json!("Alice"));
    }

    #[test]
    fn test_missing_parameters() {
        let err = Transformation::RenameColumns { mapping: None }
            .apply(&mut dataset())
            .unwrap_err();
        assert_eq!(err.to_string(), "rename_columns transformation requires a mapping");

        let err = Transformation::Sort { columns: vec![], ascending: true }
            .apply(&mut dataset())
            .unwrap_err();
        assert!(matches!(err, TransformError::MissingParameter { rule: "sort", .. }));
    }
}
