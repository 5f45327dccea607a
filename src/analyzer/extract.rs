//! Per-table row extraction for an analyzed document

use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

use super::json::JsonAnalyzer;
use super::shape::{as_array, as_object};
use crate::models::{DataRow, PRIMARY_KEY_COLUMN, TableSchema};

/// Rows for every table, keyed by table name
pub type ExtractedData = HashMap<String, Vec<DataRow>>;

/// Synthetic key sequence shared by all tables of one extraction
#[derive(Debug)]
struct IdSequence(i64);

impl IdSequence {
    fn new() -> Self {
        Self(1)
    }

    fn next(&mut self) -> i64 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

impl JsonAnalyzer {
    /// Split `rows` into per-table rows following the last analyzed schema.
    ///
    /// Tables are filled breadth-first from the root, so a parent's rows
    /// (and ids) always exist before its children are extracted. Rows keep
    /// every source field next to the schema columns; emission only reads
    /// the schema columns.
    pub fn extract_nested_data(&self, rows: &[DataRow]) -> ExtractedData {
        let mut result = ExtractedData::new();
        let Some(root) = self.registry.root_table() else {
            warn!("No root table found; run analyze first");
            return result;
        };

        let mut ids = IdSequence::new();
        let root_rows: Vec<DataRow> = rows
            .iter()
            .map(|obj| build_row(root, obj, ids.next()))
            .collect();
        debug!(table = %root.name, rows = root_rows.len(), "Extracted root rows");
        result.insert(root.name.clone(), root_rows);

        let mut processed = HashSet::from([root.name.clone()]);
        let mut queue = VecDeque::from([root.name.clone()]);

        while let Some(parent_name) = queue.pop_front() {
            let Some(parent) = self.registry.get_table(&parent_name) else {
                continue;
            };
            for child in self.registry.children_of(&parent_name) {
                if !processed.insert(child.name.clone()) {
                    continue;
                }
                let Some(mut parent_rows) = result.remove(&parent_name) else {
                    continue;
                };

                let child_rows = if child.is_array_child() {
                    extract_array_rows(&parent_rows, parent, child, &mut ids)
                } else {
                    extract_nested_rows(&mut parent_rows, parent, child, &mut ids)
                };
                debug!(
                    table = %child.name,
                    parent = %parent_name,
                    rows = child_rows.len(),
                    array = child.is_array_child(),
                    "Extracted child rows"
                );

                result.insert(parent_name.clone(), parent_rows);
                result.insert(child.name.clone(), child_rows);
                queue.push_back(child.name.clone());
            }
        }

        for table in self.registry.tables() {
            result.entry(table.name.clone()).or_default();
        }
        result
    }
}

/// A row of `table` for source object `obj`: the key, the schema columns,
/// then every remaining source field.
fn build_row(table: &TableSchema, obj: &DataRow, id: i64) -> DataRow {
    let mut row = DataRow::new();
    row.insert(PRIMARY_KEY_COLUMN.to_string(), Value::from(id));

    for column in &table.columns {
        if row.contains_key(&column.name) {
            continue;
        }
        if column.is_nested {
            // Filled in when the nested child is extracted.
            row.insert(column.name.clone(), Value::Null);
            continue;
        }
        if let Some(value) = obj.get(&column.name) {
            let value = if column.is_array {
                array_text(value)
            } else {
                value.clone()
            };
            row.insert(column.name.clone(), value);
        }
    }

    for (key, value) in obj {
        if !row.contains_key(key) {
            row.insert(key.clone(), value.clone());
        }
    }
    row
}

/// Serialized JSON text for an array column value
fn array_text(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        other => other.clone(),
    }
}

fn extract_nested_rows(
    parent_rows: &mut [DataRow],
    parent: &TableSchema,
    child: &TableSchema,
    ids: &mut IdSequence,
) -> Vec<DataRow> {
    let Some(fk_column) = parent.foreign_key_to(&child.name).map(|fk| fk.column.clone()) else {
        warn!(parent = %parent.name, child = %child.name, "No foreign key to nested table");
        return Vec::new();
    };
    let Some(field) = child.parent_field.as_deref() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for parent_row in parent_rows.iter_mut() {
        let Some(obj) = parent_row.get(field).and_then(as_object).map(|obj| obj.into_owned()) else {
            continue;
        };
        let id = ids.next();
        parent_row.insert(fk_column.clone(), Value::from(id));
        rows.push(build_row(child, &obj, id));
    }
    rows
}

fn extract_array_rows(
    parent_rows: &[DataRow],
    parent: &TableSchema,
    child: &TableSchema,
    ids: &mut IdSequence,
) -> Vec<DataRow> {
    let Some(fk_column) = child.foreign_key_to(&parent.name).map(|fk| fk.column.as_str()) else {
        return Vec::new();
    };
    let Some(field) = child.parent_field.as_deref() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for parent_row in parent_rows {
        let Some(items) = parent_row.get(field).and_then(as_array) else {
            continue;
        };
        let parent_id = parent_row.get(PRIMARY_KEY_COLUMN).cloned().unwrap_or(Value::Null);
        for item in items.iter() {
            let Some(obj) = as_object(item) else {
                continue;
            };
            // The parent link wins over an element field of the same name.
            let mut seeded = obj.into_owned();
            seeded.insert(fk_column.to_string(), parent_id.clone());
            rows.push(build_row(child, &seeded, ids.next()));
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<DataRow> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|v| v.as_object().unwrap().clone())
                .collect(),
            Value::Object(map) => vec![map],
            _ => panic!("expected object rows"),
        }
    }

    fn analyze(data: &[DataRow], root: &str) -> JsonAnalyzer {
        let mut analyzer = JsonAnalyzer::new();
        analyzer.analyze(data, root).unwrap();
        analyzer
    }

    #[test]
    fn test_nested_objects_are_linked_by_id() {
        let data = rows(json!({
            "id": 99, "name": "Alice",
            "address": {"city": "Maputo", "geo": {"lat": "-25.9", "lng": "32.6"}}
        }));
        let analyzer = analyze(&data, "users");
        let extracted = analyzer.extract_nested_data(&data);

        let users = &extracted["users"];
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["id"], json!(1));
        assert_eq!(users[0]["name"], json!("Alice"));
        assert_eq!(users[0]["address_id"], json!(2));

        let addresses = &extracted["addresses"];
        assert_eq!(addresses[0]["id"], json!(2));
        assert_eq!(addresses[0]["city"], json!("Maputo"));
        assert_eq!(addresses[0]["geo_id"], json!(3));

        let geos = &extracted["geos"];
        assert_eq!(geos[0]["id"], json!(3));
        assert_eq!(geos[0]["lat"], json!("-25.9"));
    }

    #[test]
    fn test_missing_nested_object_leaves_null_key() {
        let data = rows(json!([
            {"name": "Alice", "address": {"city": "Maputo"}},
            {"name": "Bob"}
        ]));
        let analyzer = analyze(&data, "users");
        let extracted = analyzer.extract_nested_data(&data);

        let users = &extracted["users"];
        assert_eq!(users[0]["address_id"], json!(3));
        assert_eq!(users[1]["address_id"], Value::Null);
        assert_eq!(extracted["addresses"].len(), 1);
    }

    #[test]
    fn test_array_children_reference_parent() {
        let data = rows(json!([
            {"name": "Alice", "tags": ["a", "b"], "contacts": [{"type": "email"}, {"type": "phone"}]},
            {"name": "Bob", "contacts": "[{\"type\": \"fax\"}]"}
        ]));
        let analyzer = analyze(&data, "users");
        let extracted = analyzer.extract_nested_data(&data);

        let users = &extracted["users"];
        assert_eq!(users[0]["tags"], json!(r#"["a","b"]"#));

        let contacts = &extracted["contacts"];
        assert_eq!(contacts.len(), 3);
        let parents: Vec<&Value> = contacts.iter().map(|r| &r["users_id"]).collect();
        assert_eq!(parents, [&json!(1), &json!(1), &json!(2)]);
        let ids: Vec<&Value> = contacts.iter().map(|r| &r["id"]).collect();
        assert_eq!(ids, [&json!(3), &json!(4), &json!(5)]);
        assert_eq!(contacts[2]["type"], json!("fax"));
    }

    #[test]
    fn test_element_field_cannot_replace_parent_link() {
        let data = rows(json!({"name": "Alice", "contacts": [{"users_id": 99, "kind": "email"}]}));
        let analyzer = analyze(&data, "users");
        let extracted = analyzer.extract_nested_data(&data);

        let contacts = &extracted["contacts"];
        assert_eq!(contacts[0]["users_id"], json!(1));
        assert_eq!(contacts[0]["kind"], json!("email"));
    }

    #[test]
    fn test_nested_inside_array_elements() {
        let data = rows(json!({
            "name": "Alice",
            "orders": [{"total": 3, "shipping": {"city": "Beira"}}]
        }));
        let analyzer = analyze(&data, "users");
        let extracted = analyzer.extract_nested_data(&data);

        let orders = &extracted["orders"];
        let shippings = &extracted["shippings"];
        assert_eq!(shippings.len(), 1);
        assert_eq!(orders[0]["shipping_id"], shippings[0]["id"]);
    }

    #[test]
    fn test_every_table_has_an_entry() {
        let data = rows(json!({"name": "Alice", "contacts": []}));
        let analyzer = analyze(&data, "users");
        let extracted = analyzer.extract_nested_data(&data);
        assert_eq!(extracted.len(), 1);

        let data = rows(json!([{"contacts": [{"a": 1}]}, {"contacts": "none"}]));
        let analyzer = analyze(&data, "users");
        let extracted = analyzer.extract_nested_data(&data);
        assert_eq!(extracted["contacts"].len(), 1);
    }

    #[test]
    fn test_extract_without_analyze_is_empty() {
        let analyzer = JsonAnalyzer::new();
        assert!(analyzer.extract_nested_data(&[]).is_empty());
    }
}
