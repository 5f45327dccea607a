//! Table model for generated schemas

use serde::{Deserialize, Serialize};

use super::column::{ColumnSchema, SqlType};

/// Name of the synthetic primary key column
pub const PRIMARY_KEY_COLUMN: &str = "id";

/// Foreign key from a local column to another table's key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    /// Local column holding the reference
    pub column: String,
    /// Referenced table name
    pub ref_table: String,
    /// Referenced column (always the synthetic key)
    pub ref_column: String,
    /// Parent-to-nested-object link; emitted with `ON DELETE CASCADE`.
    /// `false` marks an array child pointing back at its parent row.
    #[serde(default)]
    pub nested_child: bool,
}

impl ForeignKey {
    pub fn new(column: impl Into<String>, ref_table: impl Into<String>, nested_child: bool) -> Self {
        Self {
            column: column.into(),
            ref_table: ref_table.into(),
            ref_column: PRIMARY_KEY_COLUMN.to_string(),
            nested_child,
        }
    }
}

/// Table schema built by structural analysis or by flat-table inference
///
/// Tables produced by the analyzer always start with the synthetic `id`
/// column. Flat tables built from a plain dataset have no primary key.
///
/// # Example
///
/// ```rust
/// use tabular_sql::models::{ColumnSchema, SqlType, TableSchema};
///
/// let mut table = TableSchema::new("users");
/// table.add_column(ColumnSchema::new("name", SqlType::Text));
/// assert_eq!(table.columns[0].name, "id");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    /// Table name, unique within a registry
    pub name: String,
    /// Ordered columns
    pub columns: Vec<ColumnSchema>,
    /// Primary key column name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    /// Foreign keys in insertion order, at most one per local column
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    /// Table this one was derived from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_table: Option<String>,
    /// Field of the parent object the table was derived from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_field: Option<String>,
    /// Nesting depth (0 = root)
    #[serde(default)]
    pub level: usize,
}

impl TableSchema {
    /// Create a root table seeded with the synthetic key column
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: vec![ColumnSchema::primary_key(PRIMARY_KEY_COLUMN)],
            primary_key: Some(PRIMARY_KEY_COLUMN.to_string()),
            foreign_keys: Vec::new(),
            parent_table: None,
            parent_field: None,
            level: 0,
        }
    }

    /// Create a table derived from `parent.field`
    pub fn child_of(name: impl Into<String>, parent: &TableSchema, field: impl Into<String>) -> Self {
        Self {
            parent_table: Some(parent.name.clone()),
            parent_field: Some(field.into()),
            level: parent.level + 1,
            ..Self::new(name)
        }
    }

    /// Create a keyless table from `(name, type)` pairs, all columns nullable
    pub fn flat(name: impl Into<String>, columns: impl IntoIterator<Item = (String, SqlType)>) -> Self {
        Self {
            name: name.into(),
            columns: columns
                .into_iter()
                .map(|(name, ty)| ColumnSchema::new(name, ty))
                .collect(),
            primary_key: None,
            foreign_keys: Vec::new(),
            parent_table: None,
            parent_field: None,
            level: 0,
        }
    }

    pub fn add_column(&mut self, column: ColumnSchema) {
        self.columns.push(column);
    }

    /// Register a foreign key, replacing any existing key on the same column
    pub fn add_foreign_key(&mut self, fk: ForeignKey) {
        match self.foreign_keys.iter_mut().find(|f| f.column == fk.column) {
            Some(existing) => *existing = fk,
            None => self.foreign_keys.push(fk),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Foreign key held on `column`, if any
    pub fn foreign_key(&self, column: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|f| f.column == column)
    }

    /// Foreign key pointing at `table`, if any
    pub fn foreign_key_to(&self, table: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|f| f.ref_table == table)
    }

    /// Whether this table holds the elements of an array of objects.
    ///
    /// Array children reference their parent without the nested-child flag;
    /// nested-object children are referenced *by* the parent instead.
    pub fn is_array_child(&self) -> bool {
        match &self.parent_table {
            Some(parent) => self
                .foreign_keys
                .iter()
                .any(|f| &f.ref_table == parent && !f.nested_child),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_has_key_column() {
        let table = TableSchema::new("users");
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].name, "id");
        assert!(!table.columns[0].nullable);
        assert_eq!(table.primary_key.as_deref(), Some("id"));
        assert_eq!(table.level, 0);
    }

    #[test]
    fn test_child_table_links_parent() {
        let parent = TableSchema::new("users");
        let child = TableSchema::child_of("addresses", &parent, "address");
        assert_eq!(child.parent_table.as_deref(), Some("users"));
        assert_eq!(child.parent_field.as_deref(), Some("address"));
        assert_eq!(child.level, 1);
        assert!(!child.is_array_child());
    }

    #[test]
    fn test_array_child_detection() {
        let parent = TableSchema::new("users");
        let mut child = TableSchema::child_of("contacts", &parent, "contacts");
        child.add_foreign_key(ForeignKey::new("users_id", "users", false));
        assert!(child.is_array_child());
    }

    #[test]
    fn test_foreign_key_replaced_per_column() {
        let mut table = TableSchema::new("users");
        table.add_foreign_key(ForeignKey::new("address_id", "addresses", true));
        table.add_foreign_key(ForeignKey::new("address_id", "addresses_1", true));
        assert_eq!(table.foreign_keys.len(), 1);
        assert_eq!(table.foreign_key("address_id").unwrap().ref_table, "addresses_1");
        assert!(table.foreign_key_to("addresses").is_none());
    }

    #[test]
    fn test_flat_table_has_no_key() {
        let table = TableSchema::flat(
            "data",
            vec![("NAME".to_string(), SqlType::Text), ("AGE".to_string(), SqlType::Integer)],
        );
        assert!(table.primary_key.is_none());
        assert_eq!(table.column_names(), vec!["NAME", "AGE"]);
        assert!(table.columns.iter().all(|c| c.nullable));
    }
}
