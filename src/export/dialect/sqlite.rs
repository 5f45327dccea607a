//! SQLite dialect

use super::Dialect;
use crate::models::SqlType;

/// SQLite dialect; dates are stored as text and booleans as integers
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn map_type(&self, sql_type: SqlType) -> &'static str {
        match sql_type {
            SqlType::Integer | SqlType::Boolean => "INTEGER",
            SqlType::Float => "REAL",
            SqlType::Text | SqlType::Date | SqlType::DateTime => "TEXT",
        }
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }
}
