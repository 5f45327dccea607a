//! Generic ANSI-style dialect

use super::Dialect;
use crate::models::SqlType;

/// Dialect emitting the canonical type names unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn map_type(&self, sql_type: SqlType) -> &'static str {
        sql_type.as_str()
    }
}
