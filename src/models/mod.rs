//! Models module
//!
//! Defines the dataset hand-off shape and the table/column schemas the
//! analyzer builds and the dialects render.

pub mod column;
pub mod dataset;
pub mod table;

pub use column::{ColumnSchema, SqlType};
pub use dataset::{DataRow, Dataset};
pub use table::{ForeignKey, PRIMARY_KEY_COLUMN, TableSchema};
