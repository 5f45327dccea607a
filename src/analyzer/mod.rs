//! Nested JSON analysis
//!
//! Turns rows holding nested objects and arrays into a set of related
//! tables, then splits the rows across those tables.
//!
//! ## Features
//!
//! - **Structure pass**: nested objects and arrays of objects become child
//!   tables; arrays of primitives become JSON text columns
//! - **JSON text probing**: string fields holding JSON objects or arrays are
//!   decoded and treated like native structure
//! - **Extraction**: synthetic keys link parent and child rows
//!
//! ## Example
//!
//! ```rust,ignore
//! use tabular_sql::analyzer::JsonAnalyzer;
//!
//! let mut analyzer = JsonAnalyzer::new();
//! analyzer.analyze(&rows, "users")?;
//! let per_table = analyzer.extract_nested_data(&rows);
//! ```

mod extract;
mod json;
mod shape;

pub use extract::ExtractedData;
pub use json::JsonAnalyzer;
pub use shape::{Shape, as_array, as_object, has_nested_values, is_nested, shape_of};
