//! Schema registry
//!
//! Holds the tables discovered while analyzing a document and orders them
//! so every referenced table is created first.

mod registry;

pub use registry::SchemaRegistry;
