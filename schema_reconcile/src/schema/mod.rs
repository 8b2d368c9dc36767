//! Schema module
//!
//! Declared and introspected schema types, column-list parsing, and the
//! declared-vs-live diff calculation.

pub mod diff;
pub mod live;
pub mod parser;
pub mod spec;

// Re-export key types
pub use diff::{ColumnChange, SchemaDiff};
pub use live::{LiveColumn, LiveForeignKey, LiveIndexEntry, LiveSchema};
pub use parser::parse_column_definitions;
pub use spec::{ColumnSpec, ForeignKeySpec, IndexSpec, TableSpec};
