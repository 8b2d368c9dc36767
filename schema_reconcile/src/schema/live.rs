//! Introspected-schema type definitions
//!
//! Live* types describe what currently exists in the database. They are
//! recomputed on every reconciliation pass and never cached, since they
//! mirror external mutable state.

/// A column as reported by the live database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveColumn {
    pub name: String,
    /// Engine-reported type plus attribute suffixes, e.g. `varchar(255) NOT NULL`.
    pub type_definition: String,
}

/// One row of the live index listing (one entry per indexed column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveIndexEntry {
    pub key_name: String,
    pub column_name: String,
}

/// A foreign key constraint as reported by the live database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveForeignKey {
    pub constraint_name: String,
    pub local_column: String,
    pub target_table: String,
    pub target_column: String,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

/// Snapshot of a table's live structure at a single point in time
#[derive(Debug, Clone, Default)]
pub struct LiveSchema {
    pub columns: Vec<LiveColumn>,
    pub indexes: Vec<LiveIndexEntry>,
    pub foreign_keys: Vec<LiveForeignKey>,
}
