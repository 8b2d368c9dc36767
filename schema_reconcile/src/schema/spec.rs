//! Declared-schema type definitions
//!
//! These types carry the table metadata produced by the application's model
//! registry. They are plain data: the reconciler consumes them, it does not
//! care how they were declared.

use serde::{Deserialize, Serialize};

/// Declared definition of a single table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    /// Column and constraint list exactly as it would appear between the
    /// parentheses of a `CREATE TABLE` statement.
    pub raw_schema: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    #[serde(default)]
    pub auto_increment_column: Option<String>,
    #[serde(default)]
    pub indexes: Vec<IndexSpec>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeySpec>,
}

fn default_primary_key() -> String {
    "id".to_string()
}

impl TableSpec {
    /// Create a new table spec with the given name and raw column list
    pub fn new(name: &str, raw_schema: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_schema: raw_schema.to_string(),
            primary_key: default_primary_key(),
            auto_increment_column: None,
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Set the primary key column
    pub fn primary_key(mut self, column: &str) -> Self {
        self.primary_key = column.to_string();
        self
    }

    /// Set the auto-increment column
    pub fn auto_increment(mut self, column: &str) -> Self {
        self.auto_increment_column = Some(column.to_string());
        self
    }

    /// Add a declared index
    pub fn index(mut self, name: &str, column: &str) -> Self {
        self.indexes.push(IndexSpec {
            name: name.to_string(),
            column: column.to_string(),
        });
        self
    }

    /// Add a declared foreign key
    pub fn foreign_key(mut self, fk: ForeignKeySpec) -> Self {
        self.foreign_keys.push(fk);
        self
    }
}

/// A declared index: name plus the column expression it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub name: String,
    pub column: String,
}

/// A declared foreign key constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeySpec {
    pub name: String,
    pub local_column: String,
    pub target_table: String,
    pub target_column: String,
    #[serde(default)]
    pub on_delete: Option<String>,
    #[serde(default)]
    pub on_update: Option<String>,
}

impl ForeignKeySpec {
    /// Create a foreign key spec with no referential action rules
    pub fn new(name: &str, local_column: &str, target_table: &str, target_column: &str) -> Self {
        Self {
            name: name.to_string(),
            local_column: local_column.to_string(),
            target_table: target_table.to_string(),
            target_column: target_column.to_string(),
            on_delete: None,
            on_update: None,
        }
    }

    /// Set the ON DELETE rule
    pub fn on_delete(mut self, rule: &str) -> Self {
        self.on_delete = Some(rule.to_string());
        self
    }

    /// Set the ON UPDATE rule
    pub fn on_update(mut self, rule: &str) -> Self {
        self.on_update = Some(rule.to_string());
        self
    }
}

/// A single parsed column declaration: name plus its type/constraint suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    /// Everything after the column name, e.g. `VARCHAR(255) NOT NULL`.
    pub definition: String,
}
