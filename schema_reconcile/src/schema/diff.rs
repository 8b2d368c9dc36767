//! Schema difference calculator
//!
//! Compares a declared table definition against its live introspected
//! structure and produces the set of changes needed to converge the live
//! table to the declaration. Pure: no side effects, no I/O.

use crate::schema::live::{LiveForeignKey, LiveIndexEntry, LiveSchema};
use crate::schema::spec::{ColumnSpec, ForeignKeySpec, IndexSpec, TableSpec};

/// Changes needed to bring a live table in line with its declaration
#[derive(Debug, Clone, Default)]
pub struct SchemaDiff {
    pub columns_to_add: Vec<ColumnSpec>,
    pub columns_to_modify: Vec<ColumnChange>,
    pub indexes_to_create: Vec<IndexSpec>,
    pub indexes_to_drop: Vec<LiveIndexEntry>,
    pub foreign_keys_to_create: Vec<ForeignKeySpec>,
    pub foreign_keys_to_drop: Vec<LiveForeignKey>,
}

/// A column whose live definition no longer matches the declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChange {
    pub name: String,
    pub new_definition: String,
}

impl SchemaDiff {
    /// Generate the diff between a declared table and its live snapshot.
    ///
    /// Ordering is deterministic: additions come out in declared order,
    /// removals in live-scan order. Nothing here depends on map iteration.
    pub fn generate(spec: &TableSpec, declared_columns: &[ColumnSpec], live: &LiveSchema) -> Self {
        let mut columns_to_add = Vec::new();
        let mut columns_to_modify = Vec::new();

        for declared in declared_columns {
            match live.columns.iter().find(|c| c.name == declared.name) {
                None => columns_to_add.push(declared.clone()),
                Some(live_column) => {
                    let wanted = normalize_definition(&declared.definition);
                    if wanted != live_column.type_definition.trim() {
                        columns_to_modify.push(ColumnChange {
                            name: declared.name.clone(),
                            new_definition: wanted,
                        });
                    }
                }
            }
        }

        // Live-only columns are left alone: the engine never drops a
        // data-bearing column.

        let indexes_to_create = spec
            .indexes
            .iter()
            .filter(|declared| {
                !live
                    .indexes
                    .iter()
                    .any(|live_ix| index_matches(declared, live_ix))
            })
            .cloned()
            .collect();

        let indexes_to_drop = live
            .indexes
            .iter()
            .filter(|live_ix| {
                !spec
                    .indexes
                    .iter()
                    .any(|declared| index_matches(declared, live_ix))
            })
            .cloned()
            .collect();

        let foreign_keys_to_create = spec
            .foreign_keys
            .iter()
            .filter(|declared| {
                !live
                    .foreign_keys
                    .iter()
                    .any(|live_fk| foreign_key_matches(declared, live_fk))
            })
            .cloned()
            .collect();

        let foreign_keys_to_drop = live
            .foreign_keys
            .iter()
            .filter(|live_fk| {
                !spec
                    .foreign_keys
                    .iter()
                    .any(|declared| foreign_key_matches(declared, live_fk))
            })
            .cloned()
            .collect();

        Self {
            columns_to_add,
            columns_to_modify,
            indexes_to_create,
            indexes_to_drop,
            foreign_keys_to_create,
            foreign_keys_to_drop,
        }
    }

    /// Check if the diff is empty (table already in sync)
    pub fn is_empty(&self) -> bool {
        self.columns_to_add.is_empty()
            && self.columns_to_modify.is_empty()
            && self.indexes_to_create.is_empty()
            && self.indexes_to_drop.is_empty()
            && self.foreign_keys_to_create.is_empty()
            && self.foreign_keys_to_drop.is_empty()
    }
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn normalize_definition(definition: &str) -> String {
    definition.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn index_matches(declared: &IndexSpec, live: &LiveIndexEntry) -> bool {
    declared.name == live.key_name && declared.column == live.column_name
}

/// Foreign keys are compared on name and column wiring only. The
/// ON DELETE / ON UPDATE rules are deliberately excluded: a rule-only change
/// is reported as "no change" and never generates DDL.
fn foreign_key_matches(declared: &ForeignKeySpec, live: &LiveForeignKey) -> bool {
    declared.name == live.constraint_name
        && declared.local_column == live.local_column
        && declared.target_table == live.target_table
        && declared.target_column == live.target_column
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::schema::live::LiveColumn;
    use crate::schema::parser::parse_column_definitions;

    fn live_column(name: &str, type_definition: &str) -> LiveColumn {
        LiveColumn {
            name: name.to_string(),
            type_definition: type_definition.to_string(),
        }
    }

    #[test]
    fn missing_column_is_added() {
        let spec = TableSpec::new("users", "name VARCHAR(255), email VARCHAR(255)");
        let declared = parse_column_definitions(&spec.raw_schema);
        let live = LiveSchema {
            columns: vec![live_column("name", "VARCHAR(255)")],
            ..Default::default()
        };

        let diff = SchemaDiff::generate(&spec, &declared, &live);

        assert_eq!(diff.columns_to_add.len(), 1);
        assert_eq!(diff.columns_to_add[0].name, "email");
        assert!(diff.columns_to_modify.is_empty());
    }

    #[test]
    fn changed_definition_is_modified() {
        let spec = TableSpec::new("users", "name VARCHAR(512) NOT NULL");
        let declared = parse_column_definitions(&spec.raw_schema);
        let live = LiveSchema {
            columns: vec![live_column("name", "VARCHAR(255) NOT NULL")],
            ..Default::default()
        };

        let diff = SchemaDiff::generate(&spec, &declared, &live);

        assert_eq!(
            diff.columns_to_modify,
            vec![ColumnChange {
                name: "name".to_string(),
                new_definition: "VARCHAR(512) NOT NULL".to_string(),
            }]
        );
    }

    #[test]
    fn whitespace_differences_are_not_changes() {
        let spec = TableSpec::new("users", "name   VARCHAR(255)   NOT   NULL");
        let declared = parse_column_definitions(&spec.raw_schema);
        let live = LiveSchema {
            columns: vec![live_column("name", " VARCHAR(255) NOT NULL ")],
            ..Default::default()
        };

        let diff = SchemaDiff::generate(&spec, &declared, &live);

        assert!(diff.is_empty());
    }

    #[test]
    fn live_only_columns_are_never_dropped() {
        let spec = TableSpec::new("users", "name VARCHAR(255)");
        let declared = parse_column_definitions(&spec.raw_schema);
        let live = LiveSchema {
            columns: vec![
                live_column("name", "VARCHAR(255)"),
                live_column("legacy_notes", "TEXT"),
            ],
            ..Default::default()
        };

        let diff = SchemaDiff::generate(&spec, &declared, &live);

        assert!(diff.is_empty());
    }

    #[test]
    fn disjoint_indexes_produce_one_create_and_one_drop() {
        let spec = TableSpec::new("users", "a INT, b INT").index("idx_a", "col_a");
        let declared = parse_column_definitions(&spec.raw_schema);
        let live = LiveSchema {
            columns: vec![live_column("a", "INT"), live_column("b", "INT")],
            indexes: vec![LiveIndexEntry {
                key_name: "idx_b".to_string(),
                column_name: "col_b".to_string(),
            }],
            ..Default::default()
        };

        let diff = SchemaDiff::generate(&spec, &declared, &live);

        assert_eq!(diff.indexes_to_create.len(), 1);
        assert_eq!(diff.indexes_to_create[0].name, "idx_a");
        assert_eq!(diff.indexes_to_drop.len(), 1);
        assert_eq!(diff.indexes_to_drop[0].key_name, "idx_b");
    }

    #[test]
    fn index_on_renamed_column_is_drop_plus_create() {
        let spec = TableSpec::new("users", "email VARCHAR(255)").index("idx_email", "email");
        let declared = parse_column_definitions(&spec.raw_schema);
        let live = LiveSchema {
            columns: vec![live_column("email", "VARCHAR(255)")],
            indexes: vec![LiveIndexEntry {
                key_name: "idx_email".to_string(),
                column_name: "old_email".to_string(),
            }],
            ..Default::default()
        };

        let diff = SchemaDiff::generate(&spec, &declared, &live);

        assert_eq!(diff.indexes_to_create.len(), 1);
        assert_eq!(diff.indexes_to_drop.len(), 1);
    }

    #[test]
    fn foreign_key_rule_change_is_not_a_change() {
        let spec = TableSpec::new("posts", "user_id INT").foreign_key(
            ForeignKeySpec::new("fk1", "user_id", "users", "id").on_delete("CASCADE"),
        );
        let declared = parse_column_definitions(&spec.raw_schema);
        let live = LiveSchema {
            columns: vec![live_column("user_id", "INT")],
            foreign_keys: vec![LiveForeignKey {
                constraint_name: "fk1".to_string(),
                local_column: "user_id".to_string(),
                target_table: "users".to_string(),
                target_column: "id".to_string(),
                on_delete: Some("RESTRICT".to_string()),
                on_update: None,
            }],
            ..Default::default()
        };

        let diff = SchemaDiff::generate(&spec, &declared, &live);

        assert!(diff.is_empty());
    }

    #[test]
    fn retargeted_foreign_key_is_drop_plus_create() {
        let spec = TableSpec::new("posts", "user_id INT")
            .foreign_key(ForeignKeySpec::new("fk1", "user_id", "accounts", "id"));
        let declared = parse_column_definitions(&spec.raw_schema);
        let live = LiveSchema {
            columns: vec![live_column("user_id", "INT")],
            foreign_keys: vec![LiveForeignKey {
                constraint_name: "fk1".to_string(),
                local_column: "user_id".to_string(),
                target_table: "users".to_string(),
                target_column: "id".to_string(),
                on_delete: None,
                on_update: None,
            }],
            ..Default::default()
        };

        let diff = SchemaDiff::generate(&spec, &declared, &live);

        assert_eq!(diff.foreign_keys_to_create.len(), 1);
        assert_eq!(diff.foreign_keys_to_create[0].target_table, "accounts");
        assert_eq!(diff.foreign_keys_to_drop.len(), 1);
        assert_eq!(diff.foreign_keys_to_drop[0].target_table, "users");
    }

    #[test]
    fn aligned_schema_yields_empty_diff() {
        let spec = TableSpec::new("users", "id INT NOT NULL, name VARCHAR(255), PRIMARY KEY(id)")
            .index("idx_name", "name");
        let declared = parse_column_definitions(&spec.raw_schema);
        let live = LiveSchema {
            columns: vec![
                live_column("id", "INT NOT NULL"),
                live_column("name", "VARCHAR(255)"),
            ],
            indexes: vec![LiveIndexEntry {
                key_name: "idx_name".to_string(),
                column_name: "name".to_string(),
            }],
            ..Default::default()
        };

        let diff = SchemaDiff::generate(&spec, &declared, &live);

        assert!(diff.is_empty());
    }
}
