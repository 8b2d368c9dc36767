//! DDL application
//!
//! Turns a [`SchemaDiff`] into concrete DDL statements and executes them one
//! at a time against the live connection.

use tracing::{error, info};

use crate::db::SchemaConnection;
use crate::error::{Error, Result};
use crate::schema::diff::SchemaDiff;
use crate::schema::spec::ForeignKeySpec;

/// One planned DDL statement, paired with a human-readable action line
/// identifying the object being changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlStatement {
    pub action: String,
    pub sql: String,
}

/// Applies a schema diff to a single table
pub struct MigrationApplier<'a, C: SchemaConnection + ?Sized> {
    connection: &'a C,
    table: &'a str,
    dry_run: bool,
    continue_on_error: bool,
}

impl<'a, C: SchemaConnection + ?Sized> MigrationApplier<'a, C> {
    /// Create a new applier for the given table
    pub fn new(connection: &'a C, table: &'a str) -> Self {
        Self {
            connection,
            table,
            dry_run: false,
            continue_on_error: false,
        }
    }

    /// Log statements without executing them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Keep going after a failed statement instead of aborting the pass
    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Plan the DDL statements for a diff, in the fixed phase order:
    /// add columns, modify columns, create indexes, drop indexes, create
    /// foreign keys, drop foreign keys.
    ///
    /// Columns come first so that later phases can reference them; drops are
    /// deferred to the end so a recreate-under-a-new-name never leaves the
    /// table transiently without a replacement. The flip side is that a
    /// recreate reusing the *same* name collides on the create statement.
    pub fn plan(&self, diff: &SchemaDiff) -> Vec<DdlStatement> {
        let mut statements = Vec::new();

        for column in &diff.columns_to_add {
            statements.push(DdlStatement {
                action: format!("add column {}", column.name),
                sql: format!(
                    "ALTER TABLE {} ADD COLUMN {} {}",
                    self.table, column.name, column.definition
                ),
            });
        }

        for change in &diff.columns_to_modify {
            statements.push(DdlStatement {
                action: format!("modify column {}", change.name),
                sql: format!(
                    "ALTER TABLE {} MODIFY COLUMN {} {}",
                    self.table, change.name, change.new_definition
                ),
            });
        }

        for index in &diff.indexes_to_create {
            statements.push(DdlStatement {
                action: format!("create index {}", index.name),
                sql: format!(
                    "CREATE INDEX {} ON {} ({})",
                    index.name, self.table, index.column
                ),
            });
        }

        for index in &diff.indexes_to_drop {
            statements.push(DdlStatement {
                action: format!("drop index {}", index.key_name),
                sql: format!("DROP INDEX {} ON {}", index.key_name, self.table),
            });
        }

        for fk in &diff.foreign_keys_to_create {
            statements.push(DdlStatement {
                action: format!("create foreign key {}", fk.name),
                sql: self.build_add_foreign_key(fk),
            });
        }

        for fk in &diff.foreign_keys_to_drop {
            statements.push(DdlStatement {
                action: format!("drop foreign key {}", fk.constraint_name),
                sql: format!(
                    "ALTER TABLE {} DROP FOREIGN KEY {}",
                    self.table, fk.constraint_name
                ),
            });
        }

        statements
    }

    /// Execute the planned statements for a diff.
    ///
    /// Failures are never swallowed: by default the first failed statement
    /// aborts the pass; with `continue_on_error` every remaining statement is
    /// still attempted and the failures are reported together at the end.
    /// There is no rollback. DDL is not transactional on most engines, so a
    /// partially applied pass is recovered by simply reconciling again.
    pub async fn apply(&self, diff: &SchemaDiff) -> Result<()> {
        let statements = self.plan(diff);
        let total = statements.len();
        let mut failures: Vec<Error> = Vec::new();

        for statement in &statements {
            info!(
                table = %self.table,
                action = %statement.action,
                sql = %statement.sql,
                dry_run = self.dry_run,
                "Applying schema change"
            );

            if self.dry_run {
                continue;
            }

            if let Err(e) = self.connection.execute_ddl(&statement.sql).await {
                let failure = Error::DdlError {
                    sql: statement.sql.clone(),
                    message: e.to_string(),
                };

                if !self.continue_on_error {
                    return Err(failure);
                }

                error!(
                    table = %self.table,
                    action = %statement.action,
                    error = %failure,
                    "Schema change failed, continuing"
                );
                failures.push(failure);
            }
        }

        if !failures.is_empty() {
            return Err(Error::MigrationError(format!(
                "{} of {} statements failed for table '{}'; first failure: {}",
                failures.len(),
                total,
                self.table,
                failures[0]
            )));
        }

        Ok(())
    }

    fn build_add_foreign_key(&self, fk: &ForeignKeySpec) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.table, fk.name, fk.local_column, fk.target_table, fk.target_column
        );

        if let Some(rule) = &fk.on_delete {
            sql.push_str(&format!(" ON DELETE {}", rule));
        }
        if let Some(rule) = &fk.on_update {
            sql.push_str(&format!(" ON UPDATE {}", rule));
        }

        sql
    }
}
