//! Table reconciliation
//!
//! Orchestrates one pass per table: create the table fresh if it is absent,
//! otherwise introspect, diff, and apply. The reconciler holds no state
//! between invocations; every pass recomputes everything from the declared
//! spec and the live database.

use tracing::{debug, info};

use crate::config::ReconcileConfig;
use crate::db::applier::MigrationApplier;
use crate::db::introspect::LiveIntrospector;
use crate::db::SchemaConnection;
use crate::error::{Error, Result};
use crate::registry::TableRegistry;
use crate::schema::diff::SchemaDiff;
use crate::schema::parser::{parse_column_definitions, split_top_level};
use crate::schema::spec::TableSpec;

/// Drives declared tables to convergence with the live database
pub struct TableReconciler<'a, C: SchemaConnection + ?Sized> {
    connection: &'a C,
    dry_run: bool,
    continue_on_error: bool,
}

impl<'a, C: SchemaConnection + ?Sized> TableReconciler<'a, C> {
    /// Create a reconciler over the given connection
    pub fn new(connection: &'a C, config: &ReconcileConfig) -> Self {
        Self {
            connection,
            dry_run: config.dry_run,
            continue_on_error: config.continue_on_error,
        }
    }

    /// Reconcile every table in the registry, strictly sequentially and in
    /// registration order, so a foreign key never races the creation of the
    /// table it targets.
    pub async fn reconcile_all(&self, registry: &TableRegistry) -> Result<()> {
        for (entity, spec) in registry.iter() {
            debug!(entity = %entity, table = %spec.name, "Reconciling table");
            self.reconcile(spec).await?;
        }

        Ok(())
    }

    /// Reconcile a single table with its declared spec.
    ///
    /// A freshly created table is fully aligned by construction, so the
    /// create path performs no diffing. On the existing-table path an empty
    /// diff issues zero statements, which makes a second pass with no
    /// external changes a no-op.
    pub async fn reconcile(&self, spec: &TableSpec) -> Result<()> {
        if spec.name.is_empty() {
            return Err(Error::ConfigError(
                "Table spec has an empty name".to_string(),
            ));
        }

        if !self.connection.table_exists(&spec.name).await? {
            return self.create_table(spec).await;
        }

        let live = LiveIntrospector::new(self.connection)
            .snapshot(&spec.name)
            .await?;
        let declared = parse_column_definitions(&spec.raw_schema);
        let diff = SchemaDiff::generate(spec, &declared, &live);

        if diff.is_empty() {
            debug!(table = %spec.name, "Table already in sync");
            return Ok(());
        }

        MigrationApplier::new(self.connection, &spec.name)
            .dry_run(self.dry_run)
            .continue_on_error(self.continue_on_error)
            .apply(&diff)
            .await
    }

    async fn create_table(&self, spec: &TableSpec) -> Result<()> {
        let sql = build_create_table(spec);

        info!(table = %spec.name, sql = %sql, dry_run = self.dry_run, "Creating table");

        if self.dry_run {
            return Ok(());
        }

        self.connection
            .execute_ddl(&sql)
            .await
            .map_err(|e| Error::DdlError {
                sql,
                message: e.to_string(),
            })
    }
}

/// Build the `CREATE TABLE IF NOT EXISTS` statement for a declared spec.
///
/// The raw schema is taken as the column/constraint list. Declared metadata
/// the raw text does not already carry is completed: the auto-increment
/// column gets an `AUTO_INCREMENT` attribute, and a `PRIMARY KEY` clause is
/// appended when the primary key names a parsed column and no such clause
/// was declared.
pub fn build_create_table(spec: &TableSpec) -> String {
    let mut segments: Vec<String> = split_top_level(&spec.raw_schema)
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(auto_column) = &spec.auto_increment_column {
        for segment in &mut segments {
            let is_target = segment
                .split_whitespace()
                .next()
                .map(|token| token == auto_column)
                .unwrap_or(false);

            if is_target && !segment.to_ascii_uppercase().contains("AUTO_INCREMENT") {
                segment.push_str(" AUTO_INCREMENT");
            }
        }
    }

    let has_primary_key_clause = spec.raw_schema.to_ascii_uppercase().contains("PRIMARY KEY");
    if !has_primary_key_clause && !spec.primary_key.is_empty() {
        let declares_pk_column = parse_column_definitions(&spec.raw_schema)
            .iter()
            .any(|c| c.name == spec.primary_key);

        if declares_pk_column {
            segments.push(format!("PRIMARY KEY ({})", spec.primary_key));
        }
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        spec.name,
        segments.join(", ")
    )
}
