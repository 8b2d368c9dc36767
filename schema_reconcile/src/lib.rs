//! schema_reconcile: converges live MySQL tables to their declared definitions
//!
//! Each entity type declares its table once, as plain data (column list,
//! primary key, indexes, foreign keys). On every pass the reconciler checks
//! whether the table exists, creates it fresh if not, and otherwise
//! introspects the live structure, diffs it against the declaration, and
//! applies the minimal DDL to converge — idempotently and without ever
//! dropping a data-bearing column.

pub mod config;
pub mod db;
pub mod error;
pub mod reconciler;
pub mod registry;
pub mod schema;
pub mod utils;

// Re-export main types for easier access
pub use config::Config;
pub use db::applier::MigrationApplier;
pub use db::connection::DatabaseConnection;
pub use db::introspect::LiveIntrospector;
pub use db::SchemaConnection;
pub use error::{Error, Result};
pub use reconciler::TableReconciler;
pub use registry::TableRegistry;
pub use schema::diff::SchemaDiff;
pub use schema::spec::{ForeignKeySpec, IndexSpec, TableSpec};

/// Initialize a reconcile client from a configuration file
pub async fn init(config_path: &str) -> Result<ReconcileClient> {
    let config = config::load_from_file(config_path)?;
    ReconcileClient::new(config).await
}

/// The main client for declaring tables and reconciling them
pub struct ReconcileClient {
    config: Config,
    connection: DatabaseConnection,
    registry: TableRegistry,
}

impl ReconcileClient {
    /// Create a new client from configuration
    pub async fn new(config: Config) -> Result<Self> {
        let connection = DatabaseConnection::connect(&config.database).await?;

        Ok(Self {
            config,
            connection,
            registry: TableRegistry::new(),
        })
    }

    /// Declare a table for an entity type
    pub fn declare(&mut self, entity: &str, spec: TableSpec) -> Result<()> {
        self.registry.register(entity, spec)
    }

    /// Access the declared-table registry
    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    /// Reconcile a single declared entity's table
    pub async fn reconcile_entity(&self, entity: &str) -> Result<()> {
        let spec = self.registry.get(entity)?;
        TableReconciler::new(&self.connection, &self.config.reconcile)
            .reconcile(spec)
            .await
    }

    /// Reconcile every declared table, sequentially, in declaration order
    pub async fn reconcile_all(&self) -> Result<()> {
        TableReconciler::new(&self.connection, &self.config.reconcile)
            .reconcile_all(&self.registry)
            .await
    }
}
