//! Database module
//!
//! Connection handling, live-schema introspection, and DDL application.

use async_trait::async_trait;

use crate::error::Result;
use crate::schema::live::{LiveColumn, LiveForeignKey, LiveIndexEntry};

pub mod applier;
pub mod connection;
pub mod introspect;

// Re-export key types
pub use applier::MigrationApplier;
pub use connection::DatabaseConnection;
pub use introspect::LiveIntrospector;

/// Handle to a live database, threaded explicitly through every component
/// that touches it.
///
/// [`DatabaseConnection`] implements this over a MySQL pool; tests substitute
/// an in-memory recording implementation.
#[async_trait]
pub trait SchemaConnection: Send + Sync {
    /// Execute a single DDL statement.
    async fn execute_ddl(&self, sql: &str) -> Result<()>;

    /// Check whether a table exists in the connected database.
    async fn table_exists(&self, table: &str) -> Result<bool>;

    /// Fetch the current column definitions of a table, in ordinal order.
    async fn column_rows(&self, table: &str) -> Result<Vec<LiveColumn>>;

    /// Fetch the current index listing of a table, one entry per indexed
    /// column, unfiltered.
    async fn index_rows(&self, table: &str) -> Result<Vec<LiveIndexEntry>>;

    /// Fetch the current foreign key constraints of a table.
    async fn foreign_key_rows(&self, table: &str) -> Result<Vec<LiveForeignKey>>;
}
