//! Live schema introspection
//!
//! Assembles a point-in-time [`LiveSchema`] snapshot for a table. Nothing is
//! cached: every call reads the database's current committed state, since the
//! live structure can change underneath us between passes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::db::SchemaConnection;
use crate::error::{Error, Result};
use crate::schema::live::LiveSchema;

/// Key names of constraint-backed indexes created implicitly by the engine
/// (`PRIMARY`, and similar reserved all-uppercase names). These are not
/// user-declared and must not take part in the diff.
static RESERVED_KEY_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z_]+$").unwrap());

/// Reads the current structure of a single table
pub struct LiveIntrospector<'a, C: SchemaConnection + ?Sized> {
    connection: &'a C,
}

impl<'a, C: SchemaConnection + ?Sized> LiveIntrospector<'a, C> {
    /// Create a new introspector over the given connection
    pub fn new(connection: &'a C) -> Self {
        Self { connection }
    }

    /// Take a snapshot of the table's live columns, indexes, and foreign keys.
    ///
    /// Errors if the table does not exist; callers reconciling a possibly
    /// absent table must check existence first and take the create path.
    pub async fn snapshot(&self, table: &str) -> Result<LiveSchema> {
        if !self.wrap(table, self.connection.table_exists(table).await)? {
            return Err(Error::IntrospectionError {
                table: table.to_string(),
                message: "table does not exist".to_string(),
            });
        }

        let columns = self.wrap(table, self.connection.column_rows(table).await)?;

        let indexes = self
            .wrap(table, self.connection.index_rows(table).await)?
            .into_iter()
            .filter(|entry| !RESERVED_KEY_NAME.is_match(&entry.key_name))
            .collect();

        let foreign_keys = self.wrap(table, self.connection.foreign_key_rows(table).await)?;

        Ok(LiveSchema {
            columns,
            indexes,
            foreign_keys,
        })
    }

    fn wrap<T>(&self, table: &str, result: Result<T>) -> Result<T> {
        result.map_err(|e| match e {
            err @ Error::IntrospectionError { .. } => err,
            other => Error::IntrospectionError {
                table: table.to_string(),
                message: other.to_string(),
            },
        })
    }
}
