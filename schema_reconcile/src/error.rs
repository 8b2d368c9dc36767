//! Error types for schema reconciliation

use thiserror::Error;

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for schema reconciliation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Fatal: an entity type was requested that has no declared table schema.
    #[error("No schema declared for entity '{0}'")]
    SchemaNotDeclared(String),

    #[error("Introspection failed for table '{table}': {message}")]
    IntrospectionError { table: String, message: String },

    /// A single DDL statement failed. Carries the statement so the caller
    /// can see exactly what was sent to the database.
    #[error("DDL statement failed: {sql}: {message}")]
    DdlError { sql: String, message: String },

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

/// Convert TOML deserialization errors to configuration errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(error.to_string())
    }
}
