//! Database connection handling
//!
//! Establishes the MySQL pool and implements the metadata queries behind
//! [`SchemaConnection`].

use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{FromRow, MySqlPool};

use crate::config::DatabaseConfig;
use crate::db::SchemaConnection;
use crate::error::{Error, Result};
use crate::schema::live::{LiveColumn, LiveForeignKey, LiveIndexEntry};

/// Connection to the live database
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: MySqlPool,
}

impl DatabaseConnection {
    /// Create a new database connection from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if config.driver != "mysql" {
            return Err(Error::DatabaseError(format!(
                "Unsupported database driver: {}",
                config.driver
            )));
        }

        let pool_size = config.pool_size.unwrap_or(10);
        let timeout_seconds = config.timeout_seconds.unwrap_or(30);

        let pool = MySqlPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(timeout_seconds))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// Access the underlying pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct ColumnRow {
    column_name: String,
    column_type: String,
    is_nullable: String,
    extra: String,
}

#[derive(FromRow)]
struct IndexRow {
    #[sqlx(rename = "Key_name")]
    key_name: String,
    #[sqlx(rename = "Column_name")]
    column_name: String,
}

#[derive(FromRow)]
struct ForeignKeyRow {
    constraint_name: String,
    column_name: String,
    ref_table: String,
    ref_column: String,
    delete_rule: String,
    update_rule: String,
}

#[async_trait]
impl SchemaConnection for DatabaseConnection {
    async fn execute_ddl(&self, sql: &str) -> Result<()> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        let sql = r#"
            SELECT COUNT(*)
            FROM information_schema.tables
            WHERE table_schema = DATABASE() AND table_name = ?
        "#;

        let count: i64 = sqlx::query_scalar(sql)
            .bind(table)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    async fn column_rows(&self, table: &str) -> Result<Vec<LiveColumn>> {
        let sql = r#"
            SELECT
                column_name AS column_name,
                column_type AS column_type,
                is_nullable AS is_nullable,
                extra AS extra
            FROM information_schema.columns
            WHERE table_schema = DATABASE() AND table_name = ?
            ORDER BY ordinal_position
        "#;

        let rows = sqlx::query_as::<_, ColumnRow>(sql)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        let columns = rows
            .into_iter()
            .map(|row| {
                let mut type_definition = row.column_type;
                if row.is_nullable == "NO" {
                    type_definition.push_str(" NOT NULL");
                }
                if row.extra.to_lowercase().contains("auto_increment") {
                    type_definition.push_str(" AUTO_INCREMENT");
                }

                LiveColumn {
                    name: row.column_name,
                    type_definition,
                }
            })
            .collect();

        Ok(columns)
    }

    async fn index_rows(&self, table: &str) -> Result<Vec<LiveIndexEntry>> {
        // SHOW INDEX does not accept bind parameters for the table name.
        let sql = format!("SHOW INDEX FROM `{}`", table);

        let rows = sqlx::query_as::<_, IndexRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| LiveIndexEntry {
                key_name: row.key_name,
                column_name: row.column_name,
            })
            .collect())
    }

    async fn foreign_key_rows(&self, table: &str) -> Result<Vec<LiveForeignKey>> {
        let sql = r#"
            SELECT
                rc.constraint_name AS constraint_name,
                kcu.column_name AS column_name,
                kcu.referenced_table_name AS ref_table,
                kcu.referenced_column_name AS ref_column,
                rc.delete_rule AS delete_rule,
                rc.update_rule AS update_rule
            FROM information_schema.referential_constraints rc
            JOIN information_schema.key_column_usage kcu
              ON rc.constraint_name = kcu.constraint_name
             AND rc.constraint_schema = kcu.table_schema
            WHERE rc.constraint_schema = DATABASE()
              AND rc.table_name = ?
            ORDER BY rc.constraint_name, kcu.ordinal_position
        "#;

        let rows = sqlx::query_as::<_, ForeignKeyRow>(sql)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| LiveForeignKey {
                constraint_name: row.constraint_name,
                local_column: row.column_name,
                target_table: row.ref_table,
                target_column: row.ref_column,
                on_delete: Some(row.delete_rule),
                on_update: Some(row.update_rule),
            })
            .collect())
    }
}
