//! Command-line entry point: load the declared tables from a TOML file and
//! reconcile them against the configured database.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use schema_reconcile::db::connection::DatabaseConnection;
use schema_reconcile::reconciler::TableReconciler;
use schema_reconcile::registry::TableRegistry;
use schema_reconcile::{config, utils};

#[derive(Parser, Debug)]
#[command(name = "schema_reconcile", about = "Reconcile live MySQL tables with their declared definitions", version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "reconcile.toml")]
    config: String,

    /// Path to the declared-tables file
    #[arg(short, long, default_value = "tables.toml")]
    tables: String,

    /// Log generated DDL without executing it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_from_file(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config))?;
    if cli.dry_run {
        config.reconcile.dry_run = true;
    }

    utils::logging::init_logging(&config.logging)?;

    let registry = TableRegistry::load_from_file(&cli.tables)
        .with_context(|| format!("loading declared tables from {}", cli.tables))?;
    info!(tables = registry.len(), "Loaded declared tables");

    let connection = DatabaseConnection::connect(&config.database)
        .await
        .context("connecting to database")?;

    TableReconciler::new(&connection, &config.reconcile)
        .reconcile_all(&registry)
        .await
        .context("reconciling tables")?;

    info!("All tables reconciled");
    Ok(())
}
