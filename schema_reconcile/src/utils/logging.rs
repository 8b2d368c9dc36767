//! Logging setup
//!
//! Initializes the global tracing subscriber from the optional `[logging]`
//! configuration section.

use std::fs::File;
use std::path::Path;

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Initialize logging based on configuration.
///
/// With no `[logging]` section, whatever subscriber the host application
/// installed stays in effect.
pub fn init_logging(config: &Option<LoggingConfig>) -> Result<()> {
    let config = match config {
        Some(cfg) => cfg,
        None => return Ok(()),
    };

    let level = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let env_filter = EnvFilter::from_default_env().add_directive(
        format!("schema_reconcile={}", level)
            .parse()
            .map_err(|e| Error::ConfigError(format!("Invalid log directive: {}", e)))?,
    );

    let json = config.format.to_lowercase() == "json";

    if let Some(file_path) = &config.file {
        if let Some(parent) = Path::new(file_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(file_path)?;

        let builder = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(file);
        if json {
            set_subscriber(builder.json().finish())?;
        } else {
            set_subscriber(builder.finish())?;
        }
    } else if config.stdout {
        let builder = fmt::Subscriber::builder().with_env_filter(env_filter);
        if json {
            set_subscriber(builder.json().finish())?;
        } else {
            set_subscriber(builder.finish())?;
        }
    }

    Ok(())
}

fn set_subscriber<S>(subscriber: S) -> Result<()>
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::ConfigError(format!("Failed to install subscriber: {}", e)))
}
