//! # Database Connection Pool Management
//!
//! Provides database connection pool creation and management utilities.

use crate::config::DatabaseConfig;
use crate::errors::{Error, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::{str::FromStr, time::Duration};

/// Type alias for the database connection pool
pub type DbPool = Pool<Sqlite>;

const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a database connection pool with the specified configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool> {
    validate_config(config)?;

    let in_memory = is_in_memory(&config.url);
    // Every connection to `:memory:` opens its own database, so pin the pool to one.
    let max_connections = if in_memory { 1 } else { config.max_connections };

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(config.connect_timeout())
        .test_before_acquire(true);
    if in_memory {
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    let mut connect_options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| Error::database(e, format!("Invalid SQLite connection string: {}", config.url)))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(SQLITE_BUSY_TIMEOUT);
    if !in_memory {
        connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
        if let Some(dir) = connect_options.get_filename().parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }
    }

    let pool = pool_options.connect_with(connect_options).await.map_err(|e| {
        tracing::error!(
            error = %e,
            url = %config.url,
            busy_timeout_ms = SQLITE_BUSY_TIMEOUT.as_millis(),
            "Failed to create SQLite database pool"
        );
        Error::database(e, format!("Failed to connect to database: {}", config.url))
    })?;

    tracing::info!(
        max_connections,
        connect_timeout_ms = config.connect_timeout().as_millis(),
        in_memory,
        "Database connection pool created"
    );

    if config.auto_migrate {
        tracing::info!("Auto-migration enabled, running database migrations");
        crate::storage::run_migrations(&pool).await?;
    }

    Ok(pool)
}

/// Validate database configuration
fn validate_config(config: &DatabaseConfig) -> Result<()> {
    if config.max_connections == 0 {
        return Err(Error::validation("max_connections must be greater than 0"));
    }

    if config.url.is_empty() {
        return Err(Error::validation("database URL cannot be empty"));
    }

    if !config.is_sqlite() {
        return Err(Error::validation("database URL must start with 'sqlite:'"));
    }

    Ok(())
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
