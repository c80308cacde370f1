//! # Storage and Persistence
//!
//! SQLite connectivity, embedded migrations and the repositories the
//! workflows depend on.

pub mod pool;
pub mod repositories;

pub use crate::config::DatabaseConfig;
pub use pool::{create_pool, DbPool};
pub use repositories::{LogRepository, SqlxLogRepository, SqlxUserRepository, UserRepository};

use crate::errors::{Error, Result};

/// Migrations embedded at compile time from `./migrations`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    tracing::info!(count = MIGRATOR.iter().count(), "Database migrations applied");
    Ok(())
}

/// Check database connectivity
pub async fn check_connection(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(|e| Error::database(e, "Database connectivity check failed"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_sqlite_pool() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            auto_migrate: false,
            ..Default::default()
        };

        let pool = create_pool(&config).await.unwrap();
        check_connection(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_database_url() {
        let config = DatabaseConfig { url: "invalid://url".to_string(), ..Default::default() };

        let result = create_pool(&config).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let config = DatabaseConfig { url: "sqlite::memory:".to_string(), ..Default::default() };
        let pool = create_pool(&config).await.unwrap();

        run_migrations(&pool).await.unwrap();
    }
}
