//! PostgreSQL storage adapter implementation

pub mod config;
pub mod durable;
pub mod migrations;

pub use config::{ConfigError, PoolConfig, PostgresConfig};
pub use migrations::{MigrationError, MigrationManager};

use sqlx::{postgres::PgPoolOptions, PgPool};
use walkshed_core::error::{Result, WalkshedError};

/// PostgreSQL storage adapter
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given configuration
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        config.validate().map_err(|e| WalkshedError::ConfigInvalid {
            key: "database_url".to_string(),
            reason: e.to_string(),
        })?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .max_lifetime(config.pool.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                WalkshedError::Persistence(format!("Failed to connect to database: {}", e))
            })?;

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| WalkshedError::Persistence(format!("Connection test failed: {}", e)))?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL store and run migrations
    pub async fn with_migrations(config: PostgresConfig) -> Result<Self> {
        let store = Self::new(config).await?;
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run all pending migrations
    pub async fn run_migrations(&self) -> Result<()> {
        let manager = MigrationManager::new(self.pool.clone());
        manager
            .run_migrations()
            .await
            .map_err(|e| WalkshedError::Persistence(format!("Migration failed: {}", e)))?;
        Ok(())
    }

    /// Close every pooled connection; used on graceful shutdown
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
