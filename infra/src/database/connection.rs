//! MySQL connection pool management

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

use og_shared::config::DatabaseConfig;

use crate::InfrastructureError;

/// Wrapper around the SQLx MySQL pool
#[derive(Clone, Debug)]
pub struct DatabasePool {
    pool: MySqlPool,
    config: DatabaseConfig,
}

impl DatabasePool {
    /// Connect a new pool using `config`
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError::Database` if the URL is invalid or the
    /// first connection cannot be established within the connect timeout.
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.url)
            .await
            .map_err(|e| {
                error!("Failed to connect to database: {}", e);
                e
            })?;

        info!(
            max_connections = config.max_connections,
            "Database pool established"
        );

        Ok(Self { pool, config })
    }

    /// Underlying SQLx pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Run a trivial query to confirm the database answers
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(true)
    }

    /// Current pool usage
    pub fn statistics(&self) -> PoolStatistics {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;
        PoolStatistics {
            size,
            idle,
            active: size.saturating_sub(idle),
            max_connections: self.config.max_connections,
        }
    }

    /// Close every connection in the pool
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// Snapshot of pool usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatistics {
    pub size: u32,
    pub idle: u32,
    pub active: u32,
    pub max_connections: u32,
}

impl fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool: {}/{} connections ({} active, {} idle)",
            self.size, self.max_connections, self.active, self.idle
        )
    }
}
