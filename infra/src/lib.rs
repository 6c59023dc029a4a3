//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the OtpGate backend.
//! It provides concrete implementations of the collaborators the OTP service
//! depends on.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL user directory using SQLx
//! - **Delivery**: Twilio WhatsApp channel and a console channel for development
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use std::sync::Arc;

use og_core::repositories::{InMemoryUserDirectory, UserDirectory};
use og_core::services::DeliveryChannel;
use og_shared::config::AppConfig;

// Re-export core types for convenience
pub use og_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Delivery module - outbound OTP message channels
pub mod delivery;

/// Collaborators handed to the OTP service
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Account lookups and creation
    pub user_directory: Arc<dyn UserDirectory>,
    /// Channel that carries OTP messages
    pub delivery_channel: Arc<dyn DeliveryChannel>,
    /// Connection pool, when the directory is database-backed
    #[cfg(feature = "mysql")]
    pub database: Option<database::DatabasePool>,
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - The user directory (MySQL, or in-memory in development when the
///   database is unreachable)
/// - The delivery channel selected by configuration
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!("Initializing infrastructure services...");

    let delivery_channel = delivery::create_delivery_channel(&config.delivery)?;

    #[cfg(feature = "mysql")]
    let (user_directory, database) = match database::DatabasePool::new(config.database.clone()).await {
        Ok(pool) => {
            let directory: Arc<dyn UserDirectory> =
                Arc::new(database::MySqlUserDirectory::new(pool.pool().clone()));
            (directory, Some(pool))
        }
        Err(e) if config.environment.allows_in_memory_directory() => {
            tracing::warn!(error = %e, "Database unavailable, using in-memory user directory");
            let directory: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::new());
            (directory, None)
        }
        Err(e) => return Err(e),
    };

    #[cfg(not(feature = "mysql"))]
    let user_directory: Arc<dyn UserDirectory> = {
        tracing::warn!("Built without database support, using in-memory user directory");
        Arc::new(InMemoryUserDirectory::new())
    };

    tracing::info!(
        provider = delivery_channel.provider_name(),
        "Infrastructure services initialized successfully"
    );

    Ok(InfrastructureServices {
        user_directory,
        delivery_channel,
        #[cfg(feature = "mysql")]
        database,
    })
}

/// Load application configuration, reading a `.env` file first if present
pub fn load_config() -> AppConfig {
    dotenvy::dotenv().ok();
    AppConfig::from_env()
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Message delivery error
    #[error("Delivery error: {0}")]
    Delivery(String),
}
