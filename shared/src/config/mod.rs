//! Configuration module with business-specific sub-modules
//!
//! - `database` - user directory connection pool
//! - `delivery` - outbound message channel (Twilio WhatsApp or console)
//! - `environment` - environment detection
//! - `otp` - code issuance, verification and abuse-control policy
//! - `server` - HTTP server and CORS

pub mod database;
pub mod delivery;
pub mod environment;
pub mod otp;
pub mod server;

use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use delivery::{DeliveryConfig, DeliveryProvider};
pub use environment::Environment;
pub use otp::OtpConfig;
pub use server::{CorsConfig, ServerConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// OTP policy
    #[serde(default)]
    pub otp: OtpConfig,

    /// Delivery channel configuration
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            otp: OtpConfig::from_env(),
            delivery: DeliveryConfig::from_env(),
            cors: CorsConfig::from_env(),
        }
    }
}
