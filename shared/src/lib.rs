//! Shared utilities and common types for the OtpGate server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (OTP policy, server, database, delivery)
//! - API response envelope
//! - Phone number helpers (normalization, masking, format checks)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CorsConfig, DatabaseConfig, DeliveryConfig, Environment, OtpConfig, ServerConfig,
};
pub use types::{ApiResponse, HealthResponse};
pub use utils::phone;
