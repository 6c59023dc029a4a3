//! Type definitions shared between layers
//!
//! - `response` - API response wrapper and health check

pub mod response;

pub use response::{ApiResponse, HealthResponse};
