//! CORS middleware configuration for cross-origin requests.
//!
//! The web frontend calls the OTP endpoints from a different origin, so the
//! allowed origins come from `CorsConfig` (`ALLOWED_ORIGINS`). An empty list
//! allows any origin, which is only meant for local development.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use og_shared::config::CorsConfig;

/// Creates a CORS middleware instance from configuration.
///
/// # Environment Variables
/// - `ALLOWED_ORIGINS`: Comma-separated list of allowed origins
/// - `CORS_MAX_AGE`: Max age for preflight cache (default: 3600 seconds)
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![
            header::RETRY_AFTER,
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(config.max_age);

    if config.allowed_origins.is_empty() {
        log::warn!("CORS allows any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            log::info!("Adding allowed origin: {}", origin);
            cors = cors.allowed_origin(origin);
        }
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}
