//! Application state and factory
//!
//! This module holds the shared application state and provides the factory
//! for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{error, middleware::Logger, web, App, HttpRequest, HttpResponse};
use serde_json::Value;

use og_core::repositories::UserDirectory;
use og_core::services::{DeliveryChannel, OtpService};
use og_shared::config::CorsConfig;
use og_shared::types::{ApiResponse, HealthResponse};

use crate::middleware::cors::create_cors;
use crate::middleware::request_id::RequestIdExt;
use crate::routes::otp::{login_send_otp, login_verify_otp, signup_send_otp, signup_verify_otp};

/// OTP service with its collaborators chosen at startup
pub type DynOtpService = OtpService<dyn UserDirectory, dyn DeliveryChannel>;

/// Application state that holds shared services
pub struct AppState {
    pub otp_service: Arc<DynOtpService>,
}

impl AppState {
    pub fn new(otp_service: Arc<DynOtpService>) -> Self {
        Self { otp_service }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
    cors_config: &CorsConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().limit(4096).error_handler(json_error_handler))
        .wrap(create_cors(cors_config))
        .wrap(Logger::default())
        .configure(configure_routes)
        .default_service(web::route().to(not_found))
}

/// Register every route; shared by `create_app` and tests
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(api_documentation))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/signup")
                        .route("/send-otp", web::post().to(signup_send_otp))
                        .route("/verify-otp", web::post().to(signup_verify_otp)),
                )
                .service(
                    web::scope("/login")
                        .route("/send-otp", web::post().to(login_send_otp))
                        .route("/verify-otp", web::post().to(login_verify_otp)),
                ),
        );
}

/// Malformed JSON bodies get the same envelope as every other failure
fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> error::Error {
    let request_id = req.request_id();
    log::warn!("[{}] Invalid JSON body: {}", request_id, err);
    let response = HttpResponse::BadRequest().json(
        ApiResponse::<Value>::failure("invalid request body").with_request_id(request_id),
    );
    error::InternalError::from_response(err, response).into()
}

/// Health check endpoint handler
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(
        "otpgate-api",
        env!("CARGO_PKG_VERSION"),
        state.otp_service.store().len(),
    ))
}

/// API documentation endpoint
async fn api_documentation() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "OtpGate API",
        "endpoints": {
            "health": "/health",
            "signup": {
                "send_otp": {
                    "path": "/api/signup/send-otp",
                    "method": "POST",
                    "description": "Send a verification code over WhatsApp to a new phone",
                    "request_body": { "phone": "string" },
                    "responses": {
                        "200": "Code sent, or phone already registered (success: false)",
                        "400": "Missing phone",
                        "429": "Too many OTP requests",
                        "500": "Delivery failed"
                    }
                },
                "verify_otp": {
                    "path": "/api/signup/verify-otp",
                    "method": "POST",
                    "description": "Verify the code and create the account",
                    "request_body": { "phone": "string", "otp": "string" },
                    "responses": {
                        "200": "Account created, or phone already registered (success: false)",
                        "400": "No active, expired or incorrect code",
                        "429": "Too many attempts",
                        "500": "Account creation failed"
                    }
                }
            },
            "login": {
                "send_otp": {
                    "path": "/api/login/send-otp",
                    "method": "POST",
                    "description": "Send a login code over WhatsApp to a registered phone",
                    "request_body": { "phone": "string" }
                },
                "verify_otp": {
                    "path": "/api/login/verify-otp",
                    "method": "POST",
                    "description": "Verify the code and return the account",
                    "request_body": { "phone": "string", "otp": "string" }
                }
            }
        }
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<Value>::failure("not_found"))
}
