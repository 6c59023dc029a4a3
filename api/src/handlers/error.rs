//! Mapping of domain outcomes onto HTTP responses.
//!
//! Message texts are the ones existing clients already match on.

use actix_web::{http::header, http::StatusCode, HttpResponse};
use og_core::errors::{AuthError, DomainError, ValidationError};
use og_shared::types::ApiResponse;
use serde_json::{json, Value};
use validator::ValidationErrors;

/// Status code and body for a domain error
pub fn error_parts(error: &DomainError) -> (StatusCode, ApiResponse<Value>) {
    match error {
        DomainError::Auth(auth_error) => match auth_error {
            // Eligibility mismatches are reported as completed requests
            AuthError::AlreadyRegistered => (StatusCode::OK, ApiResponse::failure("Login already exists")),
            AuthError::NotRegistered => (
                StatusCode::OK,
                ApiResponse::failure("User not found, please signup"),
            ),
            AuthError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                ApiResponse::failure("Too many OTP requests. Try later."),
            ),
            AuthError::NoActiveCode => (
                StatusCode::BAD_REQUEST,
                ApiResponse::failure("No active OTP or OTP expired"),
            ),
            AuthError::IncorrectCode { remaining_attempts } => (
                StatusCode::BAD_REQUEST,
                ApiResponse::failure("Incorrect OTP")
                    .with_data(json!({ "remaining_attempts": remaining_attempts })),
            ),
            AuthError::TooManyAttempts => (
                StatusCode::TOO_MANY_REQUESTS,
                ApiResponse::failure("Too many attempts. Request new OTP."),
            ),
            AuthError::DeliveryFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::failure("Failed to send OTP"),
            ),
        },
        DomainError::ValidationErr(validation_error) => {
            let message = match validation_error {
                ValidationError::RequiredField { field } => format!("{} is required", field),
                ValidationError::InvalidFormat { field } => format!("invalid {}", field),
            };
            (StatusCode::BAD_REQUEST, ApiResponse::failure(message))
        }
        DomainError::Validation { message } => {
            (StatusCode::BAD_REQUEST, ApiResponse::failure(message.clone()))
        }
        DomainError::Internal { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiResponse::failure(message.clone()),
        ),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError, request_id: &str) -> HttpResponse {
    let (status, body) = error_parts(error);

    if status.is_server_error() {
        log::error!("[{}] Request failed: {}", request_id, error);
    } else {
        log::info!("[{}] Request rejected: {}", request_id, error);
    }

    let mut builder = HttpResponse::build(status);
    if let DomainError::Auth(AuthError::RateLimited {
        retry_after_secs: Some(secs),
    }) = error
    {
        builder.insert_header((header::RETRY_AFTER, secs.to_string()));
    }
    builder.json(body.with_request_id(request_id))
}

/// 400 response for a request body that failed DTO validation
pub fn handle_validation_errors(errors: &ValidationErrors, request_id: &str) -> HttpResponse {
    // Sorted so the reported message does not depend on map order
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    let message = fields
        .iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "invalid request".to_string());

    log::warn!("[{}] Validation failed: {:?}", request_id, fields);

    HttpResponse::BadRequest()
        .json(ApiResponse::<Value>::failure(message).with_request_id(request_id))
}
