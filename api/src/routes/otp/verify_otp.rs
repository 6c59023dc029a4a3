use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use og_core::services::OtpFlow;
use og_shared::phone::mask_phone_number;
use og_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::middleware::request_id::RequestIdExt;

/// Handler for POST /api/signup/verify-otp
///
/// Creates the account once the code matches.
///
/// # Request Body
///
/// ```json
/// { "phone": "+919876543210", "otp": "482913" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "signup_success",
///     "data": { "user": { "id": 1, "phone": "+919876543210", "role": "farmer" } },
///     "timestamp": "2025-01-01T00:00:00Z"
/// }
/// ```
///
/// ## Errors
/// - 400: no active code, expired or incorrect code, missing fields
/// - 429: attempt cap exceeded
/// - 500: account creation failed
pub async fn signup_verify_otp(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    verify_otp(OtpFlow::Signup, req, state, request.into_inner()).await
}

/// Handler for POST /api/login/verify-otp
///
/// Returns the existing account once the code matches.
pub async fn login_verify_otp(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    verify_otp(OtpFlow::Login, req, state, request.into_inner()).await
}

async fn verify_otp(
    flow: OtpFlow,
    req: HttpRequest,
    state: web::Data<AppState>,
    request: VerifyOtpRequest,
) -> HttpResponse {
    let request_id = req.request_id();

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, &request_id);
    }

    log::info!(
        "[{}] Processing {} verify-otp for phone: {}",
        request_id,
        flow,
        mask_phone_number(request.phone.trim())
    );

    match state
        .otp_service
        .verify_otp(flow, &request.phone, &request.otp)
        .await
    {
        Ok(verified) => {
            let message = match flow {
                OtpFlow::Signup => "signup_success",
                OtpFlow::Login => "login_success",
            };
            HttpResponse::Ok().json(
                ApiResponse::success(message, VerifyOtpResponse::from(verified))
                    .with_request_id(request_id),
            )
        }
        Err(error) => handle_domain_error(&error, &request_id),
    }
}
