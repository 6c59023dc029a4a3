use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use og_core::services::OtpFlow;
use og_shared::phone::mask_phone_number;
use og_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::{SendOtpRequest, SendOtpResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::middleware::request_id::RequestIdExt;

/// Handler for POST /api/signup/send-otp
///
/// # Request Body
///
/// ```json
/// { "phone": "+919876543210" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "otp_sent",
///     "data": { "delivery_id": "SM...", "expires_in": 300 },
///     "timestamp": "2025-01-01T00:00:00Z"
/// }
/// ```
///
/// A phone that already has an account gets 200 with `success: false`.
pub async fn signup_send_otp(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse {
    send_otp(OtpFlow::Signup, req, state, request.into_inner()).await
}

/// Handler for POST /api/login/send-otp
///
/// Same contract as the signup variant; a phone without an account gets 200
/// with `success: false`.
pub async fn login_send_otp(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse {
    send_otp(OtpFlow::Login, req, state, request.into_inner()).await
}

async fn send_otp(
    flow: OtpFlow,
    req: HttpRequest,
    state: web::Data<AppState>,
    request: SendOtpRequest,
) -> HttpResponse {
    let request_id = req.request_id();

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, &request_id);
    }

    log::info!(
        "[{}] Processing {} send-otp for phone: {}",
        request_id,
        flow,
        mask_phone_number(request.phone.trim())
    );

    match state.otp_service.send_otp(flow, &request.phone).await {
        Ok(sent) => HttpResponse::Ok().json(
            ApiResponse::success("otp_sent", SendOtpResponse::from(sent)).with_request_id(request_id),
        ),
        Err(error) => handle_domain_error(&error, &request_id),
    }
}
