//! Integration tests for the OTP API endpoints

use std::sync::Arc;

use actix_web::{http::header, http::StatusCode, test, web};
use serde_json::{json, Value};

use og_api::app::{create_app, AppState};
use og_core::repositories::{InMemoryUserDirectory, UserDirectory};
use og_core::services::{DeliveryChannel, FixedCodeGenerator, OtpPolicy, OtpService, OtpStore};
use og_infra::delivery::ConsoleDeliveryChannel;
use og_shared::config::CorsConfig;

struct TestContext {
    state: web::Data<AppState>,
    users: Arc<InMemoryUserDirectory>,
    channel: Arc<ConsoleDeliveryChannel>,
}

fn context(code: &str) -> TestContext {
    let users = Arc::new(InMemoryUserDirectory::new());
    let channel = Arc::new(ConsoleDeliveryChannel::new());
    let store = Arc::new(OtpStore::new(OtpPolicy::default()));

    let directory: Arc<dyn UserDirectory> = users.clone();
    let delivery: Arc<dyn DeliveryChannel> = channel.clone();
    let service = OtpService::new(directory, delivery, store)
        .with_generator(Arc::new(FixedCodeGenerator::new(code)));

    TestContext {
        state: web::Data::new(AppState::new(Arc::new(service))),
        users,
        channel,
    }
}

macro_rules! post {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(header::RETRY_AFTER)
            .map(|v| v.to_str().unwrap().to_string());
        let body: Value = test::read_body_json(resp).await;
        (status, body, retry_after)
    }};
}

#[actix_web::test]
async fn test_signup_flow() {
    let ctx = context("482913");
    let app = test::init_service(create_app(ctx.state.clone(), &CorsConfig::default())).await;

    let (status, body, _) = post!(app, "/api/signup/send-otp", json!({ "phone": "+919876543210" }));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "otp_sent");
    assert!(body["data"]["delivery_id"].as_str().unwrap().starts_with("console-"));
    assert_eq!(body["data"]["expires_in"], 300);

    let (status, body, _) = post!(
        app,
        "/api/signup/verify-otp",
        json!({ "phone": "+919876543210", "otp": "482913" })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["phone"], "+919876543210");
    assert_eq!(body["data"]["user"]["role"], "farmer");
    assert!(ctx.users.exists_by_phone("+919876543210").await.unwrap());

    // Registered now, so a second signup is refused
    let (status, body, _) = post!(app, "/api/signup/send-otp", json!({ "phone": "+919876543210" }));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Login already exists");
}

#[actix_web::test]
async fn test_login_flow() {
    let ctx = context("135790");
    let user = ctx.users.insert("+919876543210").await;
    let app = test::init_service(create_app(ctx.state.clone(), &CorsConfig::default())).await;

    let (status, body, _) = post!(app, "/api/login/send-otp", json!({ "phone": "+919876543210" }));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "otp_sent");

    let (status, body, _) = post!(
        app,
        "/api/login/verify-otp",
        json!({ "phone": "+919876543210", "otp": "135790" })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "login_success");
    assert_eq!(body["data"]["user"]["id"], user.id);
}

#[actix_web::test]
async fn test_login_for_unknown_phone() {
    let ctx = context("135790");
    let app = test::init_service(create_app(ctx.state.clone(), &CorsConfig::default())).await;

    let (status, body, _) = post!(app, "/api/login/send-otp", json!({ "phone": "+919876543210" }));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User not found, please signup");
}

#[actix_web::test]
async fn test_missing_fields() {
    let ctx = context("482913");
    let app = test::init_service(create_app(ctx.state.clone(), &CorsConfig::default())).await;

    let (status, body, _) = post!(app, "/api/signup/send-otp", json!({}));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "phone is required");

    let (status, body, _) = post!(app, "/api/signup/send-otp", json!({ "phone": "   " }));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "phone is required");

    let (status, body, _) = post!(
        app,
        "/api/login/verify-otp",
        json!({ "phone": "+919876543210" })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "otp is required");
}

#[actix_web::test]
async fn test_malformed_json() {
    let ctx = context("482913");
    let app = test::init_service(create_app(ctx.state.clone(), &CorsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/signup/send-otp")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_verify_errors() {
    let ctx = context("482913");
    let app = test::init_service(create_app(ctx.state.clone(), &CorsConfig::default())).await;

    let (status, body, _) = post!(
        app,
        "/api/signup/verify-otp",
        json!({ "phone": "+919876543210", "otp": "482913" })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No active OTP or OTP expired");

    post!(app, "/api/signup/send-otp", json!({ "phone": "+919876543210" }));

    for remaining in (0..5).rev() {
        let (status, body, _) = post!(
            app,
            "/api/signup/verify-otp",
            json!({ "phone": "+919876543210", "otp": "000000" })
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Incorrect OTP");
        assert_eq!(body["data"]["remaining_attempts"], remaining);
    }

    let (status, body, _) = post!(
        app,
        "/api/signup/verify-otp",
        json!({ "phone": "+919876543210", "otp": "482913" })
    );
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["message"], "Too many attempts. Request new OTP.");
}

#[actix_web::test]
async fn test_rate_limit() {
    let ctx = context("482913");
    let app = test::init_service(create_app(ctx.state.clone(), &CorsConfig::default())).await;

    for _ in 0..5 {
        let (status, _, _) = post!(app, "/api/signup/send-otp", json!({ "phone": "+910000000002" }));
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body, retry_after) =
        post!(app, "/api/signup/send-otp", json!({ "phone": "+910000000002" }));
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["message"], "Too many OTP requests. Try later.");
    let retry_after: u64 = retry_after.unwrap().parse().unwrap();
    assert!(retry_after > 0 && retry_after <= 900);

    // Other phones are unaffected
    let (status, _, _) = post!(app, "/api/signup/send-otp", json!({ "phone": "+910000000003" }));
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_delivery_failure() {
    let ctx = context("482913");
    ctx.channel.set_simulate_failure(true);
    let app = test::init_service(create_app(ctx.state.clone(), &CorsConfig::default())).await;

    let (status, body, _) = post!(app, "/api/signup/send-otp", json!({ "phone": "+919876543210" }));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to send OTP");

    // The undelivered code is not usable
    let (status, body, _) = post!(
        app,
        "/api/signup/verify-otp",
        json!({ "phone": "+919876543210", "otp": "482913" })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No active OTP or OTP expired");
}

#[actix_web::test]
async fn test_request_id_echoed() {
    let ctx = context("482913");
    let app = test::init_service(create_app(ctx.state.clone(), &CorsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/login/send-otp")
        .insert_header(("X-Request-ID", "trace-123"))
        .set_json(json!({ "phone": "+919876543210" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["request_id"], "trace-123");
}
