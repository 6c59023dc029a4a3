//! Request ID extraction for log correlation.

use actix_web::HttpRequest;
use uuid::Uuid;

/// Header clients may use to supply their own request ID
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Extension trait for reading the request ID off an `HttpRequest`
pub trait RequestIdExt {
    /// The caller-supplied `X-Request-ID`, or a fresh UUID
    fn request_id(&self) -> String;
}

impl RequestIdExt for HttpRequest {
    fn request_id(&self) -> String {
        self.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty() && v.len() <= 128)
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}
