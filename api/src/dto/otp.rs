use serde::{Deserialize, Serialize};
use validator::Validate;

use og_core::domain::entities::user::User;
use og_core::services::{OtpSent, VerifiedUser};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Phone number as entered, e.g. "+919876543210"
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "phone is required"))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "phone is required"))]
    pub phone: String,

    /// Code received over WhatsApp
    #[serde(default)]
    #[validate(length(min = 1, max = 12, message = "otp is required"))]
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    /// Provider message identifier
    pub delivery_id: String,
    pub expires_in: i64, // seconds until the code expires
}

impl From<OtpSent> for SendOtpResponse {
    fn from(sent: OtpSent) -> Self {
        Self {
            delivery_id: sent.delivery_id,
            expires_in: sent.expires_in_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: i64,
    pub phone: String,
    pub role: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            phone: user.phone,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub user: UserDto,
}

impl From<VerifiedUser> for VerifyOtpResponse {
    fn from(verified: VerifiedUser) -> Self {
        Self {
            user: verified.user.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fail_validation() {
        let request: SendOtpRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_err());

        let request: VerifyOtpRequest =
            serde_json::from_str(r#"{"phone":"+919876543210"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("otp"));
    }

    #[test]
    fn test_valid_request() {
        let request = VerifyOtpRequest {
            phone: "+919876543210".to_string(),
            otp: "482913".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
