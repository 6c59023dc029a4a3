//! Types for OTP store decisions and service results

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::user::User;

/// Which account flow an OTP belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpFlow {
    Signup,
    Login,
}

impl fmt::Display for OtpFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtpFlow::Signup => write!(f, "signup"),
            OtpFlow::Login => write!(f, "login"),
        }
    }
}

/// Whether a new code may be issued for a phone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuanceDecision {
    Allowed,
    /// A block was already in effect; the request was not counted
    Blocked { retry_after: Duration },
    /// This request hit the cap and started a block
    RateLimited { retry_after: Duration },
}

impl IssuanceDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, IssuanceDecision::Allowed)
    }

    /// Seconds until issuance is possible again, rounded up
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            IssuanceDecision::Allowed => None,
            IssuanceDecision::Blocked { retry_after }
            | IssuanceDecision::RateLimited { retry_after } => {
                let millis = retry_after.num_milliseconds().max(0) as u64;
                Some(millis.div_ceil(1000))
            }
        }
    }
}

/// Result of checking a candidate code against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Success,
    NoActiveCode,
    Expired,
    TooManyAttempts,
    Mismatch { remaining_attempts: u32 },
}

/// Result of a successful send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpSent {
    pub flow: OtpFlow,
    /// Identifier returned by the delivery channel
    pub delivery_id: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in_secs: i64,
}

/// Result of a successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedUser {
    pub flow: OtpFlow,
    /// Newly created account for signup, existing account for login
    pub user: User,
}
