//! User entity as exposed by the user directory.

use serde::{Deserialize, Serialize};

/// Role assigned to accounts created through OTP signup
pub const DEFAULT_ROLE: &str = "farmer";

/// Public identity of a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Directory-assigned identifier
    pub id: i64,

    /// Phone number the account is registered under
    pub phone: String,

    /// Account role
    pub role: String,
}

impl User {
    /// Creates a user with the default role
    pub fn new(id: i64, phone: impl Into<String>) -> Self {
        Self {
            id,
            phone: phone.into(),
            role: DEFAULT_ROLE.to_string(),
        }
    }
}
