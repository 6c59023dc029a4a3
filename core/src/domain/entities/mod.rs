//! Domain entities representing core business objects.

pub mod otp_record;
pub mod user;


// Re-export commonly used types
pub use otp_record::OtpRecord;
pub use user::{User, DEFAULT_ROLE};
