//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    Clock, CodeGenerator, DeliveryChannel, FixedCodeGenerator, IssuanceDecision, ManualClock,
    OsRngCodeGenerator, OtpFlow, OtpPolicy, OtpSent, OtpService, OtpStore, OtpSweeper,
    SystemClock, VerifiedUser, VerifyOutcome,
};
