//! OTP service module for phone-number signup and login
//!
//! This module provides the complete one-time-passcode workflow:
//! - Random numeric code generation
//! - A sharded, concurrency-safe record store with rate limiting, blocking
//!   and attempt limiting
//! - A background sweeper that reclaims dead records
//! - The `OtpService` orchestrating send and verify for both flows

mod clock;
mod config;
mod generator;
mod service;
mod store;
mod sweeper;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::OtpPolicy;
pub use generator::{CodeGenerator, FixedCodeGenerator, OsRngCodeGenerator};
pub use service::OtpService;
pub use store::OtpStore;
pub use sweeper::OtpSweeper;
pub use traits::DeliveryChannel;
pub use types::{IssuanceDecision, OtpFlow, OtpSent, VerifiedUser, VerifyOutcome};
