//! # OtpGate Core
//!
//! Core business logic for phone-number one-time-passcode signup and login.
//! This crate contains the domain entities, the concurrent OTP store and its
//! sweeper, the orchestrating `OtpService`, collaborator interfaces, and the
//! domain error taxonomy.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
