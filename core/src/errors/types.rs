//! Error types for the OTP signup and login flows
//!
//! Each variant is an outward-facing outcome. Messages here are for logs; the
//! presentation layer maps variants to its own status codes and text.

use thiserror::Error;

/// Outcomes of the signup/login OTP flows that are not a success
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Signup attempted for a phone that already has an account
    #[error("User already exists")]
    AlreadyRegistered,

    /// Login attempted for a phone without an account
    #[error("User not found")]
    NotRegistered,

    /// Issuance refused, whether the block was just triggered or already active
    #[error("Too many OTP requests")]
    RateLimited { retry_after_secs: Option<u64> },

    /// No live code for this phone (never issued, consumed, or expired)
    #[error("No active OTP or OTP expired")]
    NoActiveCode,

    /// Candidate did not match the live code
    #[error("Incorrect OTP")]
    IncorrectCode { remaining_attempts: u32 },

    /// Attempt cap exceeded; a new code must be requested
    #[error("Maximum verification attempts exceeded")]
    TooManyAttempts,

    /// The message channel did not accept the code
    #[error("Failed to deliver OTP: {cause}")]
    DeliveryFailed { cause: String },
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },
}
