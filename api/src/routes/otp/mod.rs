//! OTP route handlers
//!
//! This module contains the signup and login endpoints:
//! - Sending a code over WhatsApp
//! - Verifying a received code

pub mod send_otp;
pub mod verify_otp;

pub use send_otp::{login_send_otp, signup_send_otp};
pub use verify_otp::{login_verify_otp, signup_verify_otp};
