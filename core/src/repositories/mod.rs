//! Repository interfaces for data the OTP flows read and write.

pub mod user;

pub use user::{InMemoryUserDirectory, UserDirectory};
