//! Tests for the OTP store, service and sweeper

#[cfg(test)]
mod mocks;
#[cfg(test)]
mod sweeper_tests;
