//! Store-facing view of the OTP configuration

use chrono::Duration;
use og_shared::config::OtpConfig;

// Ten years; keeps chrono arithmetic far from overflow on absurd settings.
const MAX_POLICY_SECS: u64 = 315_360_000;

/// `OtpConfig` converted to the duration types the store works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpPolicy {
    pub code_length: usize,
    pub ttl: Duration,
    pub max_requests: u32,
    pub request_window: Duration,
    pub block_duration: Duration,
    pub max_attempts: u32,
    pub sweep_interval: std::time::Duration,
    pub delivery_timeout: std::time::Duration,
    /// Lifetime shown to users, in whole minutes rounded up
    pub ttl_minutes: u64,
}

impl From<&OtpConfig> for OtpPolicy {
    fn from(config: &OtpConfig) -> Self {
        Self {
            code_length: config.code_length,
            ttl: seconds(config.ttl_secs),
            max_requests: config.max_requests,
            // A zero window would reset the count on every request
            request_window: seconds(config.request_window_secs.max(1)),
            block_duration: seconds(config.block_duration_secs),
            max_attempts: config.max_attempts,
            sweep_interval: std::time::Duration::from_secs(config.sweep_interval_secs.max(1)),
            delivery_timeout: std::time::Duration::from_secs(config.delivery_timeout_secs.max(1)),
            ttl_minutes: config.ttl_minutes(),
        }
    }
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self::from(&OtpConfig::default())
    }
}

fn seconds(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_POLICY_SECS) as i64)
}
