//! OTP issuance and verification policy

use serde::{Deserialize, Serialize};
use std::env;

/// Tunables for code issuance, verification and abuse control.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Number of decimal digits in a generated code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Lifetime of an issued code in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Issuance requests allowed per phone within one tracking window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Length of the request-tracking window in seconds
    #[serde(default = "default_request_window_secs")]
    pub request_window_secs: u64,

    /// How long a phone stays blocked once `max_requests` is reached
    #[serde(default = "default_block_duration_secs")]
    pub block_duration_secs: u64,

    /// Verification attempts allowed against a single code
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Interval between background sweeps of dead records
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Upper bound on a single delivery call
    #[serde(default = "default_delivery_timeout_secs")]
    pub delivery_timeout_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            ttl_secs: default_ttl_secs(),
            max_requests: default_max_requests(),
            request_window_secs: default_request_window_secs(),
            block_duration_secs: default_block_duration_secs(),
            max_attempts: default_max_attempts(),
            sweep_interval_secs: default_sweep_interval_secs(),
            delivery_timeout_secs: default_delivery_timeout_secs(),
        }
    }
}

impl OtpConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            code_length: env_or("OTP_LENGTH", default_code_length()),
            ttl_secs: env_or("OTP_TTL_SECONDS", default_ttl_secs()),
            max_requests: env_or("OTP_MAX_REQUESTS", default_max_requests()),
            request_window_secs: env_or("OTP_REQUEST_WINDOW_SECONDS", default_request_window_secs()),
            block_duration_secs: env_or("OTP_BLOCK_SECONDS", default_block_duration_secs()),
            max_attempts: env_or("OTP_MAX_ATTEMPTS", default_max_attempts()),
            sweep_interval_secs: env_or("OTP_SWEEP_INTERVAL_SECONDS", default_sweep_interval_secs()),
            delivery_timeout_secs: env_or(
                "OTP_DELIVERY_TIMEOUT_SECONDS",
                default_delivery_timeout_secs(),
            ),
        }
    }

    /// Code lifetime rounded up to whole minutes, as shown to users
    pub fn ttl_minutes(&self) -> u64 {
        self.ttl_secs.div_ceil(60)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn default_code_length() -> usize {
    6
}

fn default_ttl_secs() -> u64 {
    300 // 5 minutes
}

fn default_max_requests() -> u32 {
    5
}

fn default_request_window_secs() -> u64 {
    3600 // 1 hour
}

fn default_block_duration_secs() -> u64 {
    900 // 15 minutes
}

fn default_max_attempts() -> u32 {
    5
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_delivery_timeout_secs() -> u64 {
    15
}
