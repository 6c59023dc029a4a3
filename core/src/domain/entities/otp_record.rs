//! Per-phone OTP state: the outstanding code plus abuse-tracking counters.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};

/// State held for one phone number while a code is outstanding or while
/// abuse tracking (request window or block) is in effect.
///
/// The code and its expiry are independent of `request_count` and
/// `blocked_until`: retiring a code leaves the counters in place so that a
/// quiet period shorter than the tracking window does not reset them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Normalized phone identifier, the record key
    pub phone: String,

    /// Current secret code; `None` once consumed, expired, exhausted or rolled back
    #[serde(skip_serializing)]
    pub code: Option<String>,

    /// When the current code was issued
    pub issued_at: DateTime<Utc>,

    /// When the current code stops being accepted
    pub expires_at: DateTime<Utc>,

    /// Verification attempts consumed against the current code
    pub attempts: u32,

    /// Issuance requests within the current tracking window
    pub request_count: u32,

    /// Start of the current tracking window
    pub window_started_at: DateTime<Utc>,

    /// Issuance is refused until this instant
    pub blocked_until: Option<DateTime<Utc>>,
}

impl OtpRecord {
    /// Creates a record for a first issuance
    pub fn issued(phone: impl Into<String>, code: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            phone: phone.into(),
            code: Some(code.into()),
            issued_at: now,
            expires_at: now + ttl,
            attempts: 0,
            request_count: 1,
            window_started_at: now,
            blocked_until: None,
        }
    }

    /// Replaces the code in place and counts the request
    pub fn reissue(&mut self, code: impl Into<String>, now: DateTime<Utc>, ttl: Duration) {
        self.code = Some(code.into());
        self.issued_at = now;
        self.expires_at = now + ttl;
        self.attempts = 0;
        self.request_count = self.request_count.saturating_add(1);
    }

    /// A code is outstanding and has not expired
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.code.is_some() && now < self.expires_at
    }

    /// A code is outstanding but its lifetime has run out
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.code.is_some() && now >= self.expires_at
    }

    /// Issuance is currently refused
    pub fn is_blocked(&self, now: DateTime<Utc>) -> bool {
        self.blocked_until.is_some_and(|until| now < until)
    }

    /// Time left on an active block
    pub fn block_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.blocked_until
            .filter(|until| now < *until)
            .map(|until| until - now)
    }

    /// The tracking window that started at `window_started_at` is still open
    pub fn window_active(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now < self.window_started_at + window
    }

    /// Starts a fresh tracking window with no requests counted
    pub fn reset_window(&mut self, now: DateTime<Utc>) {
        self.request_count = 0;
        self.window_started_at = now;
    }

    /// The record carries counters that must outlive its code
    pub fn tracks_abuse(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.is_blocked(now) || (self.request_count > 0 && self.window_active(now, window))
    }

    /// Nothing in the record matters any more
    pub fn is_reclaimable(&self, now: DateTime<Utc>, window: Duration) -> bool {
        !self.is_live(now) && !self.tracks_abuse(now, window)
    }

    /// Drops the code so it can no longer be matched
    pub fn retire_code(&mut self) {
        self.code = None;
        self.attempts = 0;
    }

    /// Constant-time comparison against the outstanding code
    pub fn matches(&self, candidate: &str) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| constant_time_eq(code.as_bytes(), candidate.as_bytes()))
    }

    /// Whether the outstanding code is exactly `code`
    pub fn holds_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}
