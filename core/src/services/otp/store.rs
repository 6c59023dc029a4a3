//! Concurrency-safe OTP record store
//!
//! Records live in a sharded `DashMap`. Every operation on a phone number
//! runs under that key's shard lock through the entry API, so each
//! read-modify-write is indivisible with respect to other operations on the
//! same phone while different shards proceed in parallel. No lock is ever held
//! across an `.await`.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::{Entry, OccupiedEntry};
use dashmap::DashMap;
use tracing::debug;

use og_shared::phone::mask_phone_number;

use crate::domain::entities::otp_record::OtpRecord;

use super::config::OtpPolicy;
use super::types::{IssuanceDecision, VerifyOutcome};

/// Process-wide mapping from phone number to its OTP record
#[derive(Debug)]
pub struct OtpStore {
    records: DashMap<String, OtpRecord>,
    policy: OtpPolicy,
}

impl OtpStore {
    /// Create an empty store governed by `policy`
    pub fn new(policy: OtpPolicy) -> Self {
        Self {
            records: DashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &OtpPolicy {
        &self.policy
    }

    /// Decide whether a new code may be issued for `phone`.
    ///
    /// Reaching the request cap sets `blocked_until` and is reported as
    /// `RateLimited`; requests during an active block are reported as
    /// `Blocked` and neither counted nor allowed to extend the block.
    pub fn check_issuance_allowed(&self, phone: &str, now: DateTime<Utc>) -> IssuanceDecision {
        match self.records.get_mut(phone) {
            Some(mut record) => admit(&mut record, now, &self.policy),
            None => IssuanceDecision::Allowed,
        }
    }

    /// Store `code` for `phone`, creating or refreshing its record
    pub fn issue(&self, phone: &str, code: &str, now: DateTime<Utc>) {
        match self.records.entry(phone.to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().reissue(code, now, self.policy.ttl),
            Entry::Vacant(entry) => {
                entry.insert(OtpRecord::issued(phone, code, now, self.policy.ttl));
            }
        }
    }

    /// Check and issue under a single key lock.
    ///
    /// The code is stored only when the returned decision is `Allowed`.
    pub fn try_issue(&self, phone: &str, code: &str, now: DateTime<Utc>) -> IssuanceDecision {
        match self.records.entry(phone.to_string()) {
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                let decision = admit(record, now, &self.policy);
                if decision.is_allowed() {
                    record.reissue(code, now, self.policy.ttl);
                }
                decision
            }
            Entry::Vacant(entry) => {
                entry.insert(OtpRecord::issued(phone, code, now, self.policy.ttl));
                IssuanceDecision::Allowed
            }
        }
    }

    /// Check `candidate` against the live code for `phone`.
    ///
    /// Every attempt against a live code is counted before comparison. The
    /// code is retired on success, on expiry and once the attempt cap is
    /// exceeded.
    pub fn verify(&self, phone: &str, candidate: &str, now: DateTime<Utc>) -> VerifyOutcome {
        let Entry::Occupied(mut entry) = self.records.entry(phone.to_string()) else {
            return VerifyOutcome::NoActiveCode;
        };

        let record = entry.get_mut();
        if record.code.is_none() {
            return VerifyOutcome::NoActiveCode;
        }

        if record.is_expired(now) {
            self.retire(entry, now);
            return VerifyOutcome::Expired;
        }

        if record.attempts >= self.policy.max_attempts {
            self.retire(entry, now);
            return VerifyOutcome::TooManyAttempts;
        }

        record.attempts += 1;
        if record.matches(candidate) {
            self.retire(entry, now);
            VerifyOutcome::Success
        } else {
            VerifyOutcome::Mismatch {
                remaining_attempts: self.policy.max_attempts.saturating_sub(record.attempts),
            }
        }
    }

    /// Undo an issuance whose message could not be delivered.
    ///
    /// Only the code is withdrawn, and only if it is still the one that was
    /// issued; the request stays counted. Returns whether a code was withdrawn.
    pub fn rollback_issue(&self, phone: &str, code: &str, now: DateTime<Utc>) -> bool {
        match self.records.entry(phone.to_string()) {
            Entry::Occupied(entry) if entry.get().holds_code(code) => {
                self.retire(entry, now);
                true
            }
            _ => false,
        }
    }

    /// Withdraw any outstanding code for `phone`.
    ///
    /// The record itself is removed only when its counters no longer matter,
    /// so an active block or request window survives. Returns whether a
    /// record was present.
    pub fn discard_code(&self, phone: &str, now: DateTime<Utc>) -> bool {
        match self.records.entry(phone.to_string()) {
            Entry::Occupied(entry) => {
                self.retire(entry, now);
                true
            }
            Entry::Vacant(_) => false,
        }
    }

    /// Remove the record for `phone` outright
    pub fn delete(&self, phone: &str) -> bool {
        self.records.remove(phone).is_some()
    }

    /// Remove every record with no live code, no active block and a closed
    /// request window. Returns the number of records removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let window = self.policy.request_window;
        let mut removed = 0;
        self.records.retain(|_, record| {
            let keep = !record.is_reclaimable(now, window);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Snapshot of the record for `phone`
    pub fn get(&self, phone: &str) -> Option<OtpRecord> {
        self.records.get(phone).map(|record| record.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop the code and remove the record unless its counters still matter
    fn retire(&self, mut entry: OccupiedEntry<'_, String, OtpRecord>, now: DateTime<Utc>) {
        entry.get_mut().retire_code();
        if !entry.get().tracks_abuse(now, self.policy.request_window) {
            debug!(phone = %mask_phone_number(entry.key()), "OTP record removed");
            entry.remove();
        }
    }
}

/// Issuance admission for an existing record
fn admit(record: &mut OtpRecord, now: DateTime<Utc>, policy: &OtpPolicy) -> IssuanceDecision {
    match record.blocked_until {
        Some(until) if now < until => {
            return IssuanceDecision::Blocked {
                retry_after: until - now,
            };
        }
        Some(_) => {
            // Block episode over: start counting afresh
            record.blocked_until = None;
            record.reset_window(now);
        }
        None if !record.window_active(now, policy.request_window) => record.reset_window(now),
        None => {}
    }

    if record.request_count >= policy.max_requests {
        record.blocked_until = Some(now + policy.block_duration);
        return IssuanceDecision::RateLimited {
            retry_after: policy.block_duration,
        };
    }

    IssuanceDecision::Allowed
}
