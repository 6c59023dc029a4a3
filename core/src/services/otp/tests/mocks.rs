//! Mock collaborators for OTP service tests

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::entities::user::User;
use crate::errors::DomainError;
use crate::repositories::{InMemoryUserDirectory, UserDirectory};
use crate::services::otp::{
    Clock, DeliveryChannel, FixedCodeGenerator, ManualClock, OtpPolicy, OtpService, OtpStore,
};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

// Mock delivery channel that records every message
pub struct MockDeliveryChannel {
    pub sent_messages: Mutex<Vec<(String, String)>>,
    pub should_fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl MockDeliveryChannel {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent_messages: Mutex::new(Vec::new()),
            should_fail: AtomicBool::new(should_fail),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    pub fn last_message(&self, phone: &str) -> Option<String> {
        self.sent_messages
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == phone)
            .map(|(_, text)| text.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent_messages.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryChannel for MockDeliveryChannel {
    async fn send(&self, phone: &str, text: &str) -> Result<String, String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err("Provider rejected message".to_string());
        }
        self.sent_messages
            .lock()
            .unwrap()
            .push((phone.to_string(), text.to_string()));
        Ok(format!("mock-msg-{}", n))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

// Delivery channel that never answers within any sane timeout
pub struct StalledDeliveryChannel {
    pub delay: Duration,
}

#[async_trait]
impl DeliveryChannel for StalledDeliveryChannel {
    async fn send(&self, _phone: &str, _text: &str) -> Result<String, String> {
        tokio::time::sleep(self.delay).await;
        Ok("too-late".to_string())
    }

    fn provider_name(&self) -> &str {
        "stalled"
    }
}

// User directory whose every call fails
pub struct FailingUserDirectory;

#[async_trait]
impl UserDirectory for FailingUserDirectory {
    async fn exists_by_phone(&self, _phone: &str) -> Result<bool, DomainError> {
        Err(DomainError::internal("connection refused"))
    }

    async fn find_by_phone(&self, _phone: &str) -> Result<Option<User>, DomainError> {
        Err(DomainError::internal("connection refused"))
    }

    async fn create_user(&self, _phone: &str) -> Result<User, DomainError> {
        Err(DomainError::internal("connection refused"))
    }
}

// Directory that answers lookups but cannot create accounts
pub struct ReadOnlyUserDirectory;

#[async_trait]
impl UserDirectory for ReadOnlyUserDirectory {
    async fn exists_by_phone(&self, _phone: &str) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn find_by_phone(&self, _phone: &str) -> Result<Option<User>, DomainError> {
        Ok(None)
    }

    async fn create_user(&self, _phone: &str) -> Result<User, DomainError> {
        Err(DomainError::internal("duplicate key"))
    }
}

pub struct Harness {
    pub service: OtpService<InMemoryUserDirectory, MockDeliveryChannel>,
    pub users: Arc<InMemoryUserDirectory>,
    pub channel: Arc<MockDeliveryChannel>,
    pub store: Arc<OtpStore>,
    pub clock: Arc<ManualClock>,
}

/// Service wired to in-memory collaborators, a manual clock and a fixed code
pub fn harness(code: &str) -> Harness {
    let users = Arc::new(InMemoryUserDirectory::new());
    let channel = Arc::new(MockDeliveryChannel::new(false));
    let store = Arc::new(OtpStore::new(OtpPolicy::default()));
    let clock = Arc::new(ManualClock::new(t0()));

    let service = OtpService::new(users.clone(), channel.clone(), store.clone())
        .with_generator(Arc::new(FixedCodeGenerator::new(code)))
        .with_clock(clock.clone() as Arc<dyn Clock>);

    Harness {
        service,
        users,
        channel,
        store,
        clock,
    }
}
