//! In-memory user directory for development and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::trait_::UserDirectory;

/// User directory backed by a `HashMap` keyed by phone
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<String, User>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user directly, bypassing the OTP flow
    pub async fn insert(&self, phone: &str) -> User {
        let user = User::new(self.allocate_id(), phone);
        self.users.write().await.insert(phone.to_string(), user.clone());
        user
    }

    /// Remove a user by phone
    pub async fn remove(&self, phone: &str) -> Option<User> {
        self.users.write().await.remove(phone)
    }

    /// Number of registered users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the directory is empty
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn exists_by_phone(&self, phone: &str) -> Result<bool, DomainError> {
        Ok(self.users.read().await.contains_key(phone))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(phone).cloned())
    }

    async fn create_user(&self, phone: &str) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.contains_key(phone) {
            return Err(DomainError::Validation {
                message: "Phone number already registered".to_string(),
            });
        }

        let user = User::new(self.allocate_id(), phone);
        users.insert(phone.to_string(), user.clone());
        Ok(user)
    }
}
