//! MySQL implementation of the UserDirectory trait.
//!
//! Accounts live in the `users` table:
//!
//! ```sql
//! CREATE TABLE users (
//!     id    BIGINT AUTO_INCREMENT PRIMARY KEY,
//!     phone VARCHAR(32) NOT NULL UNIQUE,
//!     role  VARCHAR(32) NOT NULL DEFAULT 'farmer'
//! );
//! ```

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};

use og_core::domain::entities::user::{User, DEFAULT_ROLE};
use og_core::errors::DomainError;
use og_core::repositories::UserDirectory;

/// MySQL implementation of UserDirectory
pub struct MySqlUserDirectory {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserDirectory {
    /// Create a new MySQL user directory
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        Ok(User {
            id: row
                .try_get("id")
                .map_err(|e| DomainError::internal(format!("Failed to get id: {}", e)))?,
            phone: row
                .try_get("phone")
                .map_err(|e| DomainError::internal(format!("Failed to get phone: {}", e)))?,
            role: row
                .try_get::<Option<String>, _>("role")
                .map_err(|e| DomainError::internal(format!("Failed to get role: {}", e)))?
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        })
    }
}

#[async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn exists_by_phone(&self, phone: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE phone = ?) AS found")
            .bind(phone)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to look up user: {}", e)))?;

        let found: i64 = row
            .try_get("found")
            .map_err(|e| DomainError::internal(format!("Failed to read lookup result: {}", e)))?;
        Ok(found != 0)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query("SELECT id, phone, role FROM users WHERE phone = ? LIMIT 1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to find user: {}", e)))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn create_user(&self, phone: &str) -> Result<User, DomainError> {
        let result = sqlx::query("INSERT INTO users (phone, role) VALUES (?, ?)")
            .bind(phone)
            .bind(DEFAULT_ROLE)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DomainError::Validation {
                        message: "User with this phone already exists".to_string(),
                    }
                }
                other => DomainError::internal(format!("Failed to create user: {}", other)),
            })?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| DomainError::internal("User id out of range"))?;

        Ok(User::new(id, phone))
    }
}
