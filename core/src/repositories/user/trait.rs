//! User directory trait: the account lookups the OTP flows depend on.
//!
//! The directory answers whether a phone number is registered, returns the
//! public identity for login, and creates the account once signup is verified.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Account store consulted by the OTP flows
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use og_core::domain::entities::user::User;
/// use og_core::errors::DomainError;
/// use og_core::repositories::UserDirectory;
///
/// struct StaticDirectory;
///
/// #[async_trait]
/// impl UserDirectory for StaticDirectory {
///     async fn exists_by_phone(&self, phone: &str) -> Result<bool, DomainError> {
///         Ok(phone == "+910000000001")
///     }
///
///     async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
///         Ok((phone == "+910000000001").then(|| User::new(1, phone)))
///     }
///
///     async fn create_user(&self, phone: &str) -> Result<User, DomainError> {
///         Ok(User::new(2, phone))
///     }
/// }
/// ```
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Check if a user is registered under the given phone number
    ///
    /// # Returns
    /// * `Ok(true)` - User exists
    /// * `Ok(false)` - User does not exist
    /// * `Err(DomainError)` - Lookup failed
    async fn exists_by_phone(&self, phone: &str) -> Result<bool, DomainError>;

    /// Find the user registered under the given phone number
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError>;

    /// Create a user for the given phone number with the default role
    ///
    /// # Returns
    /// * `Ok(User)` - The created user with its assigned id
    /// * `Err(DomainError)` - Creation failed (e.g., duplicate phone number)
    async fn create_user(&self, phone: &str) -> Result<User, DomainError>;
}
