//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{NewUser, User, UserSummary};
use crate::error::DomainError;
use crate::value_objects::UserId;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// List user summaries ordered by id, skipping `offset` rows
    async fn list_summaries(&self, offset: i64, limit: i64) -> RepoResult<Vec<UserSummary>>;

    /// Create a new user and return the stored record.
    ///
    /// Fails with [`DomainError::EmailAlreadyExists`] when the email is taken.
    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User>;

    /// Insert many users at once, silently skipping emails that already exist.
    /// Returns the number of rows actually inserted.
    async fn insert_many(&self, users: &[NewUser], password_hash: &str) -> RepoResult<u64>;

    /// Total number of users
    async fn count(&self) -> RepoResult<i64>;

    /// List user ids ordered by id, skipping `offset` rows
    async fn list_ids(&self, offset: i64, limit: i64) -> RepoResult<Vec<UserId>>;

    /// Replace the password hash of a user
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()>;

    /// Lightweight connectivity probe
    async fn health_check(&self) -> RepoResult<()>;
}
