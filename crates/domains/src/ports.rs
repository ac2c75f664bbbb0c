//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ContentItem, ProfileFields, User};

/// Account persistence. Nickname and email uniqueness are enforced here and
/// reported as validation errors on the `nickname` / `email` field.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User>;
    async fn get(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Replaces the editable profile columns of `id`.
    async fn save_profile(&self, id: Uuid, fields: ProfileFields) -> Result<User>;
    async fn set_password_hash(&self, id: Uuid, password_hash: String) -> Result<()>;
    async fn mark_email_verified(&self, id: Uuid) -> Result<()>;
}

/// Content persistence. Listings are always newest-first by creation time,
/// ties broken by id (newest first); `author` narrows to one author.
#[async_trait]
pub trait ContentRepository<T: ContentItem>: Send + Sync {
    /// Inserts with a server-assigned id and timestamps.
    async fn insert(&self, author_id: Uuid, draft: T::Draft) -> Result<T>;
    async fn get(&self, id: Uuid) -> Result<Option<T>>;
    /// Overwrites the editable fields; `NotFound` if the row vanished.
    async fn update(&self, id: Uuid, draft: T::Draft) -> Result<T>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn count(&self, author: Option<Uuid>) -> Result<usize>;
    async fn list(&self, author: Option<Uuid>, limit: usize, offset: usize) -> Result<Vec<T>>;
}

/// Password hashing contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String>;
    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool>;
}

/// What a signed token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    EmailConfirmation,
}

/// Signed, expiring tokens binding a user id to a purpose.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: Uuid, purpose: TokenPurpose) -> Result<String>;
    /// `InvalidToken` when expired, tampered or issued for another purpose.
    fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<Uuid>;
}
