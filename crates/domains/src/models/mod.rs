//! # Domain Models
//!
//! These structs represent the core entities of review-market.
//! We use UUID v7 for time-ordered, globally unique identification.

mod post;
mod review;
mod user;

pub use post::{ItemCondition, Post, PostDraft};
pub use review::{Review, ReviewDraft};
pub use user::{ProfileFields, ProfileSummary, User, DEFAULT_PROFILE_PIC};

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Which kind of user-authored record a content item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Review,
    Post,
}

impl ContentKind {
    /// Singular entity name used in errors and logs.
    pub fn entity(self) -> &'static str {
        match self {
            ContentKind::Review => "review",
            ContentKind::Post => "post",
        }
    }
}

/// A user-authored record owned by exactly one author.
///
/// Creation goes through a `Draft`, which carries the client-editable fields
/// only. The author and both timestamps are always assigned server-side.
pub trait ContentItem: Clone + Debug + Serialize + Send + Sync + 'static {
    type Draft: Validate + DeserializeOwned + Serialize + Clone + Debug + Send + Sync + 'static;

    const KIND: ContentKind;

    fn id(&self) -> Uuid;
    fn author_id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;

    /// Materializes a freshly inserted record.
    fn from_draft(id: Uuid, author_id: Uuid, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Overwrites the editable fields and bumps the modification time.
    fn apply(&mut self, draft: Self::Draft, now: DateTime<Utc>);

    /// Trims text and normalizes empty optional fields before validation.
    /// `creating` is true for new records.
    fn clean(draft: &mut Self::Draft, creating: bool);
}

/// Trims a required text field in place.
pub(crate) fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trims an optional field, turning blank input into `None`.
pub(crate) fn trim_optional(value: &mut Option<String>) {
    *value = value
        .take()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
}
