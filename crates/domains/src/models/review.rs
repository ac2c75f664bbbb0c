use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{trim_in_place, trim_optional, ContentItem, ContentKind};
use crate::validators::{validate_not_blank, validate_restaurant_link};

/// A restaurant review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub title: String,
    pub restaurant_name: String,
    pub restaurant_link: String,
    /// 1 to 5 stars
    pub rating: i32,
    pub image1: String,
    pub image2: Option<String>,
    pub image3: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
}

impl Review {
    /// Display form of the rating, e.g. "★★★".
    pub fn stars(&self) -> String {
        "★".repeat(self.rating.clamp(0, 5) as usize)
    }
}

/// Client-editable review fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReviewDraft {
    #[validate(length(max = 30), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(length(max = 20), custom(function = "validate_not_blank"))]
    pub restaurant_name: String,
    #[validate(url, custom(function = "validate_restaurant_link"))]
    pub restaurant_link: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(custom(function = "validate_not_blank"))]
    pub image1: String,
    #[serde(default)]
    pub image2: Option<String>,
    #[serde(default)]
    pub image3: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub content: String,
}

impl ContentItem for Review {
    type Draft = ReviewDraft;

    const KIND: ContentKind = ContentKind::Review;

    fn id(&self) -> Uuid {
        self.id
    }

    fn author_id(&self) -> Uuid {
        self.author_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: Uuid, author_id: Uuid, draft: ReviewDraft, now: DateTime<Utc>) -> Self {
        Review {
            id,
            title: draft.title,
            restaurant_name: draft.restaurant_name,
            restaurant_link: draft.restaurant_link,
            rating: draft.rating,
            image1: draft.image1,
            image2: draft.image2,
            image3: draft.image3,
            content: draft.content,
            created_at: now,
            updated_at: now,
            author_id,
        }
    }

    fn apply(&mut self, draft: ReviewDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.restaurant_name = draft.restaurant_name;
        self.restaurant_link = draft.restaurant_link;
        self.rating = draft.rating;
        self.image1 = draft.image1;
        self.image2 = draft.image2;
        self.image3 = draft.image3;
        self.content = draft.content;
        self.updated_at = now;
    }

    fn clean(draft: &mut ReviewDraft, _creating: bool) {
        trim_in_place(&mut draft.title);
        trim_in_place(&mut draft.restaurant_name);
        trim_in_place(&mut draft.restaurant_link);
        trim_in_place(&mut draft.image1);
        trim_optional(&mut draft.image2);
        trim_optional(&mut draft.image3);
        trim_in_place(&mut draft.content);
    }
}
