use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{trim_in_place, trim_optional, ContentItem, ContentKind};
use crate::validators::validate_not_blank;

/// Condition of a second-hand item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCondition {
    New,
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ItemCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemCondition::New => "new",
            ItemCondition::Excellent => "excellent",
            ItemCondition::Good => "good",
            ItemCondition::Fair => "fair",
            ItemCondition::Poor => "poor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(ItemCondition::New),
            "excellent" => Some(ItemCondition::Excellent),
            "good" => Some(ItemCondition::Good),
            "fair" => Some(ItemCondition::Fair),
            "poor" => Some(ItemCondition::Poor),
            _ => None,
        }
    }
}

/// A marketplace listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub item_price: i64,
    pub item_condition: ItemCondition,
    pub item_details: String,
    pub image1: String,
    pub image2: Option<String>,
    pub image3: Option<String>,
    pub is_sold: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
}

/// Client-editable listing fields. `is_sold` is only honoured on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PostDraft {
    #[validate(length(max = 60), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(range(min = 0))]
    pub item_price: i64,
    pub item_condition: ItemCondition,
    #[validate(custom(function = "validate_not_blank"))]
    pub item_details: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub image1: String,
    #[serde(default)]
    pub image2: Option<String>,
    #[serde(default)]
    pub image3: Option<String>,
    #[serde(default)]
    pub is_sold: bool,
}

impl ContentItem for Post {
    type Draft = PostDraft;

    const KIND: ContentKind = ContentKind::Post;

    fn id(&self) -> Uuid {
        self.id
    }

    fn author_id(&self) -> Uuid {
        self.author_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: Uuid, author_id: Uuid, draft: PostDraft, now: DateTime<Utc>) -> Self {
        Post {
            id,
            title: draft.title,
            item_price: draft.item_price,
            item_condition: draft.item_condition,
            item_details: draft.item_details,
            image1: draft.image1,
            image2: draft.image2,
            image3: draft.image3,
            is_sold: draft.is_sold,
            created_at: now,
            updated_at: now,
            author_id,
        }
    }

    fn apply(&mut self, draft: PostDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.item_price = draft.item_price;
        self.item_condition = draft.item_condition;
        self.item_details = draft.item_details;
        self.image1 = draft.image1;
        self.image2 = draft.image2;
        self.image3 = draft.image3;
        self.is_sold = draft.is_sold;
        self.updated_at = now;
    }

    fn clean(draft: &mut PostDraft, creating: bool) {
        trim_in_place(&mut draft.title);
        trim_in_place(&mut draft.item_details);
        trim_in_place(&mut draft.image1);
        trim_optional(&mut draft.image2);
        trim_optional(&mut draft.image3);
        // The creation form has no sold checkbox.
        if creating {
            draft.is_sold = false;
        }
    }
}
