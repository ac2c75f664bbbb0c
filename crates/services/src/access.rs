//! Ownership-based permission checks for content items.
//! Only the author may modify or delete what they wrote.

use domains::{ContentItem, DomainError, Result, User};

/// True iff `actor` authored `item`.
pub fn can_mutate<T: ContentItem>(actor: &User, item: &T) -> bool {
    item.author_id() == actor.id
}

/// Like [`can_mutate`], but fails with `PermissionDenied`.
pub fn ensure_can_mutate<T: ContentItem>(actor: &User, item: &T) -> Result<()> {
    if can_mutate(actor, item) {
        Ok(())
    } else {
        Err(DomainError::PermissionDenied(format!(
            "{} {} belongs to another user",
            T::KIND.entity(),
            item.id()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{ItemCondition, Post, PostDraft};
    use uuid::Uuid;

    fn post_by(author_id: Uuid) -> Post {
        let draft = PostDraft {
            title: "Bike".into(),
            item_price: 50_000,
            item_condition: ItemCondition::Good,
            item_details: "Two wheels".into(),
            image1: "post_pics/bike.jpg".into(),
            image2: None,
            image3: None,
            is_sold: false,
        };
        Post::from_draft(Uuid::now_v7(), author_id, draft, Utc::now())
    }

    #[test]
    fn author_may_mutate() {
        let author = User::new("seller@example.com".into(), "h".into());
        let post = post_by(author.id);
        assert!(can_mutate(&author, &post));
        assert!(ensure_can_mutate(&author, &post).is_ok());
    }

    #[test]
    fn others_are_denied() {
        let author = User::new("seller@example.com".into(), "h".into());
        let other = User::new("buyer@example.com".into(), "h".into());
        let post = post_by(author.id);
        assert!(!can_mutate(&other, &post));
        assert!(matches!(
            ensure_can_mutate(&other, &post),
            Err(DomainError::PermissionDenied(_))
        ));
    }
}
