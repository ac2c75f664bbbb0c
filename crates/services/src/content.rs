//! Content CRUD: listing, detail, author-scoped listing and ownership-gated
//! mutation for any [`ContentItem`].

use std::sync::Arc;

use domains::{
    ContentItem, ContentRepository, CreatePolicy, DomainError, Page, PageRequest,
    ProfileSummary, Result, User, UserRepository, PAGE_SIZE,
};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::access::ensure_can_mutate;
use crate::location::Location;

/// An author's profile summary with one page of their items.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorListing<T> {
    pub profile_user: ProfileSummary,
    pub items: Page<T>,
}

pub struct ContentService<T: ContentItem> {
    items: Arc<dyn ContentRepository<T>>,
    users: Arc<dyn UserRepository>,
    policy: CreatePolicy,
}

impl<T: ContentItem> ContentService<T> {
    pub fn new(
        items: Arc<dyn ContentRepository<T>>,
        users: Arc<dyn UserRepository>,
        policy: CreatePolicy,
    ) -> Self {
        Self {
            items,
            users,
            policy,
        }
    }

    /// Newest-first page of every item.
    #[instrument(skip(self), fields(kind = T::KIND.entity()))]
    pub async fn list(&self, page: usize) -> Result<Page<T>> {
        self.page(None, page).await
    }

    pub async fn detail(&self, id: Uuid) -> Result<T> {
        self.items
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(T::KIND.entity(), id))
    }

    /// Stores a new item authored by `actor`, whatever the draft claims.
    #[instrument(skip_all, fields(kind = T::KIND.entity(), actor = %actor.id))]
    pub async fn create(&self, actor: &User, mut draft: T::Draft) -> Result<(T, Location)> {
        if self.policy == CreatePolicy::VerifiedEmail && !actor.email_verified {
            warn!("create refused, email not confirmed");
            return Err(DomainError::ConfirmationRequired);
        }
        T::clean(&mut draft, true);
        draft.validate()?;

        let item = self.items.insert(actor.id, draft).await?;
        info!(id = %item.id(), "content created");
        let location = Location::Detail(T::KIND, item.id());
        Ok((item, location))
    }

    /// Pre-fill data for the edit form; only the author may open it.
    pub async fn edit_form(&self, actor: &User, id: Uuid) -> Result<T> {
        self.owned(actor, id).await
    }

    /// Confirmation data for the delete page; only the author may open it.
    pub async fn delete_form(&self, actor: &User, id: Uuid) -> Result<T> {
        self.owned(actor, id).await
    }

    #[instrument(skip_all, fields(kind = T::KIND.entity(), actor = %actor.id, %id))]
    pub async fn update(&self, actor: &User, id: Uuid, mut draft: T::Draft) -> Result<(T, Location)> {
        self.owned(actor, id).await?;
        T::clean(&mut draft, false);
        draft.validate()?;

        let item = self.items.update(id, draft).await?;
        info!("content updated");
        Ok((item, Location::Detail(T::KIND, id)))
    }

    #[instrument(skip_all, fields(kind = T::KIND.entity(), actor = %actor.id, %id))]
    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<Location> {
        self.owned(actor, id).await?;
        self.items.delete(id).await?;
        info!("content deleted");
        Ok(Location::Index)
    }

    /// Dedicated per-author listing, paginated like the index.
    pub async fn list_by_author(&self, author_id: Uuid, page: usize) -> Result<AuthorListing<T>> {
        let author = self
            .users
            .get(author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", author_id))?;
        let items = self.page(Some(author_id), page).await?;
        Ok(AuthorListing {
            profile_user: ProfileSummary::from(&author),
            items,
        })
    }

    /// The author's newest items, capped at one page.
    pub async fn recent_by_author(&self, author_id: Uuid) -> Result<Vec<T>> {
        self.items.list(Some(author_id), PAGE_SIZE, 0).await
    }

    async fn page(&self, author: Option<Uuid>, number: usize) -> Result<Page<T>> {
        let total = self.items.count(author).await?;
        let request = PageRequest::resolve(number, total)?;
        let items = self
            .items
            .list(author, request.limit(), request.offset())
            .await?;
        Ok(request.into_page(items, total))
    }

    async fn owned(&self, actor: &User, id: Uuid) -> Result<T> {
        let item = self.detail(id).await?;
        ensure_can_mutate(actor, &item)?;
        Ok(item)
    }
}
