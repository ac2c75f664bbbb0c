use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use domains::{ContentItem, ContentRepository, DomainError, Result};
use uuid::Uuid;

/// Content repository for any item kind, keyed by id.
pub struct MemoryContentRepository<T: ContentItem> {
    items: DashMap<Uuid, T>,
}

impl<T: ContentItem> MemoryContentRepository<T> {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Snapshot of matching items, newest first.
    fn sorted(&self, author: Option<Uuid>) -> Vec<T> {
        let mut items: Vec<T> = self
            .items
            .iter()
            .filter(|entry| author.map_or(true, |a| entry.author_id() == a))
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        items
    }
}

impl<T: ContentItem> Default for MemoryContentRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: ContentItem> ContentRepository<T> for MemoryContentRepository<T> {
    async fn insert(&self, author_id: Uuid, draft: T::Draft) -> Result<T> {
        let item = T::from_draft(Uuid::now_v7(), author_id, draft, Utc::now());
        self.items.insert(item.id(), item.clone());
        Ok(item)
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>> {
        Ok(self.items.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, id: Uuid, draft: T::Draft) -> Result<T> {
        let mut entry = self
            .items
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(T::KIND.entity(), id))?;
        entry.apply(draft, Utc::now());
        Ok(entry.value().clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(T::KIND.entity(), id))
    }

    async fn count(&self, author: Option<Uuid>) -> Result<usize> {
        Ok(self
            .items
            .iter()
            .filter(|entry| author.map_or(true, |a| entry.author_id() == a))
            .count())
    }

    async fn list(&self, author: Option<Uuid>, limit: usize, offset: usize) -> Result<Vec<T>> {
        Ok(self
            .sorted(author)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }
}
