use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{ContentRepository, DomainError, ItemCondition, Post, PostDraft, Result};
use sqlx::postgres::PgPool;
use uuid::Uuid;

pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    item_price: i64,
    item_condition: String,
    item_details: String,
    image1: String,
    image2: Option<String>,
    image3: Option<String>,
    is_sold: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: Uuid,
}

impl TryFrom<PostRow> for Post {
    type Error = anyhow::Error;

    fn try_from(row: PostRow) -> anyhow::Result<Self> {
        let item_condition = ItemCondition::parse(&row.item_condition)
            .ok_or_else(|| anyhow!("post {} has unknown condition {:?}", row.id, row.item_condition))?;
        Ok(Post {
            id: row.id,
            title: row.title,
            item_price: row.item_price,
            item_condition,
            item_details: row.item_details,
            image1: row.image1,
            image2: row.image2,
            image3: row.image3,
            is_sold: row.is_sold,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author_id: row.author_id,
        })
    }
}

#[async_trait]
impl ContentRepository<Post> for PgPostRepository {
    async fn insert(&self, author_id: Uuid, draft: PostDraft) -> Result<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            "INSERT INTO posts (id, title, item_price, item_condition, item_details, image1, image2, image3, is_sold, created_at, updated_at, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10, $11) \
             RETURNING id, title, item_price, item_condition, item_details, image1, image2, image3, is_sold, created_at, updated_at, author_id",
        )
        .bind(Uuid::now_v7())
        .bind(draft.title)
        .bind(draft.item_price)
        .bind(draft.item_condition.as_str())
        .bind(draft.item_details)
        .bind(draft.image1)
        .bind(draft.image2)
        .bind(draft.image3)
        .bind(draft.is_sold)
        .bind(Utc::now())
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .context("insert post")?;
        Ok(Post::try_from(row)?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, item_price, item_condition, item_details, image1, image2, image3, is_sold, created_at, updated_at, author_id \
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("fetch post")?;
        Ok(row.map(Post::try_from).transpose()?)
    }

    async fn update(&self, id: Uuid, draft: PostDraft) -> Result<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            "UPDATE posts SET title = $2, item_price = $3, item_condition = $4, item_details = $5, \
             image1 = $6, image2 = $7, image3 = $8, is_sold = $9, updated_at = $10 \
             WHERE id = $1 \
             RETURNING id, title, item_price, item_condition, item_details, image1, image2, image3, is_sold, created_at, updated_at, author_id",
        )
        .bind(id)
        .bind(draft.title)
        .bind(draft.item_price)
        .bind(draft.item_condition.as_str())
        .bind(draft.item_details)
        .bind(draft.image1)
        .bind(draft.image2)
        .bind(draft.image3)
        .bind(draft.is_sold)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .context("update post")?;
        match row {
            Some(row) => Ok(Post::try_from(row)?),
            None => Err(DomainError::not_found("post", id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let done = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete post")?;
        if done.rows_affected() == 0 {
            return Err(DomainError::not_found("post", id));
        }
        Ok(())
    }

    async fn count(&self, author: Option<Uuid>) -> Result<usize> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts WHERE ($1::uuid IS NULL OR author_id = $1)",
        )
        .bind(author)
        .fetch_one(&self.pool)
        .await
        .context("count posts")?;
        Ok(count as usize)
    }

    async fn list(&self, author: Option<Uuid>, limit: usize, offset: usize) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, item_price, item_condition, item_details, image1, image2, image3, is_sold, created_at, updated_at, author_id \
             FROM posts WHERE ($1::uuid IS NULL OR author_id = $1) \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(author)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .context("list posts")?;
        Ok(rows
            .into_iter()
            .map(Post::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?)
    }
}
