use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{ContentRepository, DomainError, Result, Review, ReviewDraft};
use sqlx::postgres::PgPool;
use uuid::Uuid;

pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    title: String,
    restaurant_name: String,
    restaurant_link: String,
    rating: i32,
    image1: String,
    image2: Option<String>,
    image3: Option<String>,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: Uuid,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            title: row.title,
            restaurant_name: row.restaurant_name,
            restaurant_link: row.restaurant_link,
            rating: row.rating,
            image1: row.image1,
            image2: row.image2,
            image3: row.image3,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author_id: row.author_id,
        }
    }
}

#[async_trait]
impl ContentRepository<Review> for PgReviewRepository {
    async fn insert(&self, author_id: Uuid, draft: ReviewDraft) -> Result<Review> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, ReviewRow>(
            "INSERT INTO reviews (id, title, restaurant_name, restaurant_link, rating, image1, image2, image3, content, created_at, updated_at, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10, $11) \
             RETURNING id, title, restaurant_name, restaurant_link, rating, image1, image2, image3, content, created_at, updated_at, author_id",
        )
        .bind(Uuid::now_v7())
        .bind(draft.title)
        .bind(draft.restaurant_name)
        .bind(draft.restaurant_link)
        .bind(draft.rating)
        .bind(draft.image1)
        .bind(draft.image2)
        .bind(draft.image3)
        .bind(draft.content)
        .bind(now)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .context("insert review")?;
        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, title, restaurant_name, restaurant_link, rating, image1, image2, image3, content, created_at, updated_at, author_id \
             FROM reviews WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("fetch review")?;
        Ok(row.map(Review::from))
    }

    async fn update(&self, id: Uuid, draft: ReviewDraft) -> Result<Review> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "UPDATE reviews SET title = $2, restaurant_name = $3, restaurant_link = $4, rating = $5, \
             image1 = $6, image2 = $7, image3 = $8, content = $9, updated_at = $10 \
             WHERE id = $1 \
             RETURNING id, title, restaurant_name, restaurant_link, rating, image1, image2, image3, content, created_at, updated_at, author_id",
        )
        .bind(id)
        .bind(draft.title)
        .bind(draft.restaurant_name)
        .bind(draft.restaurant_link)
        .bind(draft.rating)
        .bind(draft.image1)
        .bind(draft.image2)
        .bind(draft.image3)
        .bind(draft.content)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .context("update review")?;
        row.map(Review::from)
            .ok_or_else(|| DomainError::not_found("review", id))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let done = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete review")?;
        if done.rows_affected() == 0 {
            return Err(DomainError::not_found("review", id));
        }
        Ok(())
    }

    async fn count(&self, author: Option<Uuid>) -> Result<usize> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reviews WHERE ($1::uuid IS NULL OR author_id = $1)",
        )
        .bind(author)
        .fetch_one(&self.pool)
        .await
        .context("count reviews")?;
        Ok(count as usize)
    }

    async fn list(&self, author: Option<Uuid>, limit: usize, offset: usize) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, title, restaurant_name, restaurant_link, rating, image1, image2, image3, content, created_at, updated_at, author_id \
             FROM reviews WHERE ($1::uuid IS NULL OR author_id = $1) \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(author)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .context("list reviews")?;
        Ok(rows.into_iter().map(Review::from).collect())
    }
}
