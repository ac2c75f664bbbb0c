use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{DomainError, ProfileFields, Result, User, UserRepository};
use sqlx::postgres::PgPool;
use uuid::Uuid;

use super::violates;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    email_verified: bool,
    nickname: Option<String>,
    profile_pic: String,
    intro: String,
    kakao_id: Option<String>,
    address: Option<String>,
    date_joined: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            email_verified: row.email_verified,
            nickname: row.nickname,
            profile_pic: row.profile_pic,
            intro: row.intro,
            kakao_id: row.kakao_id,
            address: row.address,
            date_joined: row.date_joined,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> Result<User> {
        let result = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, email, password_hash, email_verified, nickname, profile_pic, intro, kakao_id, address, date_joined) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id, email, password_hash, email_verified, nickname, profile_pic, intro, kakao_id, address, date_joined",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.email_verified)
        .bind(&user.nickname)
        .bind(&user.profile_pic)
        .bind(&user.intro)
        .bind(&user.kakao_id)
        .bind(&user.address)
        .bind(user.date_joined)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if violates(&e, "users_email_key") => Err(DomainError::field(
                "email",
                "unique",
                "a user is already registered with this email address",
            )),
            Err(e) if violates(&e, "users_nickname_key") => Err(DomainError::field(
                "nickname",
                "unique",
                "this nickname is already in use",
            )),
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, email_verified, nickname, profile_pic, intro, kakao_id, address, date_joined \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("fetch user")?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, email_verified, nickname, profile_pic, intro, kakao_id, address, date_joined \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("fetch user by email")?;
        Ok(row.map(User::from))
    }

    async fn save_profile(&self, id: Uuid, fields: ProfileFields) -> Result<User> {
        let result = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET nickname = $2, profile_pic = $3, intro = $4, kakao_id = $5, address = $6 \
             WHERE id = $1 \
             RETURNING id, email, password_hash, email_verified, nickname, profile_pic, intro, kakao_id, address, date_joined",
        )
        .bind(id)
        .bind(&fields.nickname)
        .bind(&fields.profile_pic)
        .bind(&fields.intro)
        .bind(&fields.kakao_id)
        .bind(&fields.address)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => Ok(row.into()),
            Ok(None) => Err(DomainError::not_found("user", id)),
            Err(e) if violates(&e, "users_nickname_key") => Err(DomainError::field(
                "nickname",
                "unique",
                "this nickname is already in use",
            )),
            Err(e) => Err(anyhow::Error::new(e).context("update profile").into()),
        }
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: String) -> Result<()> {
        let done = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .context("update password hash")?;
        if done.rows_affected() == 0 {
            return Err(DomainError::not_found("user", id));
        }
        Ok(())
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<()> {
        let done = sqlx::query("UPDATE users SET email_verified = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("mark email verified")?;
        if done.rows_affected() == 0 {
            return Err(DomainError::not_found("user", id));
        }
        Ok(())
    }
}
