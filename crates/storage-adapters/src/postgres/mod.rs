//! Postgres repositories (`db-postgres` feature).

mod posts;
mod reviews;
mod users;

pub use posts::PgPostRepository;
pub use reviews::PgReviewRepository;
pub use users::PgUserRepository;

use anyhow::Context;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

/// Schema migrations embedded at compile time.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Opens a pool and brings the schema up to date.
pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .context("connect to postgres")?;
    MIGRATOR.run(&pool).await.context("run migrations")?;
    info!(max_connections, "postgres ready");
    Ok(pool)
}

/// True when `err` violates the unique constraint named `constraint`.
fn violates(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation() && db.constraint() == Some(constraint),
        _ => false,
    }
}
