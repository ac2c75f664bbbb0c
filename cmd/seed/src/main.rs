//! Creates (or resets) a demo account that is email-verified and has a
//! complete profile for both site variants.
//!
//! Run with: `cargo run --bin seed`. Reads the usual settings plus
//! `SEED_EMAIL`, `SEED_PASSWORD` and `SEED_NICKNAME`.

use anyhow::{anyhow, Context};
use auth_adapters::Argon2PasswordHasher;
use configs::Settings;
use domains::{PasswordHasher, ProfileFields, User, UserRepository};
use secrecy::ExposeSecret;
use storage_adapters::postgres;
use storage_adapters::PgUserRepository;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("load settings")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| anyhow!("APP__DATABASE__URL must be set to seed"))?;
    let pool = postgres::connect(url.expose_secret(), 1).await?;
    let users = PgUserRepository::new(pool);
    let hasher = Argon2PasswordHasher::new();

    let email = env_or("SEED_EMAIL", "demo@example.com");
    let password = env_or("SEED_PASSWORD", "demo-password");
    let nickname = env_or("SEED_NICKNAME", "demo");

    let password_hash = hasher.hash(&password).await?;
    let user = match users.find_by_email(&email).await? {
        Some(existing) => {
            users.set_password_hash(existing.id, password_hash).await?;
            info!(user_id = %existing.id, "password reset");
            existing
        }
        None => users.create(User::new(email.clone(), password_hash)).await?,
    };

    let fields = ProfileFields {
        nickname: Some(nickname),
        kakao_id: Some("demo_kakao".to_string()),
        ..user.profile_fields()
    };
    users.save_profile(user.id, fields).await?;
    users.mark_email_verified(user.id).await?;

    info!(user_id = %user.id, %email, "demo account ready");
    Ok(())
}
