//! Argon2-based implementation of `PasswordHasher`.

use anyhow::{anyhow, Context};
use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use async_trait::async_trait;
use domains::{PasswordHasher, Result};
use tracing::warn;

/// Argon2id with default parameters. Hashing runs on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| anyhow!("hash password: {e}"))
        })
        .await
        .context("password hashing task")??;
        Ok(hash)
    }

    /// Verifies `password` against a stored PHC string. A malformed stored
    /// hash never verifies.
    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        let ok = tokio::task::spawn_blocking(move || {
            let parsed = match PasswordHash::new(&password_hash) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(error = %e, "stored password hash is malformed");
                    return false;
                }
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .await
        .context("password verification task")?;
        Ok(ok)
    }
}
