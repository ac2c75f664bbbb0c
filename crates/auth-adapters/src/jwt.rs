//! HS256 JWTs for sessions and email confirmation.

use anyhow::Context;
use chrono::{Duration, Utc};
use domains::{DomainError, Result, TokenIssuer, TokenPurpose};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// How long each kind of token stays valid.
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub session: Duration,
    pub email_confirmation: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            session: Duration::days(14),
            email_confirmation: Duration::days(3),
        }
    }
}

impl TokenLifetimes {
    fn of(&self, purpose: TokenPurpose) -> Duration {
        match purpose {
            TokenPurpose::Session => self.session,
            TokenPurpose::EmailConfirmation => self.email_confirmation,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    purpose: TokenPurpose,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetimes: TokenLifetimes,
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8], lifetimes: TokenLifetimes) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetimes,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user_id: Uuid, purpose: TokenPurpose) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            purpose,
            iat: now.timestamp(),
            exp: (now + self.lifetimes.of(purpose)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding).context("sign token")?;
        Ok(token)
    }

    fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
            debug!(error = %e, "token rejected");
            DomainError::InvalidToken
        })?;
        if data.claims.purpose != purpose {
            debug!(?purpose, got = ?data.claims.purpose, "token used for the wrong purpose");
            return Err(DomainError::InvalidToken);
        }
        Ok(data.claims.sub)
    }
}
