//! # auth-adapters
//!
//! Implementations of the credential ports:
//! * [`Argon2PasswordHasher`] for `PasswordHasher`;
//! * `JwtTokenIssuer` for `TokenIssuer` (`auth-jwt` feature), covering both
//!   session tokens and email-confirmation keys.

mod password;

#[cfg(feature = "auth-jwt")]
mod jwt;

pub use password::Argon2PasswordHasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::{JwtTokenIssuer, TokenLifetimes};
