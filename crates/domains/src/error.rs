//! # DomainError
//!
//! Centralized error handling for review-market.
//! Every port and service returns this type; the web layer decides how each
//! variant is surfaced.

use std::borrow::Cow;

use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

/// The primary error type for all domain and service operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Resource not found (e.g., Review, Post, User, page)
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: &'static str, id: String },

    /// The actor is signed in but does not own the resource.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The actor must confirm their email address before creating content.
    #[error("email confirmation required")]
    ConfirmationRequired,

    /// The operation needs a signed-in actor.
    #[error("authentication required")]
    Unauthenticated,

    /// Unknown email or wrong password on login.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Expired, malformed or wrong-purpose token.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Field constraint violation; each entry names the offending field.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Infrastructure failure (e.g., DB down, hashing task panicked)
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Builds a single-field validation failure, e.g. a duplicate nickname.
    pub fn field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut error = ValidationError::new(code);
        error.message = Some(Cow::Borrowed(message));
        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        DomainError::Validation(errors)
    }

    /// True when this is a validation failure on `field`.
    pub fn is_field_error(&self, field: &str) -> bool {
        match self {
            DomainError::Validation(errors) => errors
                .field_errors()
                .keys()
                .any(|name| *name == field),
            _ => false,
        }
    }
}

/// A specialized Result type for review-market logic.
pub type Result<T> = std::result::Result<T, DomainError>;
