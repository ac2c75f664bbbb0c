//! Maps domain failures onto HTTP responses.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use domains::DomainError;
use serde_json::json;
use services::Location;
use thiserror::Error;
use tracing::error;

use crate::paths;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    /// An id segment that does not parse names nothing.
    #[error(transparent)]
    Path(#[from] PathRejection),
}

pub type ApiResult<T> = Result<T, ApiError>;

fn body(status: StatusCode, code: &str, message: String) -> Response {
    (status, Json(json!({ "error": { "code": code, "message": message } }))).into_response()
}

fn redirect(location: Location) -> Response {
    Redirect::to(&paths::resolve(&location)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::Domain(err) => err,
            ApiError::Body(rejection) => {
                return body(rejection.status(), "BAD_REQUEST", rejection.body_text())
            }
            ApiError::Query(rejection) => {
                return body(rejection.status(), "BAD_REQUEST", rejection.body_text())
            }
            ApiError::Path(rejection) => {
                return body(StatusCode::NOT_FOUND, "NOT_FOUND", rejection.body_text())
            }
        };
        match err {
            DomainError::NotFound { .. } => body(StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
            DomainError::PermissionDenied(_) => {
                body(StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
            }
            DomainError::ConfirmationRequired => redirect(Location::ConfirmationRequired),
            DomainError::Unauthenticated => redirect(Location::Login),
            DomainError::InvalidCredentials => {
                body(StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", err.to_string())
            }
            DomainError::InvalidToken => body(StatusCode::BAD_REQUEST, "INVALID_TOKEN", err.to_string()),
            DomainError::Validation(errors) => {
                let fields: BTreeMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errs)| {
                        let messages = errs
                            .iter()
                            .map(|e| match &e.message {
                                Some(message) => message.to_string(),
                                None => e.code.to_string(),
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "error": { "code": "VALIDATION", "message": "invalid input", "fields": fields }
                    })),
                )
                    .into_response()
            }
            DomainError::Storage(e) => {
                error!(error = ?e, "storage failure");
                body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal server error".to_string(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn confirmation_required_redirects_to_the_notice() {
        let response = ApiError::from(DomainError::ConfirmationRequired).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION],
            paths::CONFIRMATION_REQUIRED_PATH
        );
    }

    #[test]
    fn unauthenticated_redirects_to_login() {
        let response = ApiError::from(DomainError::Unauthenticated).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], paths::LOGIN_PATH);
    }

    #[test]
    fn status_codes() {
        let cases = [
            (DomainError::not_found("post", "x"), StatusCode::NOT_FOUND),
            (DomainError::PermissionDenied("no".into()), StatusCode::FORBIDDEN),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::InvalidToken, StatusCode::BAD_REQUEST),
            (
                DomainError::field("nickname", "unique", "taken"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DomainError::Storage(anyhow::anyhow!("connection reset")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
