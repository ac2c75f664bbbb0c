//! Resolves the acting user once per request.
//!
//! The token comes from `Authorization: Bearer ...` or, failing that, the
//! session cookie. Handlers read the result through the [`Session`]
//! extractor.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use domains::{DomainError, User};

use super::error::ApiResult;
use super::state::AppState;

#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn actor(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// For views that send anonymous visitors to the login page.
    pub fn require_login(&self) -> Result<&User, DomainError> {
        self.actor().ok_or(DomainError::Unauthenticated)
    }

    /// For owner-only views, which refuse anonymous visitors outright.
    pub fn require_owner_access(&self) -> Result<&User, DomainError> {
        self.actor()
            .ok_or_else(|| DomainError::PermissionDenied("sign in to modify content".into()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Session>().cloned().unwrap_or_default())
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

pub async fn resolve_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = bearer(request.headers())
        .or_else(|| jar.get(&state.cookie_name).map(|c| c.value().to_string()));
    let user = match token {
        Some(token) => state.accounts.authenticate(&token).await?,
        None => None,
    };
    request.extensions_mut().insert(Session { user });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_is_read_from_the_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer(&headers).as_deref(), Some("abc.def"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        assert_eq!(bearer(&headers), None);
    }

    #[test]
    fn anonymous_sessions() {
        let session = Session::default();
        assert!(matches!(session.require_login(), Err(DomainError::Unauthenticated)));
        assert!(matches!(
            session.require_owner_access(),
            Err(DomainError::PermissionDenied(_))
        ));
    }
}
