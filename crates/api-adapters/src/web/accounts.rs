//! Sign-up, login, logout, email confirmation and password change.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};
use services::{Location, LoginForm, PasswordChangeForm, SignupForm};

use super::error::ApiResult;
use super::session::Session;
use super::state::AppState;
use crate::paths;

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.cookie_name.to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn to(location: Location) -> Redirect {
    Redirect::to(&paths::resolve(&location))
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignupForm>, JsonRejection>,
) -> ApiResult<(CookieJar, Redirect)> {
    let Json(form) = payload?;
    let signed_in = state.accounts.signup(form).await?;
    let jar = jar.add(session_cookie(&state, signed_in.token));
    Ok((jar, to(Location::Index)))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginForm>, JsonRejection>,
) -> ApiResult<(CookieJar, Redirect)> {
    let Json(form) = payload?;
    let signed_in = state.accounts.login(form).await?;
    let jar = jar.add(session_cookie(&state, signed_in.token));
    Ok((jar, to(Location::Index)))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let cookie = Cookie::build((state.cookie_name.to_string(), "")).path("/");
    (jar.remove(cookie), to(Location::Index))
}

pub async fn confirm_email(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Redirect> {
    Ok(to(state.accounts.confirm_email(&key).await?))
}

pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<PasswordChangeForm>, JsonRejection>,
) -> ApiResult<Redirect> {
    let actor = session.require_login()?;
    let Json(form) = payload?;
    Ok(to(state.accounts.change_password(actor, form).await?))
}

/// Where anonymous requests are sent; sign in by POSTing here.
pub async fn login_required() -> Json<Value> {
    Json(json!({
        "message": "log in to continue",
        "fields": ["email", "password"]
    }))
}

pub async fn confirmation_required() -> Json<Value> {
    Json(json!({
        "message": "confirm your email address before posting; check your inbox for the link"
    }))
}
