//! Profile setup and editing. The target is always the session's user.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Redirect;
use axum::Json;
use domains::ProfileFields;
use services::ProfileForm;

use super::error::ApiResult;
use super::session::Session;
use super::state::AppState;
use crate::paths;

/// Pre-fill for both the setup and the edit form.
pub async fn current(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<ProfileFields>> {
    let actor = session.require_login()?;
    Ok(Json(state.profiles.current(actor)))
}

pub async fn set(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<ProfileForm>, JsonRejection>,
) -> ApiResult<Redirect> {
    let actor = session.require_login()?;
    let Json(form) = payload?;
    let (_, location) = state.profiles.set_profile(actor, form).await?;
    Ok(Redirect::to(&paths::resolve(&location)))
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<ProfileForm>, JsonRejection>,
) -> ApiResult<Redirect> {
    let actor = session.require_login()?;
    let Json(form) = payload?;
    let (_, location) = state.profiles.update_profile(actor, form).await?;
    Ok(Redirect::to(&paths::resolve(&location)))
}
