//! CRUD handlers shared by reviews and posts.
//!
//! Each handler spells out its checks: who may call it, then the service
//! call, which re-checks ownership before touching storage.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::routing::get;
use axum::{Json, Router};
use domains::{ContentItem, Page, Post, Review};
use serde::Deserialize;
use services::{AuthorListing, ContentService, ProfileView};
use uuid::Uuid;

use super::error::ApiResult;
use super::session::Session;
use super::state::AppState;
use crate::metrics::Action;
use crate::paths;

/// A content kind the router can serve.
pub trait Resource: ContentItem {
    fn service(state: &AppState) -> &ContentService<Self>;
}

impl Resource for Review {
    fn service(state: &AppState) -> &ContentService<Self> {
        &state.reviews
    }
}

impl Resource for Post {
    fn service(state: &AppState) -> &ContentService<Self> {
        &state.posts
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

/// Routes for one content kind plus the profile pages that list it.
pub fn routes<T: Resource>() -> Router<AppState> {
    let seg = paths::segment(T::KIND);
    Router::new()
        .route("/", get(index::<T>))
        .route(&format!("/{seg}/new/"), axum::routing::post(create::<T>))
        .route(&format!("/{seg}/{{id}}/"), get(detail::<T>))
        .route(
            &format!("/{seg}/{{id}}/edit/"),
            get(edit_form::<T>).post(update::<T>),
        )
        .route(
            &format!("/{seg}/{{id}}/delete/"),
            get(delete_confirm::<T>).post(delete::<T>),
        )
        .route("/users/{id}/", get(view_profile::<T>))
        .route(&format!("/users/{{id}}/{seg}/"), get(by_author::<T>))
}

pub async fn index<T: Resource>(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<Page<T>>> {
    let Query(query) = query?;
    Ok(Json(T::service(&state).list(query.page).await?))
}

pub async fn detail<T: Resource>(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<T>> {
    let Path(id) = path?;
    Ok(Json(T::service(&state).detail(id).await?))
}

pub async fn create<T: Resource>(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<T::Draft>, JsonRejection>,
) -> ApiResult<Redirect> {
    let actor = session.require_login()?;
    let Json(draft) = payload?;
    let result = T::service(&state).create(actor, draft).await;
    state.metrics.record(T::KIND, Action::Create, &result);
    let (_, location) = result?;
    Ok(Redirect::to(&paths::resolve(&location)))
}

pub async fn edit_form<T: Resource>(
    State(state): State<AppState>,
    session: Session,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<T>> {
    let Path(id) = path?;
    let actor = session.require_owner_access()?;
    Ok(Json(T::service(&state).edit_form(actor, id).await?))
}

pub async fn update<T: Resource>(
    State(state): State<AppState>,
    session: Session,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<T::Draft>, JsonRejection>,
) -> ApiResult<Redirect> {
    let Path(id) = path?;
    let actor = session.require_owner_access()?;
    let Json(draft) = payload?;
    let result = T::service(&state).update(actor, id, draft).await;
    state.metrics.record(T::KIND, Action::Update, &result);
    let (_, location) = result?;
    Ok(Redirect::to(&paths::resolve(&location)))
}

pub async fn delete_confirm<T: Resource>(
    State(state): State<AppState>,
    session: Session,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<T>> {
    let Path(id) = path?;
    let actor = session.require_owner_access()?;
    Ok(Json(T::service(&state).delete_form(actor, id).await?))
}

pub async fn delete<T: Resource>(
    State(state): State<AppState>,
    session: Session,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Redirect> {
    let Path(id) = path?;
    let actor = session.require_owner_access()?;
    let result = T::service(&state).delete(actor, id).await;
    state.metrics.record(T::KIND, Action::Delete, &result);
    Ok(Redirect::to(&paths::resolve(&result?)))
}

pub async fn view_profile<T: Resource>(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ProfileView<T>>> {
    let Path(id) = path?;
    let view = state.profiles.view_profile(id, T::service(&state)).await?;
    Ok(Json(view))
}

pub async fn by_author<T: Resource>(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<AuthorListing<T>>> {
    let Path(id) = path?;
    let Query(query) = query?;
    Ok(Json(T::service(&state).list_by_author(id, query.page).await?))
}
