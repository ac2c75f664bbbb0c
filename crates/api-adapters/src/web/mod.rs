//! axum router: session resolution, the profile gate, then the handlers.

pub mod accounts;
pub mod content;
pub mod error;
pub mod gate;
pub mod profile;
pub mod session;
pub mod state;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use domains::{Post, Review, Site};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

pub use error::{ApiError, ApiResult};
pub use session::Session;
pub use state::{AppState, Repositories};

use crate::paths::{CONFIRMATION_REQUIRED_PATH, LOGIN_PATH, SETUP_PATH};

/// Full application router for the configured site.
///
/// `/metrics` sits outside the session and gate layers.
pub fn router(state: AppState) -> Router {
    let content = match state.site {
        Site::Reviews => content::routes::<Review>(),
        Site::Market => content::routes::<Post>(),
    };

    let app = content
        .route(SETUP_PATH, get(profile::current).post(profile::set))
        .route("/edit-profile/", get(profile::current).post(profile::update))
        .route("/password/change/", post(accounts::change_password))
        .route("/accounts/signup/", post(accounts::signup))
        .route(LOGIN_PATH, get(accounts::login_required).post(accounts::login))
        .route("/accounts/logout/", post(accounts::logout))
        .route("/accounts/confirm-email/{key}/", get(accounts::confirm_email))
        .route(CONFIRMATION_REQUIRED_PATH, get(accounts::confirmation_required))
        .layer(from_fn_with_state(state.clone(), gate::profile_gate))
        .layer(from_fn_with_state(state.clone(), session::resolve_session));

    Router::new()
        .route("/metrics", get(export_metrics))
        .merge(app)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

async fn export_metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => (
            [(
                header::CONTENT_TYPE,
                "application/openmetrics-text; version=1.0.0; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
