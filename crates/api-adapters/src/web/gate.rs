//! Profile completeness gate, run on every request after the session is
//! resolved.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use services::GateDecision;
use tracing::debug;

use super::session::Session;
use super::state::AppState;
use crate::paths;

pub async fn profile_gate(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    match state.gate.check(session.actor(), request.uri().path()) {
        GateDecision::Proceed => next.run(request).await,
        GateDecision::Redirect(location) => {
            let to = paths::resolve(&location);
            debug!(path = %request.uri().path(), %to, "profile incomplete");
            state.metrics.gate_redirect();
            Redirect::to(&to).into_response()
        }
    }
}
