use crate::api::api_error::APIError;
use crate::api::model::{ChallengePayload, ChallengeResult};
use crate::api::server::AppState;
use crate::error::Error;
use crate::solver::Action;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tower_http::trace::TraceLayer;

pub(super) fn new(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(health_check))
        .route("/apis/:group/v1alpha1/:solver", post(solve))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[allow(clippy::unused_async)]
async fn health_check() -> impl IntoResponse {
    Json(json!({"ok":"healthy"}))
}

async fn solve(
    State(state): State<AppState>,
    Path((group, solver_name)): Path<(String, String)>,
    WithRejection(Json(payload), _): WithRejection<Json<ChallengePayload>, APIError>,
) -> Result<Json<ChallengeResult>, APIError> {
    if group != *state.group_name {
        return Err(Error::UnknownGroup(group).into());
    }
    let solver = state
        .solvers
        .get(&solver_name)
        .ok_or(Error::UnknownSolver(solver_name))?;

    let challenge = payload.request;
    tracing::trace!(
        "{} {} request {} for \"{}\"",
        payload.api_version.as_deref().unwrap_or("-"),
        payload.kind.as_deref().unwrap_or("-"),
        challenge.uid,
        challenge.resolved_fqdn
    );
    let outcome = match challenge.action {
        Action::Present => solver.present(&challenge).await,
        Action::CleanUp => solver.clean_up(&challenge).await,
    };
    if let Err(err) = &outcome {
        tracing::info!(
            "{:?} for \"{}\" failed: {err}",
            challenge.action,
            challenge.resolved_fqdn
        );
    }
    Ok(Json(ChallengeResult::new(
        challenge.uid,
        outcome.map_err(|err| err.to_string()),
    )))
}
