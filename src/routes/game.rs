use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        checkout::{CheckoutResponse, MatchCheckoutQuery},
        game::{MatchStateResponse, MatchStatsResponse, ResetMatchRequest, SubmitVisitRequest},
    },
    error::AppError,
    services::{checkout_service, match_service},
    state::SharedState,
};

/// Routes driving the live match.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/match", get(get_match))
        .route("/match/visits", post(submit_visit))
        .route("/match/undo", post(undo_visit))
        .route("/match/reset", post(reset_match))
        .route("/match/stats", get(get_stats))
        .route("/match/checkouts", get(get_match_checkouts))
}

/// Return the current match snapshot.
#[utoipa::path(
    get,
    path = "/match",
    tag = "match",
    responses((status = 200, description = "Current match", body = MatchStateResponse))
)]
pub async fn get_match(State(state): State<SharedState>) -> Json<MatchStateResponse> {
    Json(match_service::current_match(&state).await)
}

/// Submit a visit of up to three darts for the player due to throw.
#[utoipa::path(
    post,
    path = "/match/visits",
    tag = "match",
    request_body = SubmitVisitRequest,
    responses(
        (status = 200, description = "Visit applied", body = MatchStateResponse),
        (status = 400, description = "Malformed visit"),
        (status = 409, description = "Match over or out of turn")
    )
)]
pub async fn submit_visit(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SubmitVisitRequest>>,
) -> Result<Json<MatchStateResponse>, AppError> {
    Ok(Json(match_service::submit_visit(&state, payload).await?))
}

/// Revert the most recent visit.
#[utoipa::path(
    post,
    path = "/match/undo",
    tag = "match",
    responses(
        (status = 200, description = "Visit reverted", body = MatchStateResponse),
        (status = 409, description = "Nothing to undo")
    )
)]
pub async fn undo_visit(
    State(state): State<SharedState>,
) -> Result<Json<MatchStateResponse>, AppError> {
    Ok(Json(match_service::undo(&state).await?))
}

/// Start a new match, optionally with new rules.
#[utoipa::path(
    post,
    path = "/match/reset",
    tag = "match",
    request_body = ResetMatchRequest,
    responses(
        (status = 200, description = "Match reset", body = MatchStateResponse),
        (status = 400, description = "Invalid rules")
    )
)]
pub async fn reset_match(
    State(state): State<SharedState>,
    Json(payload): Json<ResetMatchRequest>,
) -> Result<Json<MatchStateResponse>, AppError> {
    Ok(Json(match_service::reset(&state, payload).await?))
}

/// Per-player statistics recomputed from the visit history.
#[utoipa::path(
    get,
    path = "/match/stats",
    tag = "match",
    responses((status = 200, description = "Match statistics", body = MatchStatsResponse))
)]
pub async fn get_stats(State(state): State<SharedState>) -> Json<MatchStatsResponse> {
    Json(match_service::match_stats(&state).await)
}

/// Checkout routes for the player due to throw.
#[utoipa::path(
    get,
    path = "/match/checkouts",
    tag = "match",
    params(MatchCheckoutQuery),
    responses(
        (status = 200, description = "Ranked routes", body = CheckoutResponse),
        (status = 400, description = "Invalid query")
    )
)]
pub async fn get_match_checkouts(
    State(state): State<SharedState>,
    Valid(Query(query)): Valid<Query<MatchCheckoutQuery>>,
) -> Json<CheckoutResponse> {
    Json(checkout_service::suggest_for_match(&state, query).await)
}
