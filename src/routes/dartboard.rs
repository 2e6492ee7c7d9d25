use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::dartboard::{
        CalibrationRequest, CalibrationResponse, ScoreRequest, ScoreResponse, ScoredVisitResponse,
    },
    error::AppError,
    services::dartboard_service,
    state::SharedState,
};

/// Per-camera calibration and pixel scoring.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/dartboard/{camera_id}/calibration",
            get(get_calibration)
                .put(put_calibration)
                .delete(delete_calibration),
        )
        .route("/dartboard/{camera_id}/score", post(score_darts))
        .route("/dartboard/{camera_id}/visit", post(score_visit))
}

/// Return the calibration stored for a camera.
#[utoipa::path(
    get,
    path = "/dartboard/{camera_id}/calibration",
    tag = "dartboard",
    params(("camera_id" = String, Path, description = "Camera identifier")),
    responses(
        (status = 200, description = "Stored calibration", body = CalibrationResponse),
        (status = 404, description = "Camera not calibrated")
    )
)]
pub async fn get_calibration(
    State(state): State<SharedState>,
    Path(camera_id): Path<String>,
) -> Result<Json<CalibrationResponse>, AppError> {
    Ok(Json(dartboard_service::get_calibration(&state, &camera_id)?))
}

/// Store or replace a camera's calibration.
#[utoipa::path(
    put,
    path = "/dartboard/{camera_id}/calibration",
    tag = "dartboard",
    params(("camera_id" = String, Path, description = "Camera identifier")),
    request_body = CalibrationRequest,
    responses(
        (status = 200, description = "Calibration stored", body = CalibrationResponse),
        (status = 400, description = "Invalid calibration")
    )
)]
pub async fn put_calibration(
    State(state): State<SharedState>,
    Path(camera_id): Path<String>,
    Valid(Json(payload)): Valid<Json<CalibrationRequest>>,
) -> Result<Json<CalibrationResponse>, AppError> {
    Ok(Json(dartboard_service::set_calibration(
        &state, &camera_id, payload,
    )?))
}

/// Forget a camera's calibration.
#[utoipa::path(
    delete,
    path = "/dartboard/{camera_id}/calibration",
    tag = "dartboard",
    params(("camera_id" = String, Path, description = "Camera identifier")),
    responses(
        (status = 204, description = "Calibration removed"),
        (status = 404, description = "Camera not calibrated")
    )
)]
pub async fn delete_calibration(
    State(state): State<SharedState>,
    Path(camera_id): Path<String>,
) -> Result<StatusCode, AppError> {
    dartboard_service::remove_calibration(&state, &camera_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Score dart tip pixels against the camera's calibration.
#[utoipa::path(
    post,
    path = "/dartboard/{camera_id}/score",
    tag = "dartboard",
    params(("camera_id" = String, Path, description = "Camera identifier")),
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Scored darts", body = ScoreResponse),
        (status = 400, description = "Invalid points"),
        (status = 404, description = "Camera not calibrated")
    )
)]
pub async fn score_darts(
    State(state): State<SharedState>,
    Path(camera_id): Path<String>,
    Valid(Json(payload)): Valid<Json<ScoreRequest>>,
) -> Result<Json<ScoreResponse>, AppError> {
    Ok(Json(dartboard_service::score(&state, &camera_id, &payload)?))
}

/// Score dart tip pixels and submit them as the active player's visit.
#[utoipa::path(
    post,
    path = "/dartboard/{camera_id}/visit",
    tag = "dartboard",
    params(("camera_id" = String, Path, description = "Camera identifier")),
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Visit applied", body = ScoredVisitResponse),
        (status = 400, description = "Invalid points or visit"),
        (status = 404, description = "Camera not calibrated"),
        (status = 409, description = "Match over")
    )
)]
pub async fn score_visit(
    State(state): State<SharedState>,
    Path(camera_id): Path<String>,
    Valid(Json(payload)): Valid<Json<ScoreRequest>>,
) -> Result<Json<ScoredVisitResponse>, AppError> {
    Ok(Json(
        dartboard_service::score_visit(&state, &camera_id, &payload).await?,
    ))
}
