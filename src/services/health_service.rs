use tracing::debug;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a health payload summarising in-memory resources.
pub fn health_status(state: &SharedState) -> HealthResponse {
    let calibrated_cameras = state.calibrations().len();
    let cached_checkouts = state.checkout().cached_entries();
    debug!(calibrated_cameras, cached_checkouts, "health check");
    HealthResponse::ok(calibrated_cameras, cached_checkouts)
}
