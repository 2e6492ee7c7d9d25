use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status, always "ok" while the process serves requests.
    pub status: String,
    /// Cameras with a stored calibration.
    pub calibrated_cameras: usize,
    /// Memoized checkout inputs.
    pub cached_checkouts: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(calibrated_cameras: usize, cached_checkouts: usize) -> Self {
        Self {
            status: "ok".to_string(),
            calibrated_cameras,
            cached_checkouts,
        }
    }
}
