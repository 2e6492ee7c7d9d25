//! Calibration and pixel-scoring payloads of the `/dartboard` routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::game::MatchStateResponse,
    scoring::dartboard::ScoredDart,
    state::calibration::{DartboardCalibration, RingRatios},
};

fn default_confidence() -> f64 {
    1.0
}

fn default_max_darts() -> u8 {
    3
}

/// Board position in a camera image.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CalibrationRequest {
    /// Board center x in pixels.
    pub center_x: f64,
    /// Board center y in pixels.
    pub center_y: f64,
    /// Distance from the center to the outer edge of the double ring, in pixels.
    #[validate(range(exclusive_min = 0.0))]
    pub radius_px: f64,
    /// 0 puts the 20 at 12 o'clock; positive values rotate clockwise.
    #[serde(default)]
    pub rotation_deg: f64,
    /// Ring proportions; the configured defaults apply when omitted.
    #[serde(default)]
    pub rings: Option<RingRatios>,
}

/// Stored calibration of one camera.
#[derive(Debug, Serialize, ToSchema)]
pub struct CalibrationResponse {
    /// Camera the calibration belongs to.
    pub camera_id: String,
    /// Board center x in pixels.
    pub center_x: f64,
    /// Board center y in pixels.
    pub center_y: f64,
    /// Board radius in pixels.
    pub radius_px: f64,
    /// Sector rotation in degrees.
    pub rotation_deg: f64,
    /// Ring proportions in use.
    pub rings: RingRatios,
}

impl CalibrationResponse {
    /// Snapshot a stored calibration for `camera_id`.
    pub fn new(camera_id: String, calibration: &DartboardCalibration) -> Self {
        Self {
            camera_id,
            center_x: calibration.center_x(),
            center_y: calibration.center_y(),
            radius_px: calibration.radius_px(),
            rotation_deg: calibration.rotation_deg(),
            rings: *calibration.rings(),
        }
    }
}

/// A dart tip located in the image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, Validate)]
pub struct DartPixel {
    /// x in image pixels.
    pub x: f64,
    /// y in image pixels.
    pub y: f64,
    /// Detection confidence in `[0, 1]`. Defaults to 1.
    #[serde(default = "default_confidence")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
}

/// Points to score against a camera's calibration.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ScoreRequest {
    /// Dart tips in throwing order. Points past `max_darts` are ignored.
    #[validate(length(min = 1), nested)]
    pub darts: Vec<DartPixel>,
    /// How many points to score, 1-12. Defaults to 3.
    #[serde(default = "default_max_darts")]
    #[validate(range(min = 1, max = 12))]
    pub max_darts: u8,
}

impl ScoreRequest {
    /// Points that will actually be scored, as `(x, y, confidence)`.
    pub fn points(&self) -> Vec<(f64, f64, f64)> {
        self.darts
            .iter()
            .take(usize::from(self.max_darts))
            .map(|pixel| (pixel.x, pixel.y, pixel.confidence))
            .collect()
    }
}

/// Scored points for one camera.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreResponse {
    /// Camera whose calibration was used.
    pub camera_id: String,
    /// Sum of the dart scores.
    pub total: u16,
    /// One entry per scored point, in request order.
    pub darts: Vec<ScoredDart>,
}

/// Result of scoring points and submitting them as a visit.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoredVisitResponse {
    /// How the points were read.
    pub score: ScoreResponse,
    /// Match after the visit was applied.
    #[serde(rename = "match")]
    pub match_state: MatchStateResponse,
}
