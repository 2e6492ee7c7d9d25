//! Calibration management and pixel scoring for camera views of the board.

use tracing::debug;

use crate::{
    dto::{
        dartboard::{
            CalibrationRequest, CalibrationResponse, ScoreRequest, ScoreResponse,
            ScoredVisitResponse,
        },
        game::MatchStateResponse,
        validation::validate_camera_id,
    },
    error::ServiceError,
    scoring::dartboard::score_points,
    state::{SharedState, calibration::DartboardCalibration, dart::Dart},
};

/// Trim and check a camera identifier taken from the path.
pub fn sanitize_camera_id(raw: &str) -> Result<String, ServiceError> {
    let camera_id = raw.trim();
    validate_camera_id(camera_id).map_err(|err| {
        ServiceError::InvalidInput(
            err.message
                .map(|message| message.into_owned())
                .unwrap_or_else(|| err.code.into_owned()),
        )
    })?;
    Ok(camera_id.to_owned())
}

fn require_calibration(
    state: &SharedState,
    camera_id: &str,
) -> Result<DartboardCalibration, ServiceError> {
    state.calibrations().get(camera_id).ok_or_else(|| {
        ServiceError::NotFound(format!("no calibration for camera `{camera_id}`"))
    })
}

/// Calibration currently stored for a camera.
pub fn get_calibration(
    state: &SharedState,
    camera_id: &str,
) -> Result<CalibrationResponse, ServiceError> {
    let camera_id = sanitize_camera_id(camera_id)?;
    let calibration = require_calibration(state, &camera_id)?;
    Ok(CalibrationResponse::new(camera_id, &calibration))
}

/// Build, validate and store a calibration, replacing any previous one.
pub fn set_calibration(
    state: &SharedState,
    camera_id: &str,
    request: CalibrationRequest,
) -> Result<CalibrationResponse, ServiceError> {
    let camera_id = sanitize_camera_id(camera_id)?;
    let rings = request
        .rings
        .unwrap_or_else(|| state.config().default_rings());
    let calibration = DartboardCalibration::new(
        request.center_x,
        request.center_y,
        request.radius_px,
        request.rotation_deg,
        rings,
    )?;
    state.calibrations().set(camera_id.clone(), calibration);
    Ok(CalibrationResponse::new(camera_id, &calibration))
}

/// Drop a camera's calibration; scoring for it fails until it is calibrated again.
pub fn remove_calibration(state: &SharedState, camera_id: &str) -> Result<(), ServiceError> {
    let camera_id = sanitize_camera_id(camera_id)?;
    state
        .calibrations()
        .remove(&camera_id)
        .map(|_| ())
        .ok_or_else(|| ServiceError::NotFound(format!("no calibration for camera `{camera_id}`")))
}

/// Score pixel points against a camera's calibration.
pub fn score(
    state: &SharedState,
    camera_id: &str,
    request: &ScoreRequest,
) -> Result<ScoreResponse, ServiceError> {
    let camera_id = sanitize_camera_id(camera_id)?;
    let calibration = require_calibration(state, &camera_id)?;
    let (darts, total) = score_points(&request.points(), &calibration);
    debug!(camera_id = %camera_id, darts = darts.len(), total, "scored dart pixels");
    Ok(ScoreResponse {
        camera_id,
        total,
        darts,
    })
}

/// Score pixel points and submit the resulting darts as the active player's visit.
pub async fn score_visit(
    state: &SharedState,
    camera_id: &str,
    request: &ScoreRequest,
) -> Result<ScoredVisitResponse, ServiceError> {
    let score = score(state, camera_id, request)?;
    let darts: Vec<Dart> = score.darts.iter().map(|scored| scored.dart).collect();

    let mut sm = state.game().write().await;
    sm.submit_visit(&darts, None)?;
    Ok(ScoredVisitResponse {
        score,
        match_state: MatchStateResponse::from(&*sm),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dto::dartboard::DartPixel,
        state::{AppState, calibration::RingRatios, state_machine::MatchError},
    };

    fn calibrate(state: &SharedState, camera_id: &str) {
        set_calibration(
            state,
            camera_id,
            CalibrationRequest {
                center_x: 200.0,
                center_y: 200.0,
                radius_px: 100.0,
                rotation_deg: 0.0,
                rings: None,
            },
        )
        .unwrap();
    }

    fn request(points: &[(f64, f64)]) -> ScoreRequest {
        ScoreRequest {
            darts: points
                .iter()
                .map(|&(x, y)| DartPixel {
                    x,
                    y,
                    confidence: 1.0,
                })
                .collect(),
            max_darts: 3,
        }
    }

    #[test]
    fn camera_ids_are_trimmed_and_checked() {
        assert_eq!(sanitize_camera_id("  cam-1 ").unwrap(), "cam-1");
        assert!(matches!(
            sanitize_camera_id("   "),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            sanitize_camera_id("cam 1"),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn calibration_round_trip_uses_default_rings() {
        let state = AppState::new(AppConfig::default());
        assert!(matches!(
            get_calibration(&state, "cam-1"),
            Err(ServiceError::NotFound(_))
        ));

        calibrate(&state, "cam-1");
        let stored = get_calibration(&state, "cam-1").unwrap();
        assert_eq!(stored.radius_px, 100.0);
        assert_eq!(stored.rings, RingRatios::default());
    }

    #[test]
    fn invalid_calibration_is_rejected() {
        let state = AppState::new(AppConfig::default());
        let err = set_calibration(
            &state,
            "cam-1",
            CalibrationRequest {
                center_x: 0.0,
                center_y: 0.0,
                radius_px: 100.0,
                rotation_deg: 0.0,
                rings: Some(RingRatios {
                    outer_bull: 0.01,
                    ..RingRatios::default()
                }),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(state.calibrations().is_empty());
    }

    #[test]
    fn removed_calibration_stops_scoring() {
        let state = AppState::new(AppConfig::default());
        calibrate(&state, "cam-1");
        remove_calibration(&state, " cam-1 ").unwrap();
        assert!(state.calibrations().is_empty());
        assert!(matches!(
            score(&state, "cam-1", &request(&[(200.0, 200.0)])),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            remove_calibration(&state, "cam-1"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn scoring_requires_calibration() {
        let state = AppState::new(AppConfig::default());
        let err = score(&state, "cam-1", &request(&[(200.0, 200.0)])).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn scored_visit_reaches_the_match() {
        let state = AppState::new(AppConfig::default());
        calibrate(&state, "cam-1");

        // T20, T20, DBULL
        let response = score_visit(
            &state,
            "cam-1",
            &request(&[(200.0, 140.0), (200.0, 140.0), (200.0, 200.0)]),
        )
        .await
        .unwrap();
        assert_eq!(response.score.total, 170);
        assert_eq!(response.match_state.state.players[0].remaining, 331);

        state.game().write().await.reset(None);
        let err = score_visit(
            &state,
            "cam-1",
            &ScoreRequest {
                max_darts: 4,
                ..request(&[(200.0, 200.0); 4])
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Match(MatchError::TooManyDarts(4))));
    }
}
