use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the darts scoring backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::get_match,
        crate::routes::game::submit_visit,
        crate::routes::game::undo_visit,
        crate::routes::game::reset_match,
        crate::routes::game::get_stats,
        crate::routes::game::get_match_checkouts,
        crate::routes::checkout::get_checkouts,
        crate::routes::dartboard::get_calibration,
        crate::routes::dartboard::put_calibration,
        crate::routes::dartboard::delete_calibration,
        crate::routes::dartboard::score_darts,
        crate::routes::dartboard::score_visit,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::phase::VisibleMatchPhase,
            crate::dto::game::DartInput,
            crate::dto::game::SubmitVisitRequest,
            crate::dto::game::ResetMatchRequest,
            crate::dto::game::MatchStateResponse,
            crate::dto::game::MatchStatsResponse,
            crate::dto::checkout::CheckoutResponse,
            crate::dto::dartboard::CalibrationRequest,
            crate::dto::dartboard::CalibrationResponse,
            crate::dto::dartboard::DartPixel,
            crate::dto::dartboard::ScoreRequest,
            crate::dto::dartboard::ScoreResponse,
            crate::dto::dartboard::ScoredVisitResponse,
            crate::state::dart::Dart,
            crate::state::game::MatchConfig,
            crate::state::game::MatchState,
            crate::state::game::PlayerMatchState,
            crate::state::game::Visit,
            crate::state::calibration::RingRatios,
            crate::scoring::checkout::CheckoutSuggestion,
            crate::scoring::dartboard::Ring,
            crate::scoring::dartboard::ScoredDart,
            crate::scoring::stats::MatchStats,
            crate::scoring::stats::PlayerStats,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "match", description = "Live two-player 501 match"),
        (name = "checkout", description = "Checkout route suggestions"),
        (name = "dartboard", description = "Camera calibration and pixel scoring"),
    )
)]
pub struct ApiDoc;
