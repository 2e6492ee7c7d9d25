use axum::Router;

use crate::state::SharedState;

/// Stateless checkout lookups.
pub mod checkout;
/// Camera calibration and pixel scoring.
pub mod dartboard;
/// Swagger UI and the OpenAPI document.
pub mod docs;
/// The live match.
pub mod game;
/// Liveness probe.
pub mod health;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(game::router())
        .merge(checkout::router())
        .merge(dartboard::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
