use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use axum_valid::Valid;

use crate::{
    dto::checkout::{CheckoutQuery, CheckoutResponse},
    services::checkout_service,
    state::SharedState,
};

/// Stateless checkout lookups.
pub fn router() -> Router<SharedState> {
    Router::new().route("/checkouts", get(get_checkouts))
}

/// Ranked ways to finish a score in at most `max_darts` darts.
#[utoipa::path(
    get,
    path = "/checkouts",
    tag = "checkout",
    params(CheckoutQuery),
    responses(
        (status = 200, description = "Ranked routes", body = CheckoutResponse),
        (status = 400, description = "Invalid query")
    )
)]
pub async fn get_checkouts(
    State(state): State<SharedState>,
    Valid(Query(query)): Valid<Query<CheckoutQuery>>,
) -> Json<CheckoutResponse> {
    Json(checkout_service::suggest(&state, query))
}
