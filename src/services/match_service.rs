//! Business logic behind the `/match` routes. Every mutation runs under the match write
//! lock, so validate-and-apply is atomic with respect to other requests.

use tracing::debug;

use crate::{
    dto::game::{MatchStateResponse, MatchStatsResponse, ResetMatchRequest, SubmitVisitRequest},
    error::ServiceError,
    scoring::stats::compute_stats,
    state::{
        SharedState,
        game::{MatchConfig, PlayerId},
    },
};

/// Snapshot of the live match.
pub async fn current_match(state: &SharedState) -> MatchStateResponse {
    let sm = state.game().read().await;
    MatchStateResponse::from(&*sm)
}

/// Apply one visit for the player due to throw.
pub async fn submit_visit(
    state: &SharedState,
    request: SubmitVisitRequest,
) -> Result<MatchStateResponse, ServiceError> {
    let expected_player = request
        .player
        .map(PlayerId::try_from)
        .transpose()
        .map_err(ServiceError::InvalidInput)?;
    let raw: Vec<(i64, i64)> = request.darts.into_iter().map(Into::into).collect();

    let mut sm = state.game().write().await;
    sm.submit_raw_visit(&raw, expected_player)?;
    Ok(MatchStateResponse::from(&*sm))
}

/// Revert the last accepted visit.
pub async fn undo(state: &SharedState) -> Result<MatchStateResponse, ServiceError> {
    let mut sm = state.game().write().await;
    sm.undo()?;
    Ok(MatchStateResponse::from(&*sm))
}

/// Start a new match, overriding whichever rules the request names.
pub async fn reset(
    state: &SharedState,
    request: ResetMatchRequest,
) -> Result<MatchStateResponse, ServiceError> {
    let mut sm = state.game().write().await;
    let config = if request.is_empty() {
        None
    } else {
        let (starting_score, double_out, legs_to_win_set, sets_to_win_match) =
            request.merged_with(sm.state().config);
        Some(MatchConfig::new(
            starting_score,
            double_out,
            legs_to_win_set,
            sets_to_win_match,
        )?)
    };
    sm.reset(config);
    Ok(MatchStateResponse::from(&*sm))
}

/// Recompute both players' statistics from the match history.
pub async fn match_stats(state: &SharedState) -> MatchStatsResponse {
    let sm = state.game().read().await;
    let match_state = sm.state();
    let stats = compute_stats(&match_state.history, match_state.config.double_out());
    debug!(visits = match_state.history.len(), "match stats computed");
    MatchStatsResponse {
        visits: match_state.history.len(),
        stats,
    }
}
