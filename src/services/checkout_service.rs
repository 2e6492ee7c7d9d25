use crate::{
    dto::checkout::{CheckoutQuery, CheckoutResponse, MatchCheckoutQuery},
    scoring::checkout::DartBudget,
    state::SharedState,
};

/// Ranked checkout routes for an arbitrary score.
pub fn suggest(state: &SharedState, query: CheckoutQuery) -> CheckoutResponse {
    let suggestions = state.checkout().suggest(
        query.remaining,
        query.double_out,
        DartBudget::clamped(query.max_darts),
        query.limit,
    );
    CheckoutResponse {
        remaining: query.remaining,
        double_out: query.double_out,
        suggestions,
    }
}

/// Ranked checkout routes for the player due to throw in the live match.
pub async fn suggest_for_match(state: &SharedState, query: MatchCheckoutQuery) -> CheckoutResponse {
    let sm = state.game().read().await;
    let match_state = sm.state();
    let suggestions = state.checkout().suggest_for_state(
        match_state,
        DartBudget::clamped(query.max_darts),
        query.limit,
    );
    CheckoutResponse {
        remaining: i32::from(match_state.active().remaining),
        double_out: match_state.config.double_out(),
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, state::AppState};

    #[tokio::test]
    async fn live_match_uses_active_remaining() {
        let state = AppState::new(AppConfig::default());
        let response = suggest_for_match(
            &state,
            MatchCheckoutQuery {
                max_darts: 3,
                limit: 3,
            },
        )
        .await;
        assert_eq!(response.remaining, 501);
        assert!(response.suggestions.is_empty());

        let response = suggest(
            &state,
            CheckoutQuery {
                remaining: 170,
                double_out: true,
                max_darts: 3,
                limit: 10,
            },
        );
        assert_eq!(response.suggestions.len(), 1);
        assert_eq!(response.suggestions[0].labels, vec!["T20", "T20", "DBULL"]);
        assert_eq!(state.checkout().cached_entries(), 1);
    }
}
