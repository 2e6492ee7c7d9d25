//! Payloads of the `/match` routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::phase::VisibleMatchPhase,
    scoring::stats::MatchStats,
    state::{
        game::{MatchConfig, MatchState},
        state_machine::MatchStateMachine,
    },
};

/// A dart as submitted by a client. Board rules, ranges included, are checked by the
/// match engine so a bad dart is reported as `INVALID_DART`.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct DartInput {
    /// 0 for a miss, 1-20, or 25 for the bull.
    pub value: i64,
    /// 0 for a miss, 1 single, 2 double, 3 treble.
    pub multiplier: i64,
}

impl From<DartInput> for (i64, i64) {
    fn from(value: DartInput) -> Self {
        (value.value, value.multiplier)
    }
}

/// One visit for the player due to throw.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitVisitRequest {
    /// Darts in throwing order. An empty list records a single miss.
    #[serde(default)]
    pub darts: Vec<DartInput>,
    /// When set, the visit is refused unless this player is due to throw.
    #[serde(default)]
    #[validate(range(min = 1, max = 2))]
    pub player: Option<u8>,
}

/// Rules for the next match. Omitted fields keep the current match's value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ResetMatchRequest {
    /// Points each player starts every leg on.
    #[serde(default)]
    pub starting_score: Option<u16>,
    /// Whether legs must finish on a double.
    #[serde(default)]
    pub double_out: Option<bool>,
    /// Legs needed to take a set.
    #[serde(default)]
    pub legs_to_win_set: Option<u8>,
    /// Sets needed to take the match.
    #[serde(default)]
    pub sets_to_win_match: Option<u8>,
}

impl ResetMatchRequest {
    /// True when no rule is overridden.
    pub fn is_empty(&self) -> bool {
        self.starting_score.is_none()
            && self.double_out.is_none()
            && self.legs_to_win_set.is_none()
            && self.sets_to_win_match.is_none()
    }

    /// Raw rule values with gaps filled from `current`. Validation is left to the
    /// match engine.
    pub fn merged_with(&self, current: MatchConfig) -> (u16, bool, u8, u8) {
        (
            self.starting_score.unwrap_or(current.starting_score()),
            self.double_out.unwrap_or(current.double_out()),
            self.legs_to_win_set.unwrap_or(current.legs_to_win_set()),
            self.sets_to_win_match.unwrap_or(current.sets_to_win_match()),
        )
    }
}

/// Current match snapshot with its phase.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchStateResponse {
    /// Whether visits are still accepted.
    pub phase: VisibleMatchPhase,
    /// Visits that can still be undone.
    pub undo_depth: usize,
    /// Full match snapshot.
    pub state: MatchState,
}

impl From<&MatchStateMachine> for MatchStateResponse {
    fn from(machine: &MatchStateMachine) -> Self {
        Self {
            phase: machine.phase().into(),
            undo_depth: machine.undo_depth(),
            state: machine.state().clone(),
        }
    }
}

/// Statistics of both players for the current match.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchStatsResponse {
    /// Visits recorded since the last reset.
    pub visits: usize,
    /// Per-player totals.
    pub stats: MatchStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_request_fills_gaps_from_current() {
        let request = ResetMatchRequest {
            starting_score: Some(301),
            ..Default::default()
        };
        assert!(!request.is_empty());
        assert_eq!(
            request.merged_with(MatchConfig::default()),
            (301, true, 3, 1)
        );
        assert!(ResetMatchRequest::default().is_empty());
    }

    #[test]
    fn submit_request_checks_player_range() {
        let request: SubmitVisitRequest =
            serde_json::from_str(r#"{"darts": [{"value": 20, "multiplier": 3}], "player": 3}"#)
                .unwrap();
        assert!(request.validate().is_err());

        let request: SubmitVisitRequest = serde_json::from_str(r#"{"player": 2}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.darts.is_empty());
    }
}
