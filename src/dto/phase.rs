use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::MatchPhase;

/// Match phase exposed to REST clients.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleMatchPhase {
    /// Visits are being accepted.
    InProgress,
    /// A winner is decided; only a reset starts a new match.
    MatchOver,
}

impl From<MatchPhase> for VisibleMatchPhase {
    fn from(value: MatchPhase) -> Self {
        match value {
            MatchPhase::InProgress => VisibleMatchPhase::InProgress,
            MatchPhase::MatchOver => VisibleMatchPhase::MatchOver,
        }
    }
}
