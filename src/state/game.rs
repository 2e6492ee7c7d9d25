use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::{dart::Dart, state_machine::MatchError};

/// Standard starting score for a leg of 501.
pub const DEFAULT_STARTING_SCORE: u16 = 501;
/// Legs a player needs to take a set unless configured otherwise.
pub const DEFAULT_LEGS_TO_WIN_SET: u8 = 3;
/// Sets a player needs to take the match unless configured otherwise.
pub const DEFAULT_SETS_TO_WIN_MATCH: u8 = 1;

/// Identifies one of the two players of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerId {
    /// Player 1, throws first in the opening leg.
    One,
    /// Player 2.
    Two,
}

impl PlayerId {
    /// The player who is not `self`.
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Position in [`MatchState::players`].
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// 1 or 2, as shown to clients.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerId::One),
            2 => Ok(PlayerId::Two),
            other => Err(format!("player id must be 1 or 2 (got {other})")),
        }
    }
}

impl From<PlayerId> for u8 {
    fn from(value: PlayerId) -> Self {
        value.number()
    }
}

/// Rules fixed for the lifetime of a match, chosen at reset time.
///
/// Deserialization goes through [`MatchConfig::new`], so a decoded value is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "RawMatchConfig")]
pub struct MatchConfig {
    starting_score: u16,
    double_out: bool,
    legs_to_win_set: u8,
    sets_to_win_match: u8,
}

/// Unchecked wire form of [`MatchConfig`].
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct RawMatchConfig {
    starting_score: u16,
    double_out: bool,
    legs_to_win_set: u8,
    sets_to_win_match: u8,
}

impl TryFrom<RawMatchConfig> for MatchConfig {
    type Error = MatchError;

    fn try_from(raw: RawMatchConfig) -> Result<Self, Self::Error> {
        MatchConfig::new(
            raw.starting_score,
            raw.double_out,
            raw.legs_to_win_set,
            raw.sets_to_win_match,
        )
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            starting_score: DEFAULT_STARTING_SCORE,
            double_out: true,
            legs_to_win_set: DEFAULT_LEGS_TO_WIN_SET,
            sets_to_win_match: DEFAULT_SETS_TO_WIN_MATCH,
        }
    }
}

impl MatchConfig {
    /// Build a config, rejecting zero scores or zero leg/set targets.
    pub fn new(
        starting_score: u16,
        double_out: bool,
        legs_to_win_set: u8,
        sets_to_win_match: u8,
    ) -> Result<Self, MatchError> {
        if starting_score == 0 {
            return Err(MatchError::InvalidConfig(
                "starting score must be greater than 0".into(),
            ));
        }
        if legs_to_win_set == 0 {
            return Err(MatchError::InvalidConfig(
                "legs to win a set must be greater than 0".into(),
            ));
        }
        if sets_to_win_match == 0 {
            return Err(MatchError::InvalidConfig(
                "sets to win the match must be greater than 0".into(),
            ));
        }
        Ok(Self {
            starting_score,
            double_out,
            legs_to_win_set,
            sets_to_win_match,
        })
    }

    /// Points each player starts every leg on.
    pub fn starting_score(&self) -> u16 {
        self.starting_score
    }

    /// Whether a leg must finish on a double.
    pub fn double_out(&self) -> bool {
        self.double_out
    }

    /// Legs needed to take a set.
    pub fn legs_to_win_set(&self) -> u8 {
        self.legs_to_win_set
    }

    /// Sets needed to take the match.
    pub fn sets_to_win_match(&self) -> u8 {
        self.sets_to_win_match
    }
}

/// Per-player slice of the match state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlayerMatchState {
    /// Which player this is.
    #[schema(value_type = u8)]
    pub player_id: PlayerId,
    /// Points still required to finish the current leg.
    pub remaining: u16,
    /// Legs won in the current set.
    pub legs_won: u8,
    /// Sets won in the match.
    pub sets_won: u8,
}

impl PlayerMatchState {
    /// A player at the start of a match.
    pub fn fresh(player_id: PlayerId, starting_score: u16) -> Self {
        Self {
            player_id,
            remaining: starting_score,
            legs_won: 0,
            sets_won: 0,
        }
    }
}

/// One accepted turn of up to three darts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Visit {
    /// Player who threw.
    #[schema(value_type = u8)]
    pub player_id: PlayerId,
    /// Darts thrown, 1 to 3.
    pub darts: Vec<Dart>,
    /// Sum of the dart scores, busted or not.
    pub total: u16,
    /// The visit busted and the score reverted.
    pub bust: bool,
    /// The visit finished the leg.
    pub checkout: bool,
    /// Remaining score when the visit started.
    pub remaining_before: u16,
    /// Remaining score after the visit (unchanged on a bust, 0 on a checkout).
    pub remaining_after: u16,
    /// Set in which the visit was thrown (1-based).
    pub set_number: u16,
    /// Leg within the set in which the visit was thrown (1-based).
    pub leg_number: u16,
}

/// Authoritative snapshot of a two-player match.
///
/// Transitions never mutate a snapshot in place: the state machine clones it, applies the
/// visit to the clone and swaps it in, which is what lets undo restore a prior value verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MatchState {
    /// Rules of this match.
    pub config: MatchConfig,
    /// Player 1 and player 2, in that order.
    pub players: [PlayerMatchState; 2],
    /// Player expected to throw next (frozen on the winner once the match is over).
    #[schema(value_type = u8)]
    pub active_player: PlayerId,
    /// Player who threw first in the current leg.
    #[schema(value_type = u8)]
    pub leg_starter: PlayerId,
    /// Current set (1-based).
    pub set_number: u16,
    /// Current leg within the set (1-based).
    pub leg_number: u16,
    /// Match winner; `None` while the match is in progress.
    #[schema(value_type = Option<u8>)]
    pub winner: Option<PlayerId>,
    /// Winner of the most recently completed leg.
    #[schema(value_type = Option<u8>)]
    pub last_leg_winner: Option<PlayerId>,
    /// Winner of the most recently completed set.
    #[schema(value_type = Option<u8>)]
    pub last_set_winner: Option<PlayerId>,
    /// Most recent visit, if any.
    pub last_visit: Option<Visit>,
    /// Every visit since the last reset.
    pub history: Vec<Visit>,
}

impl MatchState {
    /// Fresh match at set 1, leg 1 with player 1 to throw.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            players: [
                PlayerMatchState::fresh(PlayerId::One, config.starting_score()),
                PlayerMatchState::fresh(PlayerId::Two, config.starting_score()),
            ],
            active_player: PlayerId::One,
            leg_starter: PlayerId::One,
            set_number: 1,
            leg_number: 1,
            winner: None,
            last_leg_winner: None,
            last_set_winner: None,
            last_visit: None,
            history: Vec::new(),
        }
    }

    /// True once a winner is set.
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// State of one player.
    pub fn player(&self, id: PlayerId) -> &PlayerMatchState {
        &self.players[id.index()]
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> &mut PlayerMatchState {
        &mut self.players[id.index()]
    }

    /// State of the player due to throw.
    pub fn active(&self) -> &PlayerMatchState {
        self.player(self.active_player)
    }
}
