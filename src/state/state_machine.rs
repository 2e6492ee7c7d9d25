use thiserror::Error;
use tracing::{debug, info};

use crate::state::{
    dart::{Dart, DartError, MAX_VISIT_TOTAL},
    game::{MatchConfig, MatchState, PlayerId, Visit},
};

/// Most darts a player may throw in one visit.
pub const MAX_DARTS_PER_VISIT: usize = 3;

/// High-level phases a match can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Visits are being accepted.
    InProgress,
    /// A player has won; only a reset leaves this phase.
    MatchOver,
}

/// Errors returned by match transitions. The state is left untouched on every one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The match already has a winner.
    #[error("match is already over")]
    AlreadyOver,
    /// The submitting player is not the one due to throw.
    #[error("it is player {active}'s turn, not player {submitted}'s")]
    NotYourTurn {
        /// Player due to throw.
        active: u8,
        /// Player named by the submission.
        submitted: u8,
    },
    /// A dart failed validation.
    #[error("invalid dart #{index}: {source}")]
    InvalidDart {
        /// 1-based position of the dart in the visit.
        index: usize,
        /// Underlying validation failure.
        #[source]
        source: DartError,
    },
    /// More than three darts were submitted.
    #[error("a visit has at most 3 darts (got {0})")]
    TooManyDarts(usize),
    /// The visit total is outside 0-180.
    #[error("visit total {0} is outside 0-180")]
    VisitTotalOutOfRange(u16),
    /// Darts were listed after the one that already reached the remaining score.
    #[error("dart #{index} reaches the remaining score but more darts follow it")]
    DartsAfterCheckout {
        /// 1-based position of the dart that reached the remaining score.
        index: usize,
    },
    /// Undo requested with no prior snapshot.
    #[error("nothing to undo")]
    NothingToUndo,
    /// Match configuration rejected.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}

impl MatchError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::AlreadyOver => "ALREADY_OVER",
            MatchError::NotYourTurn { .. } => "NOT_YOUR_TURN",
            MatchError::InvalidDart { .. } => "INVALID_DART",
            MatchError::TooManyDarts(_) => "TOO_MANY_DARTS",
            MatchError::VisitTotalOutOfRange(_) => "VISIT_TOTAL_OUT_OF_RANGE",
            MatchError::DartsAfterCheckout { .. } => "DARTS_AFTER_CHECKOUT",
            MatchError::NothingToUndo => "NOTHING_TO_UNDO",
            MatchError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }

    /// True for sequencing conflicts, false for rejected input.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            MatchError::AlreadyOver | MatchError::NotYourTurn { .. } | MatchError::NothingToUndo
        )
    }
}

/// How a visit was scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOutcome {
    /// Score subtracted, leg continues.
    Scored,
    /// Score reverted.
    Bust,
    /// Leg finished.
    Checkout,
}

/// Classify a visit total against the score it was thrown from.
pub fn classify_visit(
    remaining_before: u16,
    total: u16,
    last_dart: Dart,
    double_out: bool,
) -> VisitOutcome {
    let proposed = i32::from(remaining_before) - i32::from(total);
    match proposed {
        p if p < 0 => VisitOutcome::Bust,
        // With a double required, 1 can never be finished.
        1 if double_out => VisitOutcome::Bust,
        0 if !double_out || last_dart.is_double() => VisitOutcome::Checkout,
        0 => VisitOutcome::Bust,
        _ => VisitOutcome::Scored,
    }
}

/// Owns the authoritative [`MatchState`] of one match and the undo stack behind it.
#[derive(Debug, Clone)]
pub struct MatchStateMachine {
    state: MatchState,
    undo_stack: Vec<MatchState>,
}

impl Default for MatchStateMachine {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl MatchStateMachine {
    /// Create a state machine holding a fresh match.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            state: MatchState::new(config),
            undo_stack: Vec::new(),
        }
    }

    /// Inspect the current snapshot.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// [`MatchPhase::MatchOver`] once a winner is set.
    pub fn phase(&self) -> MatchPhase {
        if self.state.is_over() {
            MatchPhase::MatchOver
        } else {
            MatchPhase::InProgress
        }
    }

    /// Number of snapshots available to [`MatchStateMachine::undo`].
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Validate and apply one visit for the active player.
    ///
    /// Either the whole visit is applied and the new snapshot returned, or an error is
    /// returned and nothing changes.
    pub fn submit_visit(
        &mut self,
        darts: &[Dart],
        expected_player: Option<PlayerId>,
    ) -> Result<&MatchState, MatchError> {
        let next = self.compute_visit(darts, expected_player)?;
        let previous = std::mem::replace(&mut self.state, next);
        self.undo_stack.push(previous);
        Ok(&self.state)
    }

    /// Validate raw `(value, multiplier)` pairs and submit them as a visit.
    pub fn submit_raw_visit(
        &mut self,
        raw: &[(i64, i64)],
        expected_player: Option<PlayerId>,
    ) -> Result<&MatchState, MatchError> {
        let darts = parse_darts(raw)?;
        self.submit_visit(&darts, expected_player)
    }

    /// Restore the snapshot from before the last accepted visit.
    pub fn undo(&mut self) -> Result<&MatchState, MatchError> {
        let previous = self.undo_stack.pop().ok_or(MatchError::NothingToUndo)?;
        self.state = previous;
        debug!(remaining_undo = self.undo_stack.len(), "visit undone");
        Ok(&self.state)
    }

    /// Discard the match and its history. A supplied config replaces the current one.
    pub fn reset(&mut self, config: Option<MatchConfig>) -> &MatchState {
        let config = config.unwrap_or(self.state.config);
        self.state = MatchState::new(config);
        self.undo_stack.clear();
        info!(
            starting_score = config.starting_score(),
            double_out = config.double_out(),
            legs_to_win_set = config.legs_to_win_set(),
            sets_to_win_match = config.sets_to_win_match(),
            "match reset"
        );
        &self.state
    }

    /// Build the snapshot that results from a visit without installing it.
    fn compute_visit(
        &self,
        darts: &[Dart],
        expected_player: Option<PlayerId>,
    ) -> Result<MatchState, MatchError> {
        let current = &self.state;
        if current.is_over() {
            return Err(MatchError::AlreadyOver);
        }

        let active_id = current.active_player;
        if let Some(expected) = expected_player.filter(|expected| *expected != active_id) {
            return Err(MatchError::NotYourTurn {
                active: active_id.number(),
                submitted: expected.number(),
            });
        }

        let darts: Vec<Dart> = if darts.is_empty() {
            vec![Dart::MISS]
        } else {
            darts.to_vec()
        };
        if darts.len() > MAX_DARTS_PER_VISIT {
            return Err(MatchError::TooManyDarts(darts.len()));
        }
        for (index, dart) in darts.iter().enumerate() {
            Dart::new(dart.value(), dart.multiplier()).map_err(|source| {
                MatchError::InvalidDart {
                    index: index + 1,
                    source,
                }
            })?;
        }

        let total: u16 = darts.iter().map(Dart::score).sum();
        if total > MAX_VISIT_TOTAL {
            return Err(MatchError::VisitTotalOutOfRange(total));
        }

        let remaining_before = current.active().remaining;
        let mut running = 0u16;
        for (index, dart) in darts[..darts.len() - 1].iter().enumerate() {
            running += dart.score();
            if running >= remaining_before {
                return Err(MatchError::DartsAfterCheckout { index: index + 1 });
            }
        }

        let last_dart = darts[darts.len() - 1];
        let outcome = classify_visit(remaining_before, total, last_dart, current.config.double_out());
        let remaining_after = match outcome {
            VisitOutcome::Bust => remaining_before,
            VisitOutcome::Checkout => 0,
            VisitOutcome::Scored => remaining_before - total,
        };

        let visit = Visit {
            player_id: active_id,
            darts,
            total,
            bust: outcome == VisitOutcome::Bust,
            checkout: outcome == VisitOutcome::Checkout,
            remaining_before,
            remaining_after,
            set_number: current.set_number,
            leg_number: current.leg_number,
        };
        debug!(
            player = active_id.number(),
            total,
            remaining_before,
            remaining_after,
            outcome = ?outcome,
            "visit accepted"
        );

        let mut next = current.clone();
        next.player_mut(active_id).remaining = remaining_after;
        next.history.push(visit.clone());
        next.last_visit = Some(visit);

        if outcome == VisitOutcome::Checkout {
            award_leg(&mut next, active_id);
        } else {
            next.active_player = active_id.other();
        }

        Ok(next)
    }
}

/// Credit a finished leg to `winner` and roll the match forward to the next leg, set or end.
fn award_leg(state: &mut MatchState, winner: PlayerId) {
    let config = state.config;
    state.last_leg_winner = Some(winner);

    let player = state.player_mut(winner);
    player.legs_won += 1;
    let set_won = player.legs_won >= config.legs_to_win_set();
    if set_won {
        player.sets_won += 1;
    }
    let sets_won = player.sets_won;

    if set_won {
        for player in state.players.iter_mut() {
            player.legs_won = 0;
        }
        state.last_set_winner = Some(winner);
        info!(player = winner.number(), sets_won, "set won");

        if sets_won >= config.sets_to_win_match() {
            state.winner = Some(winner);
            state.active_player = winner;
            info!(player = winner.number(), "match won");
            return;
        }

        state.set_number += 1;
        state.leg_number = 1;
    } else {
        state.leg_number += 1;
        info!(player = winner.number(), "leg won");
    }

    state.leg_starter = state.leg_starter.other();
    state.active_player = state.leg_starter;
    for player in state.players.iter_mut() {
        player.remaining = config.starting_score();
    }
}

/// Validate raw `(value, multiplier)` pairs into darts, reporting the first bad one.
pub fn parse_darts(raw: &[(i64, i64)]) -> Result<Vec<Dart>, MatchError> {
    raw.iter()
        .enumerate()
        .map(|(index, &(value, multiplier))| {
            Dart::from_raw(value, multiplier).map_err(|source| MatchError::InvalidDart {
                index: index + 1,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::state::dart::scoring_darts;

    fn d(value: u8, multiplier: u8) -> Dart {
        Dart::new(value, multiplier).unwrap()
    }

    fn machine(starting_score: u16, double_out: bool, legs: u8, sets: u8) -> MatchStateMachine {
        MatchStateMachine::new(MatchConfig::new(starting_score, double_out, legs, sets).unwrap())
    }

    #[test]
    fn initial_state_is_in_progress() {
        let sm = MatchStateMachine::default();
        assert_eq!(sm.phase(), MatchPhase::InProgress);
        assert_eq!(sm.state().active().remaining, 501);
        assert_eq!(sm.undo_depth(), 0);
    }

    #[test]
    fn scoring_visit_subtracts_and_passes_turn() {
        let mut sm = MatchStateMachine::default();
        let state = sm.submit_visit(&[d(20, 3), d(20, 3), d(20, 3)], None).unwrap();
        assert_eq!(state.player(PlayerId::One).remaining, 321);
        assert_eq!(state.active_player, PlayerId::Two);
        let visit = state.last_visit.as_ref().unwrap();
        assert_eq!(visit.total, 180);
        assert!(!visit.bust && !visit.checkout);
    }

    #[test]
    fn empty_visit_is_one_miss() {
        let mut sm = MatchStateMachine::default();
        let state = sm.submit_visit(&[], None).unwrap();
        let visit = state.last_visit.as_ref().unwrap();
        assert_eq!(visit.darts, vec![Dart::MISS]);
        assert_eq!(visit.total, 0);
        assert_eq!(state.active_player, PlayerId::Two);
    }

    #[test]
    fn too_many_darts_rejected() {
        let mut sm = MatchStateMachine::default();
        let err = sm
            .submit_visit(&[d(1, 1), d(1, 1), d(1, 1), d(1, 1)], None)
            .unwrap_err();
        assert_eq!(err, MatchError::TooManyDarts(4));
        assert_eq!(err.code(), "TOO_MANY_DARTS");
        assert!(sm.state().history.is_empty());
    }

    #[test]
    fn raw_darts_are_validated() {
        let mut sm = MatchStateMachine::default();
        let err = sm.submit_raw_visit(&[(20, 1), (25, 3)], None).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InvalidDart {
                index: 2,
                source: DartError::TrebleBull
            }
        ));
        assert_eq!(sm.undo_depth(), 0);

        let err = sm.submit_raw_visit(&[(300, 1)], None).unwrap_err();
        assert_eq!(err.code(), "INVALID_DART");
        assert!(sm.state().history.is_empty());
    }

    #[test]
    fn out_of_turn_submission_rejected() {
        let mut sm = MatchStateMachine::default();
        let err = sm.submit_visit(&[d(5, 1)], Some(PlayerId::Two)).unwrap_err();
        assert_eq!(
            err,
            MatchError::NotYourTurn {
                active: 1,
                submitted: 2
            }
        );
        assert!(err.is_conflict());
        sm.submit_visit(&[d(5, 1)], Some(PlayerId::One)).unwrap();
    }

    #[test]
    fn overshoot_is_bust_and_turn_passes() {
        let mut sm = machine(10, true, 1, 1);
        let state = sm.submit_visit(&[d(4, 3)], None).unwrap();
        let visit = state.last_visit.as_ref().unwrap();
        assert!(visit.bust);
        assert_eq!(visit.remaining_after, 10);
        assert_eq!(state.player(PlayerId::One).remaining, 10);
        assert_eq!(state.active_player, PlayerId::Two);
    }

    #[test]
    fn leaving_one_with_double_out_is_bust() {
        let mut sm = machine(41, true, 1, 1);
        let state = sm.submit_visit(&[d(20, 2)], None).unwrap();
        assert!(state.last_visit.as_ref().unwrap().bust);
        assert_eq!(state.player(PlayerId::One).remaining, 41);
    }

    #[test]
    fn leaving_one_without_double_out_is_fine() {
        let mut sm = machine(41, false, 1, 1);
        let state = sm.submit_visit(&[d(20, 2)], None).unwrap();
        assert_eq!(state.player(PlayerId::One).remaining, 1);
    }

    #[test]
    fn finishing_on_single_with_double_out_is_bust() {
        let mut sm = machine(20, true, 1, 1);
        let state = sm.submit_visit(&[d(20, 1)], None).unwrap();
        let visit = state.last_visit.as_ref().unwrap();
        assert!(visit.bust && !visit.checkout);
        assert!(!state.is_over());
    }

    #[test]
    fn finishing_on_single_without_double_out_checks_out() {
        let mut sm = machine(20, false, 1, 1);
        let state = sm.submit_visit(&[d(20, 1)], None).unwrap();
        assert!(state.last_visit.as_ref().unwrap().checkout);
        assert_eq!(state.winner, Some(PlayerId::One));
    }

    #[test]
    fn darts_after_checkout_rejected() {
        let mut sm = machine(40, true, 1, 1);
        let err = sm.submit_visit(&[d(20, 2), d(1, 1)], None).unwrap_err();
        assert_eq!(err, MatchError::DartsAfterCheckout { index: 1 });
        // Overshooting before the last dart is just as impossible.
        let err = sm.submit_visit(&[d(20, 3), Dart::MISS], None).unwrap_err();
        assert_eq!(err.code(), "DARTS_AFTER_CHECKOUT");
        assert!(sm.state().history.is_empty());
    }

    #[test]
    fn bull_finish_counts_as_double() {
        let mut sm = machine(50, true, 1, 1);
        let state = sm.submit_visit(&[Dart::DOUBLE_BULL], None).unwrap();
        assert_eq!(state.winner, Some(PlayerId::One));
    }

    #[test]
    fn leg_win_alternates_starter_and_resets_scores() {
        let mut sm = machine(40, true, 3, 1);
        sm.submit_visit(&[d(10, 1)], None).unwrap(); // P1 -> 30
        let state = sm.submit_visit(&[d(20, 2)], None).unwrap(); // P2 checks out
        assert_eq!(state.player(PlayerId::Two).legs_won, 1);
        assert_eq!(state.last_leg_winner, Some(PlayerId::Two));
        assert_eq!(state.leg_number, 2);
        assert_eq!(state.leg_starter, PlayerId::Two);
        assert_eq!(state.active_player, PlayerId::Two);
        assert_eq!(state.player(PlayerId::One).remaining, 40);
        assert_eq!(state.player(PlayerId::Two).remaining, 40);

        // Leg 2: P2 starts, P2 wins again; next leg starter alternates back to P1.
        let state = sm.submit_visit(&[d(20, 2)], None).unwrap();
        assert_eq!(state.player(PlayerId::Two).legs_won, 2);
        assert_eq!(state.leg_starter, PlayerId::One);
        assert_eq!(state.active_player, PlayerId::One);
    }

    #[test]
    fn set_win_resets_legs_and_advances_set() {
        let mut sm = machine(40, true, 2, 2);
        sm.submit_visit(&[d(20, 2)], None).unwrap(); // P1 leg 1
        sm.submit_visit(&[Dart::MISS], None).unwrap(); // P2 starts leg 2
        let state = sm.submit_visit(&[d(20, 2)], None).unwrap(); // P1 leg 2 -> set
        assert_eq!(state.player(PlayerId::One).sets_won, 1);
        assert_eq!(state.player(PlayerId::One).legs_won, 0);
        assert_eq!(state.player(PlayerId::Two).legs_won, 0);
        assert_eq!(state.last_set_winner, Some(PlayerId::One));
        assert_eq!(state.set_number, 2);
        assert_eq!(state.leg_number, 1);
        assert!(!state.is_over());
        assert_eq!(state.player(PlayerId::Two).remaining, 40);
    }

    #[test]
    fn match_win_freezes_active_player() {
        let mut sm = machine(40, true, 1, 1);
        sm.submit_visit(&[d(10, 1)], None).unwrap();
        let state = sm.submit_visit(&[d(20, 2)], None).unwrap();
        assert_eq!(state.winner, Some(PlayerId::Two));
        assert_eq!(state.active_player, PlayerId::Two);
        assert_eq!(state.player(PlayerId::Two).sets_won, 1);
        assert_eq!(sm.phase(), MatchPhase::MatchOver);

        let err = sm.submit_visit(&[d(1, 1)], None).unwrap_err();
        assert_eq!(err, MatchError::AlreadyOver);
    }

    #[test]
    fn undo_restores_exact_snapshot() {
        let mut sm = machine(40, true, 1, 1);
        sm.submit_visit(&[d(10, 1)], None).unwrap();
        let before = sm.state().clone();
        sm.submit_visit(&[d(20, 2)], None).unwrap();
        assert!(sm.state().is_over());

        let restored = sm.undo().unwrap();
        assert_eq!(*restored, before);
        assert_eq!(sm.phase(), MatchPhase::InProgress);
        sm.undo().unwrap();
        assert_eq!(sm.undo().unwrap_err(), MatchError::NothingToUndo);
    }

    #[test]
    fn reset_replaces_config_and_clears_undo() {
        let mut sm = MatchStateMachine::default();
        sm.submit_visit(&[d(20, 1)], None).unwrap();
        let config = MatchConfig::new(301, false, 2, 3).unwrap();
        let state = sm.reset(Some(config));
        assert_eq!(state.config, config);
        assert_eq!(state.player(PlayerId::One).remaining, 301);
        assert!(state.history.is_empty());
        assert_eq!(sm.undo_depth(), 0);

        // A later reset without config keeps the replacement.
        let state = sm.reset(None);
        assert_eq!(state.config, config);
    }

    #[test]
    fn history_tracks_set_and_leg() {
        let mut sm = machine(40, true, 2, 1);
        sm.submit_visit(&[d(20, 2)], None).unwrap();
        sm.submit_visit(&[d(5, 1)], None).unwrap();
        let history = &sm.state().history;
        assert_eq!((history[0].set_number, history[0].leg_number), (1, 1));
        assert_eq!((history[1].set_number, history[1].leg_number), (1, 2));
        assert_eq!(history[1].player_id, PlayerId::Two);
    }

    fn dart_strategy() -> impl Strategy<Value = Dart> {
        let mut darts: Vec<Dart> = scoring_darts().collect();
        darts.push(Dart::MISS);
        prop::sample::select(darts)
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

        #[test]
        fn visits_respect_scoring_invariants(
            visits in prop::collection::vec(prop::collection::vec(dart_strategy(), 0..=3), 1..40),
            double_out in any::<bool>(),
        ) {
            let mut sm = MatchStateMachine::new(MatchConfig::new(101, double_out, 2, 2).unwrap());
            for darts in visits {
                let before = sm.state().clone();
                match sm.submit_visit(&darts, None) {
                    Ok(state) => {
                        let visit = state.last_visit.clone().unwrap();
                        if visit.bust {
                            prop_assert_eq!(visit.remaining_after, visit.remaining_before);
                        } else {
                            prop_assert!(visit.remaining_after <= visit.remaining_before);
                        }
                        if double_out {
                            prop_assert_ne!(visit.remaining_after, 1);
                        }
                        if visit.checkout {
                            prop_assert_eq!(visit.remaining_after, 0);
                            let last = visit.darts.last().unwrap();
                            prop_assert!(!double_out || last.is_double());
                        }
                        let after = state.clone();
                        prop_assert_eq!(sm.undo().unwrap(), &before);
                        sm.submit_visit(&darts, None).unwrap();
                        prop_assert_eq!(sm.state(), &after);
                    }
                    Err(_) => prop_assert_eq!(sm.state(), &before),
                }
            }
        }
    }
}
