//! Per-player statistics folded from a match's visit history.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    scoring::checkout::MAX_DOUBLE_OUT_CHECKOUT,
    state::{
        dart::MAX_VISIT_TOTAL,
        game::{PlayerId, Visit},
    },
};

/// Totals for one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PlayerStats {
    /// Player the totals belong to.
    #[schema(value_type = u8)]
    pub player_id: PlayerId,
    /// Visits thrown, busts included.
    pub visits: u32,
    /// Darts thrown, busts included.
    pub darts_thrown: u32,
    /// Points from visits that did not bust.
    pub scored_points: u32,
    /// Busted visits.
    pub busts: u32,
    /// Legs finished.
    pub checkouts: u32,
    /// Visits started on a finishable score.
    pub checkout_attempts: u32,
    /// Best non-bust visit.
    pub highest_visit: u16,
    /// Non-bust visits of exactly 180.
    pub count_180: u32,
    /// Non-bust visits of 140 or more.
    pub count_140_plus: u32,
    /// Non-bust visits of 100 or more.
    pub count_100_plus: u32,
    /// Points per three darts.
    pub three_dart_average: f64,
    /// Checkouts per attempt, as a percentage.
    pub checkout_percentage: f64,
}

impl PlayerStats {
    fn empty(player_id: PlayerId) -> Self {
        Self {
            player_id,
            visits: 0,
            darts_thrown: 0,
            scored_points: 0,
            busts: 0,
            checkouts: 0,
            checkout_attempts: 0,
            highest_visit: 0,
            count_180: 0,
            count_140_plus: 0,
            count_100_plus: 0,
            three_dart_average: 0.0,
            checkout_percentage: 0.0,
        }
    }

    fn record(&mut self, visit: &Visit, double_out: bool) {
        self.visits += 1;
        self.darts_thrown += visit.darts.len() as u32;
        if is_checkout_attempt(visit.remaining_before, double_out) {
            self.checkout_attempts += 1;
        }
        if visit.checkout {
            self.checkouts += 1;
        }
        if visit.bust {
            self.busts += 1;
            return;
        }

        self.scored_points += u32::from(visit.total);
        self.highest_visit = self.highest_visit.max(visit.total);
        if visit.total == MAX_VISIT_TOTAL {
            self.count_180 += 1;
        }
        if visit.total >= 140 {
            self.count_140_plus += 1;
        }
        if visit.total >= 100 {
            self.count_100_plus += 1;
        }
    }

    fn finish(mut self) -> Self {
        if self.darts_thrown > 0 {
            self.three_dart_average =
                f64::from(self.scored_points) / f64::from(self.darts_thrown) * 3.0;
        }
        if self.checkout_attempts > 0 {
            self.checkout_percentage =
                f64::from(self.checkouts) / f64::from(self.checkout_attempts) * 100.0;
        }
        self
    }
}

/// Statistics for both players of a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct MatchStats {
    /// Player 1 totals.
    pub player_1: PlayerStats,
    /// Player 2 totals.
    pub player_2: PlayerStats,
}

/// A visit counts as a checkout attempt when it starts on a score that can be finished
/// in one visit.
fn is_checkout_attempt(remaining_before: u16, double_out: bool) -> bool {
    if remaining_before <= 1 {
        return false;
    }
    let ceiling = if double_out {
        MAX_DOUBLE_OUT_CHECKOUT as u16
    } else {
        MAX_VISIT_TOTAL
    };
    remaining_before <= ceiling
}

/// Recompute both players' statistics from scratch.
pub fn compute_stats(history: &[Visit], double_out: bool) -> MatchStats {
    let mut players = [
        PlayerStats::empty(PlayerId::One),
        PlayerStats::empty(PlayerId::Two),
    ];
    for visit in history {
        players[visit.player_id.index()].record(visit, double_out);
    }
    let [player_1, player_2] = players;
    MatchStats {
        player_1: player_1.finish(),
        player_2: player_2.finish(),
    }
}
