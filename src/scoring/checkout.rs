//! Checkout route search: every way to finish a given score in at most three darts,
//! ranked the way a player would pick them.

use std::{cmp::Ordering, collections::HashSet, sync::Arc};

use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::state::{
    dart::{Dart, MAX_VISIT_TOTAL, scoring_darts},
    game::MatchState,
};

/// Highest score that can be finished in three darts when the last must be a double
/// (T20, T20, DBULL).
pub const MAX_DOUBLE_OUT_CHECKOUT: i32 = 170;
/// Default number of memoized solver inputs kept before inserts stop.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Finishing doubles in order of preference.
const PREFERRED_DOUBLES: [u8; 9] = [20, 16, 18, 10, 8, 12, 6, 4, 2];

/// Number of darts the solver may use, always 1 to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DartBudget(u8);

impl DartBudget {
    /// Three darts, a full visit.
    pub const FULL_VISIT: DartBudget = DartBudget(3);

    /// Clamp any requested budget into 1-3.
    pub fn clamped(darts: u8) -> Self {
        Self(darts.clamp(1, 3))
    }

    /// Number of darts.
    pub fn get(self) -> u8 {
        self.0
    }
}

/// One ordered way of finishing a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CheckoutSuggestion {
    /// Darts in throwing order; the last one finishes.
    pub darts: Vec<Dart>,
    /// Labels of the darts, e.g. `["T20", "D20"]`.
    pub labels: Vec<String>,
    /// Sum of the darts, equal to the score being finished.
    pub total: u16,
}

impl CheckoutSuggestion {
    fn from_route(route: &[Dart]) -> Self {
        Self {
            darts: route.to_vec(),
            labels: route.iter().map(Dart::label).collect(),
            total: route.iter().map(Dart::score).sum(),
        }
    }

    /// Labels joined with commas, the route's identity for dedup and tie-breaks.
    pub fn key(&self) -> String {
        self.labels.join(",")
    }
}

/// Lower is better. `finishing` only matters for the bull.
fn dart_weight(dart: Dart, finishing: bool) -> u32 {
    let value = u32::from(dart.value());
    if dart.is_bull() {
        return match (dart.multiplier(), finishing) {
            (2, true) => PREFERRED_DOUBLES.len() as u32,
            (2, false) => 30,
            _ => 60,
        };
    }
    match dart.multiplier() {
        2 => PREFERRED_DOUBLES
            .iter()
            .position(|&preferred| preferred == dart.value())
            .map(|rank| rank as u32)
            .unwrap_or(15 + (20 - value)),
        3 if value >= 16 => 5 + (20 - value),
        3 => 25 + (20 - value),
        _ => 40 + (20 - value),
    }
}

#[derive(Debug)]
struct RankedRoute {
    darts: u8,
    finish_weight: u32,
    setup_weight: u32,
    suggestion: CheckoutSuggestion,
    key: String,
}

impl RankedRoute {
    fn new(route: &[Dart]) -> Self {
        let (finish, setup) = route.split_last().map_or((Dart::MISS, &[][..]), |(f, s)| (*f, s));
        let suggestion = CheckoutSuggestion::from_route(route);
        Self {
            darts: route.len() as u8,
            finish_weight: dart_weight(finish, true),
            setup_weight: setup.iter().map(|dart| dart_weight(*dart, false)).sum(),
            key: suggestion.key(),
            suggestion,
        }
    }

    fn cmp_rank(&self, other: &Self) -> Ordering {
        self.darts
            .cmp(&other.darts)
            .then(self.finish_weight.cmp(&other.finish_weight))
            .then(self.setup_weight.cmp(&other.setup_weight))
            .then_with(|| self.key.cmp(&other.key))
    }
}

fn finishes(dart: Dart, double_out: bool) -> bool {
    !double_out || dart.is_double()
}

/// Enumerate, rank and deduplicate every route finishing `remaining` within `budget`.
///
/// Callers usually want [`CheckoutSolver::suggest`], which memoizes this.
pub fn rank_routes(remaining: i32, double_out: bool, budget: DartBudget) -> Vec<CheckoutSuggestion> {
    let ceiling = if double_out {
        MAX_DOUBLE_OUT_CHECKOUT
    } else {
        i32::from(MAX_VISIT_TOTAL)
    };
    if remaining <= 0 || remaining > ceiling {
        return Vec::new();
    }

    let darts: Vec<Dart> = scoring_darts().collect();
    let max_darts = budget.get();
    let mut routes = Vec::new();

    for &first in &darts {
        let left = remaining - i32::from(first.score());
        if left == 0 && finishes(first, double_out) {
            routes.push(RankedRoute::new(&[first]));
        }
        if max_darts < 2 || left <= 0 {
            continue;
        }
        for &second in &darts {
            let left = left - i32::from(second.score());
            if left == 0 && finishes(second, double_out) {
                routes.push(RankedRoute::new(&[first, second]));
            }
            if max_darts < 3 || left <= 0 {
                continue;
            }
            for &third in &darts {
                if left == i32::from(third.score()) && finishes(third, double_out) {
                    routes.push(RankedRoute::new(&[first, second, third]));
                }
            }
        }
    }

    routes.sort_by(RankedRoute::cmp_rank);

    let mut seen = HashSet::new();
    routes
        .into_iter()
        .filter(|route| seen.insert(route.key.clone()))
        .map(|route| route.suggestion)
        .collect()
}

type CacheKey = (i32, bool, DartBudget);

/// Memoizing front end to [`rank_routes`], safe to share between threads.
///
/// The full ranked list is cached per `(remaining, double_out, budget)`; `limit` only
/// truncates on the way out. The cache never evicts: once `capacity` keys are held,
/// further misses are computed and returned without being stored.
#[derive(Debug)]
pub struct CheckoutSolver {
    cache: DashMap<CacheKey, Arc<[CheckoutSuggestion]>>,
    capacity: usize,
}

impl Default for CheckoutSolver {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl CheckoutSolver {
    /// Solver whose cache holds at most `capacity` inputs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: DashMap::new(),
            capacity,
        }
    }

    /// Up to `limit` best routes finishing `remaining`.
    ///
    /// Non-positive `remaining` or `limit`, and scores above the finishable ceiling, yield
    /// an empty list rather than an error.
    pub fn suggest(
        &self,
        remaining: i32,
        double_out: bool,
        budget: DartBudget,
        limit: usize,
    ) -> Vec<CheckoutSuggestion> {
        if remaining <= 0 || limit == 0 {
            return Vec::new();
        }
        if double_out && remaining > MAX_DOUBLE_OUT_CHECKOUT {
            return Vec::new();
        }
        if !double_out && remaining > i32::from(MAX_VISIT_TOTAL) {
            return Vec::new();
        }

        let routes = self.ranked(remaining, double_out, budget);
        routes.iter().take(limit).cloned().collect()
    }

    /// Routes for the player due to throw, under the match's own finishing rule.
    ///
    /// A finished match has nobody to suggest for and yields an empty list.
    pub fn suggest_for_state(
        &self,
        state: &MatchState,
        budget: DartBudget,
        limit: usize,
    ) -> Vec<CheckoutSuggestion> {
        if state.is_over() {
            return Vec::new();
        }
        self.suggest(
            i32::from(state.active().remaining),
            state.config.double_out(),
            budget,
            limit,
        )
    }

    /// Number of memoized inputs.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    fn ranked(&self, remaining: i32, double_out: bool, budget: DartBudget) -> Arc<[CheckoutSuggestion]> {
        let key = (remaining, double_out, budget);
        if let Some(hit) = self.cache.get(&key) {
            return Arc::clone(&hit);
        }

        if self.cache.len() >= self.capacity {
            warn!(
                remaining,
                double_out,
                capacity = self.capacity,
                "checkout cache full; computing without memoizing"
            );
            return rank_routes(remaining, double_out, budget).into();
        }

        let entry = self.cache.entry(key).or_insert_with(|| {
            let routes = rank_routes(remaining, double_out, budget);
            debug!(
                remaining,
                double_out,
                max_darts = budget.get(),
                routes = routes.len(),
                "checkout routes computed"
            );
            routes.into()
        });
        Arc::clone(&entry)
    }
}
