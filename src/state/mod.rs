//! Shared application state and the core match, dart and calibration model.

/// Per-camera board calibrations.
pub mod calibration;
pub mod dart;
/// Match snapshot types.
pub mod game;
/// Match transitions and their errors.
pub mod state_machine;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::AppConfig,
    scoring::checkout::CheckoutSolver,
    state::{calibration::CalibrationStore, state_machine::MatchStateMachine},
};

/// Handle to [`AppState`] injected into every route.
pub type SharedState = Arc<AppState>;

/// Central application state: the live match, per-camera calibrations and the memoizing
/// checkout solver.
pub struct AppState {
    game: RwLock<MatchStateMachine>,
    calibrations: CalibrationStore,
    checkout: CheckoutSolver,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The match starts fresh with the configured rules.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            game: RwLock::new(MatchStateMachine::new(config.match_config())),
            calibrations: CalibrationStore::new(),
            checkout: CheckoutSolver::with_capacity(config.checkout_cache_capacity()),
            config,
        })
    }

    /// Lock guarding the single match instance. Writers hold it across validate and apply.
    pub fn game(&self) -> &RwLock<MatchStateMachine> {
        &self.game
    }

    /// Calibrations keyed by camera identifier.
    pub fn calibrations(&self) -> &CalibrationStore {
        &self.calibrations
    }

    /// Shared checkout solver and its cache.
    pub fn checkout(&self) -> &CheckoutSolver {
        &self.checkout
    }

    /// Configuration the state was built from.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
