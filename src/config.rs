//! Application-level configuration loading: default match rules, solver cache size and
//! ring proportions.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    scoring::checkout::DEFAULT_CACHE_CAPACITY,
    state::{
        calibration::RingRatios,
        game::{MatchConfig, RawMatchConfig},
    },
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "DARTS_BACK_CONFIG_PATH";

#[derive(Debug, Clone, Copy)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    match_config: MatchConfig,
    checkout_cache_capacity: usize,
    default_rings: RingRatios,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        starting_score = app_config.match_config.starting_score(),
                        double_out = app_config.match_config.double_out(),
                        checkout_cache_capacity = app_config.checkout_cache_capacity,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document. Missing fields take their defaults; an invalid match
    /// config or ring set is replaced by the default one.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Rules a fresh match starts with.
    pub fn match_config(&self) -> MatchConfig {
        self.match_config
    }

    /// Maximum number of memoized checkout inputs.
    pub fn checkout_cache_capacity(&self) -> usize {
        self.checkout_cache_capacity
    }

    /// Ring proportions for calibrations that do not supply their own.
    pub fn default_rings(&self) -> RingRatios {
        self.default_rings
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            checkout_cache_capacity: DEFAULT_CACHE_CAPACITY,
            default_rings: RingRatios::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(rename = "match", default)]
    match_config: Option<RawMatchConfig>,
    #[serde(default)]
    checkout_cache_capacity: Option<usize>,
    #[serde(default)]
    default_rings: Option<RingRatios>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let match_config = match value.match_config.map(MatchConfig::try_from) {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                warn!(error = %err, "invalid match config; using defaults");
                MatchConfig::default()
            }
            None => MatchConfig::default(),
        };
        let default_rings = match value.default_rings.map(RingRatios::validated) {
            Some(Ok(rings)) => rings,
            Some(Err(err)) => {
                warn!(error = %err, "invalid default rings; using standard proportions");
                RingRatios::default()
            }
            None => RingRatios::default(),
        };
        Self {
            match_config,
            checkout_cache_capacity: value
                .checkout_cache_capacity
                .unwrap_or(DEFAULT_CACHE_CAPACITY),
            default_rings,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
