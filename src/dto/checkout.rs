//! Query strings and responses of the checkout routes.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::scoring::checkout::{CheckoutSuggestion, DartBudget};

fn default_true() -> bool {
    true
}

fn default_max_darts() -> u8 {
    DartBudget::FULL_VISIT.get()
}

fn default_limit() -> usize {
    5
}

/// Checkout lookup for an arbitrary score.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct CheckoutQuery {
    /// Score to finish. Non-positive or unreachable scores return no routes.
    pub remaining: i32,
    /// Whether the last dart must be a double. Defaults to true.
    #[serde(default = "default_true")]
    pub double_out: bool,
    /// Darts available, 1-3. Defaults to 3.
    #[serde(default = "default_max_darts")]
    #[validate(range(min = 1, max = 3))]
    pub max_darts: u8,
    /// Routes to return, 1-50. Defaults to 5.
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: usize,
}

/// Checkout lookup for the player due to throw in the live match.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct MatchCheckoutQuery {
    /// Darts available, 1-3. Defaults to 3.
    #[serde(default = "default_max_darts")]
    #[validate(range(min = 1, max = 3))]
    pub max_darts: u8,
    /// Routes to return, 1-50. Defaults to 5.
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: usize,
}

/// Ranked finishing routes for one score.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Score the routes finish.
    pub remaining: i32,
    /// Whether the routes end on a double.
    pub double_out: bool,
    /// Best route first.
    pub suggestions: Vec<CheckoutSuggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_capped_at_fifty() {
        let query = CheckoutQuery {
            remaining: 40,
            double_out: true,
            max_darts: 3,
            limit: 50,
        };
        assert!(query.validate().is_ok());

        let query = CheckoutQuery {
            limit: 51,
            ..query
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_budget() {
        let query = MatchCheckoutQuery {
            max_darts: 4,
            limit: 1,
        };
        assert!(query.validate().is_err());
        let query = MatchCheckoutQuery {
            max_darts: 0,
            limit: 1,
        };
        assert!(query.validate().is_err());
    }
}
