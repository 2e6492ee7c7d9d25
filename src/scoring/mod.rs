//! Read-only scoring views: checkout routes, board geometry and match statistics.

pub mod checkout;
pub mod dartboard;
pub mod stats;
