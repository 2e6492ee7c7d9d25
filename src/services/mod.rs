/// Checkout suggestion lookups.
pub mod checkout_service;
/// Calibration storage and pixel scoring.
pub mod dartboard_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Live match transitions and statistics.
pub mod match_service;
