//! Library crate for darts-501-back, exposing modules for binaries and integration tests.

/// Configuration loading.
pub mod config;
/// Request and response payloads.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// HTTP routers.
pub mod routes;
pub mod scoring;
/// Route logic.
pub mod services;
pub mod state;
