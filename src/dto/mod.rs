//! Transport payloads exchanged over HTTP.

pub mod checkout;
pub mod dartboard;
pub mod game;
/// Health check payload.
pub mod health;
/// Match phase as shown to clients.
pub mod phase;
pub mod validation;
