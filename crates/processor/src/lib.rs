//! Raid report processor library.
//!
//! Exposes the processor's building blocks so integration tests can drive
//! them against a real database.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod services;
pub mod workers;
