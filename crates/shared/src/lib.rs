//! Shared utilities and common types for the raid report pipeline.
//!
//! This crate provides common functionality used across all other crates:
//! - Blob codec (JSON + zstd) for persisted reports
//! - Fixed Pacific-time instants used by the game calendar
//! - Validation of loosely-typed numeric metrics and timestamps

pub mod codec;
pub mod game_time;
pub mod validation;
