//! Persistence layer for the raid report pipeline.
//!
//! This crate contains:
//! - Database connection management and embedded migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Query duration metrics

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
