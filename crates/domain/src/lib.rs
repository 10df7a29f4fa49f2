//! Domain layer for the raid report pipeline.
//!
//! This crate contains:
//! - Raw activity report DTOs and their typed metric accessors
//! - Normalized report and lifetime aggregate models
//! - The activity taxonomy, freshness, classification and normalization services
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::ReportError;
