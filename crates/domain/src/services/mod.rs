//! Domain services for the raid report pipeline.
//!
//! Services contain the normalization and classification rules that operate
//! on domain models.

pub mod classification;
pub mod freshness;
pub mod manifest;
pub mod normalizer;
pub mod taxonomy;

pub use classification::{classify, Classification};
pub use freshness::{Era, EraBoundaries, FreshnessInput, FreshnessResolver};
pub use manifest::{InMemoryManifest, ManifestLookup};
pub use normalizer::{group_participants, Normalizer};
pub use taxonomy::ActivityTaxonomy;
