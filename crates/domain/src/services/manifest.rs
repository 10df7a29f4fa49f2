//! Manifest lookup abstraction.
//!
//! Resolves a decimal hash key to display metadata. The production adapter
//! is backed by Redis and lives in the processor crate; [`InMemoryManifest`]
//! serves tests and local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ReportError;
use crate::models::manifest::ManifestEntry;

/// Key/value lookup of manifest entries.
#[async_trait::async_trait]
pub trait ManifestLookup: Send + Sync {
    /// Fetch the entry stored under a decimal hash key.
    ///
    /// A missing key is a [`ReportError::ManifestLookup`].
    async fn lookup(&self, key: &str) -> Result<ManifestEntry, ReportError>;
}

/// HashMap-backed manifest.
#[derive(Debug, Default)]
pub struct InMemoryManifest {
    entries: HashMap<String, ManifestEntry>,
    lookups: AtomicUsize,
    /// Whether to fail every lookup.
    pub simulate_failure: bool,
}

impl InMemoryManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, hash: i64, entry: ManifestEntry) -> Self {
        self.insert(hash, entry);
        self
    }

    pub fn insert(&mut self, hash: i64, entry: ManifestEntry) {
        self.entries.insert(hash.to_string(), entry);
    }

    /// Number of lookups served so far, failures included.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ManifestLookup for InMemoryManifest {
    async fn lookup(&self, key: &str) -> Result<ManifestEntry, ReportError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.simulate_failure {
            tracing::warn!(key = %key, "In-memory manifest simulating failure");
            return Err(ReportError::manifest(key, "simulated failure"));
        }

        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| ReportError::manifest(key, "key not found"))
    }
}
