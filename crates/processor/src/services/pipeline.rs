//! One report end to end: normalize, then persist.

use std::sync::Arc;

use domain::models::RawActivityReport;
use domain::services::{ActivityTaxonomy, FreshnessResolver, ManifestLookup, Normalizer};
use domain::ReportError;

use super::aggregation::{PersistOutcome, ReportStore};

pub struct ReportPipeline {
    normalizer: Normalizer,
    store: Arc<dyn ReportStore>,
}

impl ReportPipeline {
    pub fn new(
        taxonomy: Arc<ActivityTaxonomy>,
        freshness: Arc<FreshnessResolver>,
        manifest: Arc<dyn ManifestLookup>,
        store: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            normalizer: Normalizer::new(taxonomy, freshness, manifest),
            store,
        }
    }

    pub async fn process(&self, raw: &RawActivityReport) -> Result<PersistOutcome, ReportError> {
        let report = self.normalizer.normalize(raw).await?;
        self.store.persist(&report).await
    }
}
