//! Processor services: adapters for the external collaborators and the
//! transactional report writer.

pub mod aggregation;
pub mod manifest_cache;
pub mod pipeline;
pub mod report_fetcher;

pub use aggregation::{AggregationOrchestrator, PersistOutcome, ReportStore};
pub use manifest_cache::RedisManifestLookup;
pub use pipeline::ReportPipeline;
pub use report_fetcher::{FetchError, ReportFetcher, ReportSource};
