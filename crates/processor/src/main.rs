use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use domain::services::{ActivityTaxonomy, FreshnessResolver, ManifestLookup};
use raid_report_processor::config::Config;
use raid_report_processor::services::{
    AggregationOrchestrator, RedisManifestLookup, ReportFetcher, ReportPipeline,
};
use raid_report_processor::workers::{sample_pool_metrics, WorkerPool};
use raid_report_processor::{logging, metrics};
use tracing::{info, warn};

const POOL_METRICS_PERIOD: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    logging::init_logging(&config.logging);

    info!("Starting raid report processor v{}", env!("CARGO_PKG_VERSION"));

    metrics::init_metrics(&config.metrics)?;

    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    let manifest: Arc<dyn ManifestLookup> = Arc::new(
        RedisManifestLookup::connect(&config.manifest.redis_url, &config.manifest.key_prefix)
            .await
            .context("connecting to manifest cache")?,
    );

    let orchestrator = Arc::new(AggregationOrchestrator::new(
        pool.clone(),
        Arc::clone(&manifest),
    ));
    let pipeline = Arc::new(ReportPipeline::new(
        Arc::new(ActivityTaxonomy::new()),
        Arc::new(FreshnessResolver::default()),
        manifest,
        orchestrator,
    ));
    let fetcher = Arc::new(ReportFetcher::new(config.upstream.clone())?);

    let workers = Arc::new(WorkerPool::new(pipeline, fetcher, config.workers.clone()));

    tokio::spawn(sample_pool_metrics(
        pool.clone(),
        POOL_METRICS_PERIOD,
        workers.subscribe(),
    ));

    let signal_workers = Arc::clone(&workers);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal_workers.shutdown(),
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    let summary = workers.run().await;
    workers.shutdown();
    pool.close().await;

    info!(processed = summary.total(), "Raid report processor stopped");
    Ok(())
}
