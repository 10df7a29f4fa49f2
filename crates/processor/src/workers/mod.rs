//! Concurrent report processing.

pub mod pool;

pub use pool::{PoolSummary, WorkerPool};

use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::watch;

/// Samples connection pool gauges until shutdown is signalled.
pub async fn sample_pool_metrics(
    pool: PgPool,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = interval.tick() => persistence::metrics::record_pool_metrics(&pool),
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
}
