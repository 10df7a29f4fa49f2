//! Fixed-size worker pool over a range of instance ids.
//!
//! A producer feeds ids into a bounded channel; each worker takes one id at
//! a time and runs fetch, normalize and persist for it. Failures are logged
//! and counted, never retried here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};

use crate::config::WorkerConfig;
use crate::metrics::{record_report, ReportOutcome};
use crate::services::aggregation::PersistOutcome;
use crate::services::pipeline::ReportPipeline;
use crate::services::report_fetcher::{FetchError, ReportSource};

/// Per-outcome totals for one [`WorkerPool::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSummary {
    pub persisted: u64,
    pub duplicate: u64,
    pub not_found: u64,
    pub failed: u64,
}

impl PoolSummary {
    pub fn total(&self) -> u64 {
        self.persisted + self.duplicate + self.not_found + self.failed
    }
}

#[derive(Default)]
struct Counters {
    persisted: AtomicU64,
    duplicate: AtomicU64,
    not_found: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    fn record(&self, outcome: ReportOutcome) {
        let counter = match outcome {
            ReportOutcome::Persisted => &self.persisted,
            ReportOutcome::Duplicate => &self.duplicate,
            ReportOutcome::NotFound => &self.not_found,
            ReportOutcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn summary(&self) -> PoolSummary {
        PoolSummary {
            persisted: self.persisted.load(Ordering::Relaxed),
            duplicate: self.duplicate.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

pub struct WorkerPool {
    pipeline: Arc<ReportPipeline>,
    source: Arc<dyn ReportSource>,
    config: WorkerConfig,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl WorkerPool {
    pub fn new(
        pipeline: Arc<ReportPipeline>,
        source: Arc<dyn ReportSource>,
        config: WorkerConfig,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            pipeline,
            source,
            config,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Receiver that flips to `true` when [`WorkerPool::shutdown`] is called.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Stop feeding new ids. Reports already taken by a worker finish.
    pub fn shutdown(&self) {
        info!("Initiating worker pool shutdown");
        let _ = self.shutdown_tx.send(true);
    }

    /// Process the configured id range and return the outcome totals.
    pub async fn run(&self) -> PoolSummary {
        let first = self.config.first_instance_id;
        let count = self.config.instance_count;
        info!(
            workers = self.config.count,
            first_instance_id = first,
            instance_count = count,
            "Starting worker pool"
        );

        let (tx, rx) = mpsc::channel::<i64>(self.config.queue_capacity);
        let rx = Arc::new(Mutex::new(rx));
        let counters = Arc::new(Counters::default());

        let handles: Vec<JoinHandle<()>> = (0..self.config.count)
            .map(|worker| {
                tokio::spawn(worker_loop(
                    worker,
                    Arc::clone(&rx),
                    Arc::clone(&self.pipeline),
                    Arc::clone(&self.source),
                    Arc::clone(&counters),
                    self.shutdown_rx.clone(),
                ))
            })
            .collect();

        let mut shutdown_rx = self.shutdown_rx.clone();
        for offset in 0..count {
            if *shutdown_rx.borrow() {
                break;
            }
            let instance_id = first + offset as i64;
            tokio::select! {
                sent = tx.send(instance_id) => {
                    if sent.is_err() {
                        warn!("All workers exited before the id range was drained");
                        break;
                    }
                }
                _ = shutdown_rx.changed() => break,
            }
        }
        drop(tx);

        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Worker task panicked: {}", e);
            }
        }

        let summary = counters.summary();
        info!(
            persisted = summary.persisted,
            duplicate = summary.duplicate,
            not_found = summary.not_found,
            failed = summary.failed,
            "Worker pool finished"
        );
        summary
    }
}

async fn worker_loop(
    worker: usize,
    rx: Arc<Mutex<mpsc::Receiver<i64>>>,
    pipeline: Arc<ReportPipeline>,
    source: Arc<dyn ReportSource>,
    counters: Arc<Counters>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let next = tokio::select! {
            id = async { rx.lock().await.recv().await } => id,
            _ = shutdown_rx.changed() => continue,
        };
        let Some(instance_id) = next else {
            break;
        };

        let start = Instant::now();
        let outcome = process_one(pipeline.as_ref(), source.as_ref(), instance_id)
            .instrument(info_span!("report", instance_id, worker))
            .await;

        record_report(outcome, start.elapsed());
        counters.record(outcome);
    }
}

async fn process_one(
    pipeline: &ReportPipeline,
    source: &dyn ReportSource,
    instance_id: i64,
) -> ReportOutcome {
    let raw = match source.fetch(instance_id).await {
        Ok(raw) => raw,
        Err(FetchError::NotFound(_)) => return ReportOutcome::NotFound,
        Err(e) => {
            error!(error = %e, kind = "fetch", retryable = true, "Report fetch failed");
            return ReportOutcome::Failed;
        }
    };

    match pipeline.process(&raw).await {
        Ok(PersistOutcome::Persisted) => ReportOutcome::Persisted,
        Ok(PersistOutcome::AlreadyApplied) => ReportOutcome::Duplicate,
        Err(e) => {
            error!(
                error = %e,
                kind = e.kind(),
                retryable = e.is_retryable(),
                "Report processing failed"
            );
            ReportOutcome::Failed
        }
    }
}
