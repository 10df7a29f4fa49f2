//! Prometheus exporter and report-level metrics.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use thiserror::Error;

use crate::config::MetricsConfig;

#[derive(Debug, Error)]
pub enum MetricsInitError {
    #[error("invalid metrics listen address: {0}")]
    Address(#[from] AddrParseError),

    #[error("failed to install Prometheus exporter: {0}")]
    Build(#[from] BuildError),
}

/// Outcome label for `reports_processed_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Persisted,
    Duplicate,
    NotFound,
    Failed,
}

impl ReportOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportOutcome::Persisted => "persisted",
            ReportOutcome::Duplicate => "duplicate",
            ReportOutcome::NotFound => "not_found",
            ReportOutcome::Failed => "failed",
        }
    }
}

/// Installs the Prometheus recorder with its scrape listener.
///
/// Does nothing when metrics are disabled; the `metrics` macros are then
/// no-ops.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsInitError> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config.listen.parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets(&[
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ])?
        .install()?;

    tracing::info!(listen = %addr, "Prometheus exporter listening");
    Ok(())
}

/// Records one finished report.
pub fn record_report(outcome: ReportOutcome, elapsed: Duration) {
    counter!("reports_processed_total", "outcome" => outcome.as_str()).increment(1);
    histogram!("report_processing_duration_seconds", "outcome" => outcome.as_str())
        .record(elapsed.as_secs_f64());
}
