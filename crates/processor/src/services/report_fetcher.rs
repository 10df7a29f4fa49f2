//! Upstream activity report client.
//!
//! Fetches one post-game report per instance id and unwraps the platform
//! envelope.

use std::time::Duration;

use domain::models::{RawActivityReport, RawReportEnvelope};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::config::UpstreamConfig;

/// Envelope error code for a successful call.
const SUCCESS_CODE: i32 = 1;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Activity {0} not found upstream")]
    NotFound(i64),

    #[error("Upstream throttled the request, retry after {0}s")]
    Throttled(i32),

    #[error("Request timeout after {0}s")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

// ============================================================================
// Client
// ============================================================================

/// Source of raw reports keyed by instance id.
#[async_trait::async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch(&self, instance_id: i64) -> Result<RawActivityReport, FetchError>;
}

pub struct ReportFetcher {
    client: Client,
    config: UpstreamConfig,
}

impl ReportFetcher {
    pub fn new(config: UpstreamConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn report_url(&self, instance_id: i64) -> String {
        format!(
            "{}/Platform/Destiny2/Stats/PostGameCarnageReport/{}/",
            self.config.base_url.trim_end_matches('/'),
            instance_id
        )
    }

    async fn fetch_report(&self, instance_id: i64) -> Result<RawActivityReport, FetchError> {
        let url = self.report_url(instance_id);
        debug!(url = %url, "Fetching activity report");

        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.config.request_timeout_secs)
                } else {
                    FetchError::Http(e)
                }
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(FetchError::NotFound(instance_id)),
            StatusCode::TOO_MANY_REQUESTS => return Err(FetchError::Throttled(0)),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(FetchError::Upstream(format!("HTTP {}: {}", status, body)));
            }
            _ => {}
        }

        let envelope: RawReportEnvelope = response
            .json()
            .await
            .map_err(|e| FetchError::Upstream(format!("invalid envelope: {}", e)))?;

        unwrap_envelope(instance_id, envelope)
    }
}

#[async_trait::async_trait]
impl ReportSource for ReportFetcher {
    async fn fetch(&self, instance_id: i64) -> Result<RawActivityReport, FetchError> {
        self.fetch_report(instance_id).await
    }
}

fn unwrap_envelope(
    instance_id: i64,
    envelope: RawReportEnvelope,
) -> Result<RawActivityReport, FetchError> {
    if envelope.throttle_seconds > 0 {
        return Err(FetchError::Throttled(envelope.throttle_seconds));
    }

    if envelope.error_code != SUCCESS_CODE {
        return Err(FetchError::Upstream(format!(
            "error code {}: {}",
            envelope.error_code, envelope.error_status
        )));
    }

    envelope
        .response
        .ok_or(FetchError::NotFound(instance_id))
}
