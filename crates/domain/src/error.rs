//! Domain error types.

use shared::codec::CodecError;
use shared::validation::MetricError;
use thiserror::Error;

/// Failure while normalizing or persisting one activity report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Malformed report: {0}")]
    MalformedReport(String),

    #[error("Unknown activity name: {0}")]
    UnknownActivityName(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Manifest lookup failed for key {key}: {reason}")]
    ManifestLookup { key: String, reason: String },

    #[error("Encoding error: {0}")]
    Encoding(#[from] CodecError),

    #[error("Store write failed: {0}")]
    StoreWrite(#[from] sqlx::Error),
}

impl ReportError {
    /// Whether redelivering the same report later may succeed.
    ///
    /// Taxonomy misses and malformed input need a code or data change;
    /// manifest and store failures are transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ReportError::ManifestLookup { .. } | ReportError::StoreWrite(_)
        )
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::MalformedReport(_) => "malformed_report",
            ReportError::UnknownActivityName(_) => "unknown_activity_name",
            ReportError::UnknownDifficulty(_) => "unknown_difficulty",
            ReportError::ManifestLookup { .. } => "manifest_lookup",
            ReportError::Encoding(_) => "encoding",
            ReportError::StoreWrite(_) => "store_write",
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ReportError::MalformedReport(message.into())
    }

    pub fn manifest(key: impl Into<String>, reason: impl ToString) -> Self {
        ReportError::ManifestLookup {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<MetricError> for ReportError {
    fn from(err: MetricError) -> Self {
        ReportError::MalformedReport(err.to_string())
    }
}
