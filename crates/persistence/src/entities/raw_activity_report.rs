//! Raw activity report entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::NormalizedActivityReport;
use shared::codec::{self, CodecError};
use sqlx::FromRow;

/// Database row mapping for the raw_activity_report table.
#[derive(Debug, Clone, FromRow)]
pub struct RawActivityReportEntity {
    pub instance_id: i64,
    pub start_time: DateTime<Utc>,
    pub blob: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl RawActivityReportEntity {
    /// Decompresses and parses the stored normalized report.
    pub fn decode_report(&self) -> Result<NormalizedActivityReport, CodecError> {
        codec::decode(&self.blob)
    }
}
