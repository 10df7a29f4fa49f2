//! Raw activity report repository.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::entities::RawActivityReportEntity;
use crate::metrics::QueryTimer;

/// Repository for the write-once report blob table.
#[derive(Clone)]
pub struct RawActivityReportRepository {
    pool: PgPool,
}

impl RawActivityReportRepository {
    /// Creates a new RawActivityReportRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a compressed report blob.
    ///
    /// Returns `false` when a blob for the instance already exists. Existing
    /// rows are never overwritten.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        instance_id: i64,
        start_time: DateTime<Utc>,
        blob: &[u8],
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("insert_raw_activity_report");
        let result = sqlx::query(
            r#"
            INSERT INTO raw_activity_report (instance_id, start_time, blob)
            VALUES ($1, $2, $3)
            ON CONFLICT (instance_id) DO NOTHING
            "#,
        )
        .bind(instance_id)
        .bind(start_time)
        .bind(blob)
        .execute(conn)
        .await;
        Ok(timer.finish(result)?.rows_affected() > 0)
    }

    /// Find a stored report by instance id.
    pub async fn find_by_instance_id(
        &self,
        instance_id: i64,
    ) -> Result<Option<RawActivityReportEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_raw_activity_report");
        let result = sqlx::query_as::<_, RawActivityReportEntity>(
            r#"
            SELECT instance_id, start_time, blob, created_at
            FROM raw_activity_report
            WHERE instance_id = $1
            "#,
        )
        .bind(instance_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }
}
