//! Activity catalog repository.

use domain::models::ActivityIdentity;
use sqlx::{PgConnection, PgPool};

use crate::entities::{ActivityEntity, ActivityHashEntity};
use crate::metrics::QueryTimer;

/// Repository for the activity and activity_hash tables.
#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Creates a new ActivityRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a catalog row and the hash that resolved to it.
    ///
    /// Both inserts are no-ops when the row already exists.
    pub async fn register(
        &self,
        conn: &mut PgConnection,
        activity_hash: i64,
        identity: ActivityIdentity,
    ) -> Result<(), sqlx::Error> {
        let activity = ActivityEntity::from_identity(identity);

        let timer = QueryTimer::new("insert_activity");
        let result = sqlx::query(
            r#"
            INSERT INTO activity (activity_name, difficulty, is_active, release_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&activity.activity_name)
        .bind(&activity.difficulty)
        .bind(activity.is_active)
        .bind(activity.release_date)
        .execute(&mut *conn)
        .await;
        timer.finish(result)?;

        let timer = QueryTimer::new("insert_activity_hash");
        let result = sqlx::query(
            r#"
            INSERT INTO activity_hash (activity_hash, activity_name, difficulty)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(activity_hash)
        .bind(&activity.activity_name)
        .bind(&activity.difficulty)
        .execute(&mut *conn)
        .await;
        if timer.finish(result)?.rows_affected() > 0 {
            tracing::info!(
                activity_hash,
                activity = %activity.activity_name,
                difficulty = %activity.difficulty,
                "Registered new activity hash"
            );
        }
        Ok(())
    }

    /// Find the identity registered for a hash.
    pub async fn find_by_hash(
        &self,
        activity_hash: i64,
    ) -> Result<Option<ActivityHashEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_activity_hash");
        let result = sqlx::query_as::<_, ActivityHashEntity>(
            r#"
            SELECT activity_hash, activity_name, difficulty
            FROM activity_hash
            WHERE activity_hash = $1
            "#,
        )
        .bind(activity_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }
}
