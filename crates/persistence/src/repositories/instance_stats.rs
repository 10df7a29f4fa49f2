//! Per-instance statistics repository.

use sqlx::{PgConnection, PgPool};

use crate::entities::{InstanceActivityStatsEntity, InstanceWeaponStatsEntity};
use crate::metrics::QueryTimer;

/// Repository for the immutable instance_activity_stats and
/// instance_weapon_stats tables.
#[derive(Clone)]
pub struct InstanceStatsRepository {
    pool: PgPool,
}

impl InstanceStatsRepository {
    /// Creates a new InstanceStatsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one character's activity statistics.
    pub async fn insert_activity_stats(
        &self,
        conn: &mut PgConnection,
        stats: &InstanceActivityStatsEntity,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("insert_instance_activity_stats");
        let result = sqlx::query(
            r#"
            INSERT INTO instance_activity_stats (
                instance_id, player_membership_id, character_id, character_class, completed,
                kills, deaths, assists, kills_deaths_ratio, kills_deaths_assists,
                melee_kills, grenade_kills, super_kills, duration_seconds, time_played_seconds
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(stats.instance_id)
        .bind(stats.player_membership_id)
        .bind(stats.character_id)
        .bind(&stats.character_class)
        .bind(stats.completed)
        .bind(stats.kills)
        .bind(stats.deaths)
        .bind(stats.assists)
        .bind(stats.kills_deaths_ratio)
        .bind(stats.kills_deaths_assists)
        .bind(stats.melee_kills)
        .bind(stats.grenade_kills)
        .bind(stats.super_kills)
        .bind(stats.duration_seconds)
        .bind(stats.time_played_seconds)
        .execute(conn)
        .await;
        timer.finish(result).map(|_| ())
    }

    /// Insert one character's usage of one weapon.
    pub async fn insert_weapon_stats(
        &self,
        conn: &mut PgConnection,
        stats: &InstanceWeaponStatsEntity,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("insert_instance_weapon_stats");
        let result = sqlx::query(
            r#"
            INSERT INTO instance_weapon_stats (
                instance_id, player_membership_id, character_id, weapon_hash,
                kills, precision_kills, precision_ratio
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(stats.instance_id)
        .bind(stats.player_membership_id)
        .bind(stats.character_id)
        .bind(stats.weapon_hash)
        .bind(stats.kills)
        .bind(stats.precision_kills)
        .bind(stats.precision_ratio)
        .execute(conn)
        .await;
        timer.finish(result).map(|_| ())
    }

    /// All character rows for one instance.
    pub async fn find_activity_stats(
        &self,
        instance_id: i64,
    ) -> Result<Vec<InstanceActivityStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_instance_activity_stats");
        let result = sqlx::query_as::<_, InstanceActivityStatsEntity>(
            r#"
            SELECT instance_id, player_membership_id, character_id, character_class, completed,
                   kills, deaths, assists, kills_deaths_ratio, kills_deaths_assists,
                   melee_kills, grenade_kills, super_kills, duration_seconds, time_played_seconds
            FROM instance_activity_stats
            WHERE instance_id = $1
            ORDER BY player_membership_id, character_id
            "#,
        )
        .bind(instance_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// All weapon rows for one instance.
    pub async fn find_weapon_stats(
        &self,
        instance_id: i64,
    ) -> Result<Vec<InstanceWeaponStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_instance_weapon_stats");
        let result = sqlx::query_as::<_, InstanceWeaponStatsEntity>(
            r#"
            SELECT instance_id, player_membership_id, character_id, weapon_hash,
                   kills, precision_kills, precision_ratio
            FROM instance_weapon_stats
            WHERE instance_id = $1
            ORDER BY character_id, weapon_hash
            "#,
        )
        .bind(instance_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }
}
