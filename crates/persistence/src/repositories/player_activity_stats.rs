//! Lifetime aggregate repository.

use domain::models::{AggregateContribution, AggregateKey, PlayerRaidAggregate};
use sqlx::{PgConnection, PgPool};

use crate::entities::PlayerActivityStatsEntity;
use crate::metrics::QueryTimer;

/// Repository for the player_activity_stats table.
#[derive(Clone)]
pub struct PlayerActivityStatsRepository {
    pool: PgPool,
}

impl PlayerActivityStatsRepository {
    /// Creates a new PlayerActivityStatsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Merge one contribution into the lifetime row.
    ///
    /// Counters are added and flags are ORed in a single statement, so
    /// concurrent writers for the same key are serialized by the row lock
    /// instead of racing a read-then-write.
    pub async fn merge(
        &self,
        conn: &mut PgConnection,
        contribution: &AggregateContribution,
    ) -> Result<(), sqlx::Error> {
        let flags = &contribution.flags;
        let timer = QueryTimer::new("merge_player_activity_stats");
        let result = sqlx::query(
            r#"
            INSERT INTO player_activity_stats (
                activity_name, difficulty, membership_id,
                kills, deaths, assists, hours_played, clears, full_clears,
                flawless, contest_clear, day_one, solo, duo, trio,
                solo_flawless, duo_flawless, trio_flawless
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (activity_name, difficulty, membership_id) DO UPDATE
            SET kills = player_activity_stats.kills + EXCLUDED.kills,
                deaths = player_activity_stats.deaths + EXCLUDED.deaths,
                assists = player_activity_stats.assists + EXCLUDED.assists,
                hours_played = player_activity_stats.hours_played + EXCLUDED.hours_played,
                clears = player_activity_stats.clears + EXCLUDED.clears,
                full_clears = player_activity_stats.full_clears + EXCLUDED.full_clears,
                flawless = player_activity_stats.flawless OR EXCLUDED.flawless,
                contest_clear = player_activity_stats.contest_clear OR EXCLUDED.contest_clear,
                day_one = player_activity_stats.day_one OR EXCLUDED.day_one,
                solo = player_activity_stats.solo OR EXCLUDED.solo,
                duo = player_activity_stats.duo OR EXCLUDED.duo,
                trio = player_activity_stats.trio OR EXCLUDED.trio,
                solo_flawless = player_activity_stats.solo_flawless OR EXCLUDED.solo_flawless,
                duo_flawless = player_activity_stats.duo_flawless OR EXCLUDED.duo_flawless,
                trio_flawless = player_activity_stats.trio_flawless OR EXCLUDED.trio_flawless
            "#,
        )
        .bind(contribution.key.activity_name.as_str())
        .bind(contribution.key.difficulty.as_str())
        .bind(contribution.key.membership_id)
        .bind(contribution.kills)
        .bind(contribution.deaths)
        .bind(contribution.assists)
        .bind(contribution.hours_played)
        .bind(contribution.clears)
        .bind(contribution.full_clears)
        .bind(flags.flawless)
        .bind(flags.contest_clear)
        .bind(flags.day_one)
        .bind(flags.solo)
        .bind(flags.duo)
        .bind(flags.trio)
        .bind(flags.solo_flawless)
        .bind(flags.duo_flawless)
        .bind(flags.trio_flawless)
        .execute(conn)
        .await;
        timer.finish(result).map(|_| ())
    }

    /// Find the lifetime row for a key.
    pub async fn find(
        &self,
        key: AggregateKey,
    ) -> Result<Option<PlayerRaidAggregate>, sqlx::Error> {
        let timer = QueryTimer::new("find_player_activity_stats");
        let result = sqlx::query_as::<_, PlayerActivityStatsEntity>(
            r#"
            SELECT activity_name, difficulty, membership_id,
                   kills, deaths, assists, hours_played, clears, full_clears,
                   flawless, contest_clear, day_one, solo, duo, trio,
                   solo_flawless, duo_flawless, trio_flawless
            FROM player_activity_stats
            WHERE activity_name = $1 AND difficulty = $2 AND membership_id = $3
            "#,
        )
        .bind(key.activity_name.as_str())
        .bind(key.difficulty.as_str())
        .bind(key.membership_id)
        .fetch_optional(&self.pool)
        .await;
        timer
            .finish(result)?
            .map(|entity| {
                PlayerRaidAggregate::try_from(entity).map_err(|e| sqlx::Error::Decode(e.into()))
            })
            .transpose()
    }
}
