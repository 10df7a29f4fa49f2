//! Lifetime aggregate entity (database row mapping).

use domain::models::{AchievementFlags, AggregateKey, PlayerRaidAggregate};
use sqlx::FromRow;

/// Database row mapping for the player_activity_stats table.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerActivityStatsEntity {
    pub activity_name: String,
    pub difficulty: String,
    pub membership_id: i64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub hours_played: f64,
    pub clears: i64,
    pub full_clears: i64,
    pub flawless: bool,
    pub contest_clear: bool,
    pub day_one: bool,
    pub solo: bool,
    pub duo: bool,
    pub trio: bool,
    pub solo_flawless: bool,
    pub duo_flawless: bool,
    pub trio_flawless: bool,
}

impl TryFrom<PlayerActivityStatsEntity> for PlayerRaidAggregate {
    type Error = String;

    fn try_from(entity: PlayerActivityStatsEntity) -> Result<Self, Self::Error> {
        Ok(PlayerRaidAggregate {
            key: AggregateKey {
                activity_name: entity.activity_name.parse()?,
                difficulty: entity.difficulty.parse()?,
                membership_id: entity.membership_id,
            },
            kills: entity.kills,
            deaths: entity.deaths,
            assists: entity.assists,
            hours_played: entity.hours_played,
            clears: entity.clears,
            full_clears: entity.full_clears,
            flags: AchievementFlags {
                flawless: entity.flawless,
                contest_clear: entity.contest_clear,
                day_one: entity.day_one,
                solo: entity.solo,
                duo: entity.duo,
                trio: entity.trio,
                solo_flawless: entity.solo_flawless,
                duo_flawless: entity.duo_flawless,
                trio_flawless: entity.trio_flawless,
            },
        })
    }
}
