//! Per-instance statistics entities (database row mappings).

use domain::models::{CharacterRecord, WeaponUsageRecord};
use sqlx::FromRow;

/// Database row mapping for the instance_activity_stats table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct InstanceActivityStatsEntity {
    pub instance_id: i64,
    pub player_membership_id: i64,
    pub character_id: i64,
    pub character_class: String,
    pub completed: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub kills_deaths_ratio: f64,
    pub kills_deaths_assists: f64,
    pub melee_kills: i32,
    pub grenade_kills: i32,
    pub super_kills: i32,
    pub duration_seconds: i64,
    pub time_played_seconds: i64,
}

impl InstanceActivityStatsEntity {
    pub fn from_character(
        instance_id: i64,
        membership_id: i64,
        duration_seconds: i64,
        character: &CharacterRecord,
    ) -> Self {
        Self {
            instance_id,
            player_membership_id: membership_id,
            character_id: character.character_id,
            character_class: character.class.as_str().to_string(),
            completed: character.completed,
            kills: character.kills,
            deaths: character.deaths,
            assists: character.assists,
            kills_deaths_ratio: character.kills_deaths_ratio,
            kills_deaths_assists: character.kills_deaths_assists,
            melee_kills: character.abilities.melee,
            grenade_kills: character.abilities.grenade,
            super_kills: character.abilities.super_kills,
            duration_seconds,
            time_played_seconds: character.time_played_seconds,
        }
    }
}

/// Database row mapping for the instance_weapon_stats table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct InstanceWeaponStatsEntity {
    pub instance_id: i64,
    pub player_membership_id: i64,
    pub character_id: i64,
    pub weapon_hash: i64,
    pub kills: i32,
    pub precision_kills: i32,
    pub precision_ratio: f64,
}

impl InstanceWeaponStatsEntity {
    pub fn from_usage(
        instance_id: i64,
        membership_id: i64,
        character_id: i64,
        usage: &WeaponUsageRecord,
    ) -> Self {
        Self {
            instance_id,
            player_membership_id: membership_id,
            character_id,
            weapon_hash: usage.weapon_hash,
            kills: usage.kills,
            precision_kills: usage.precision_kills,
            precision_ratio: usage.precision_ratio,
        }
    }
}
