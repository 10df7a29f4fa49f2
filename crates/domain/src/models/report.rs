//! Normalized activity report.
//!
//! Derived once per raw report and never mutated afterwards. The whole value
//! is persisted as a compressed blob, so every field must survive a JSON
//! round trip unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::{ActivityIdentity, ActivityName, CharacterClass, Difficulty};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedActivityReport {
    pub instance_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub activity_name: ActivityName,
    pub difficulty: Difficulty,
    pub activity_hash: i64,
    pub flawless: bool,
    pub solo: bool,
    pub duo: bool,
    pub trio: bool,
    pub from_beginning: bool,
    pub participants: Vec<ParticipantRecord>,
}

impl NormalizedActivityReport {
    pub fn identity(&self) -> ActivityIdentity {
        ActivityIdentity {
            name: self.activity_name,
            difficulty: self.difficulty,
        }
    }

    /// Wall-clock length of the activity in seconds.
    pub fn duration_seconds(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds()
    }

    /// Iterates every (participant, character) pair in report order.
    pub fn characters(&self) -> impl Iterator<Item = (&ParticipantRecord, &CharacterRecord)> {
        self.participants
            .iter()
            .flat_map(|p| p.characters.iter().map(move |c| (p, c)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    pub membership_id: i64,
    pub membership_type: i32,
    /// Global display name when present, legacy platform name otherwise.
    pub display_name: String,
    /// Only set alongside a global display name.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub display_name_code: Option<i32>,
    pub characters: Vec<CharacterRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub character_id: i64,
    pub class: CharacterClass,
    pub light_level: i32,
    pub completed: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    /// Copied from the source metric, not recomputed.
    pub kills_deaths_ratio: f64,
    /// Copied from the source metric, not recomputed.
    pub kills_deaths_assists: f64,
    pub time_played_seconds: i64,
    pub emblem_hash: i64,
    pub abilities: AbilityKills,
    pub weapons: Vec<WeaponUsageRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityKills {
    pub melee: i32,
    pub grenade: i32,
    #[serde(rename = "super")]
    pub super_kills: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponUsageRecord {
    pub weapon_hash: i64,
    pub kills: i32,
    pub precision_kills: i32,
    /// Copied from the source metric, not recomputed.
    pub precision_ratio: f64,
}
