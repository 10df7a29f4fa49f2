//! Lifetime per-player aggregate for one activity and difficulty.
//!
//! Counters only ever grow and achievement flags are only ever set. The
//! storage layer applies the same merge as [`PlayerRaidAggregate::merge`] in a
//! single conflict-resolving statement.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::activity::{ActivityName, Difficulty};
use super::report::{CharacterRecord, NormalizedActivityReport};

/// Contest mode stays enabled this long after a raid launches.
pub const CONTEST_WINDOW_HOURS: i64 = 48;
/// A clear counts as day one when it ends within this window.
pub const DAY_ONE_WINDOW_HOURS: i64 = 24;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateKey {
    pub activity_name: ActivityName,
    pub difficulty: Difficulty,
    pub membership_id: i64,
}

/// "Ever achieved" flags. Merging is a logical OR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementFlags {
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

impl AchievementFlags {
    pub fn merge(&mut self, other: &AchievementFlags) {
        self.flawless |= other.flawless;
        self.contest_clear |= other.contest_clear;
        self.day_one |= other.day_one;
        self.solo |= other.solo;
        self.duo |= other.duo;
        self.trio |= other.trio;
        self.solo_flawless |= other.solo_flawless;
        self.duo_flawless |= other.duo_flawless;
        self.trio_flawless |= other.trio_flawless;
    }
}

/// What one character in one report adds to the lifetime aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateContribution {
    pub key: AggregateKey,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub hours_played: f64,
    pub clears: i64,
    pub full_clears: i64,
    pub flags: AchievementFlags,
}

impl AggregateContribution {
    pub fn from_character(
        report: &NormalizedActivityReport,
        membership_id: i64,
        character: &CharacterRecord,
    ) -> Self {
        let cleared = character.completed;
        let full_clear = cleared && report.from_beginning;
        let flawless = full_clear && report.flawless;

        let release = report.activity_name.release_date();
        let contest_clear =
            cleared && report.start_time < release + Duration::hours(CONTEST_WINDOW_HOURS);
        let day_one = cleared && report.end_time <= release + Duration::hours(DAY_ONE_WINDOW_HOURS);

        Self {
            key: AggregateKey {
                activity_name: report.activity_name,
                difficulty: report.difficulty,
                membership_id,
            },
            kills: i64::from(character.kills),
            deaths: i64::from(character.deaths),
            assists: i64::from(character.assists),
            hours_played: character.time_played_seconds as f64 / SECONDS_PER_HOUR,
            clears: i64::from(cleared),
            full_clears: i64::from(full_clear),
            flags: AchievementFlags {
                flawless,
                contest_clear,
                day_one,
                solo: report.solo && cleared,
                duo: report.duo && cleared,
                trio: report.trio && cleared,
                solo_flawless: report.solo && flawless,
                duo_flawless: report.duo && flawless,
                trio_flawless: report.trio && flawless,
            },
        }
    }

    /// One contribution per (participant, character) pair.
    pub fn for_report(report: &NormalizedActivityReport) -> Vec<Self> {
        report
            .characters()
            .map(|(participant, character)| {
                Self::from_character(report, participant.membership_id, character)
            })
            .collect()
    }
}

/// Persisted lifetime statistics row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRaidAggregate {
    pub key: AggregateKey,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub hours_played: f64,
    pub clears: i64,
    pub full_clears: i64,
    pub flags: AchievementFlags,
}

impl PlayerRaidAggregate {
    pub fn empty(key: AggregateKey) -> Self {
        Self {
            key,
            kills: 0,
            deaths: 0,
            assists: 0,
            hours_played: 0.0,
            clears: 0,
            full_clears: 0,
            flags: AchievementFlags::default(),
        }
    }

    /// Adds counters and ORs flags. Contributions for other keys are ignored.
    pub fn merge(&mut self, contribution: &AggregateContribution) {
        if contribution.key != self.key {
            return;
        }
        self.kills += contribution.kills;
        self.deaths += contribution.deaths;
        self.assists += contribution.assists;
        self.hours_played += contribution.hours_played;
        self.clears += contribution.clears;
        self.full_clears += contribution.full_clears;
        self.flags.merge(&contribution.flags);
    }
}
