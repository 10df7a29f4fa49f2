//! Transactional persistence of one normalized report.

use std::collections::BTreeSet;
use std::sync::Arc;

use domain::models::{AggregateContribution, NormalizedActivityReport, ParticipantRecord};
use domain::services::ManifestLookup;
use domain::ReportError;
use persistence::entities::{
    InstanceActivityStatsEntity, InstanceWeaponStatsEntity, WeaponEntity,
};
use persistence::repositories::{
    ActivityRepository, InstanceStatsRepository, PlayerActivityStatsRepository, PlayerRepository,
    RawActivityReportRepository, WeaponRepository,
};
use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};

/// Result of a successful [`AggregationOrchestrator::persist`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Every table was written and committed.
    Persisted,
    /// A blob for this instance id already existed; nothing was written.
    AlreadyApplied,
}

/// Destination for normalized reports.
#[async_trait::async_trait]
pub trait ReportStore: Send + Sync {
    async fn persist(
        &self,
        report: &NormalizedActivityReport,
    ) -> Result<PersistOutcome, ReportError>;
}

/// Writes every table touched by one report inside a single transaction.
pub struct AggregationOrchestrator {
    pool: PgPool,
    manifest: Arc<dyn ManifestLookup>,
    raw_reports: RawActivityReportRepository,
    players: PlayerRepository,
    activities: ActivityRepository,
    instance_stats: InstanceStatsRepository,
    weapons: WeaponRepository,
    aggregates: PlayerActivityStatsRepository,
}

impl AggregationOrchestrator {
    pub fn new(pool: PgPool, manifest: Arc<dyn ManifestLookup>) -> Self {
        Self {
            raw_reports: RawActivityReportRepository::new(pool.clone()),
            players: PlayerRepository::new(pool.clone()),
            activities: ActivityRepository::new(pool.clone()),
            instance_stats: InstanceStatsRepository::new(pool.clone()),
            weapons: WeaponRepository::new(pool.clone()),
            aggregates: PlayerActivityStatsRepository::new(pool.clone()),
            pool,
            manifest,
        }
    }

    async fn write_instance_stats(
        &self,
        conn: &mut PgConnection,
        report: &NormalizedActivityReport,
    ) -> Result<(), ReportError> {
        for weapon_hash in weapons_in_lock_order(report) {
            let entry = self.manifest.lookup(&weapon_hash.to_string()).await?;
            let weapon = WeaponEntity::from_manifest(weapon_hash, &entry);
            self.weapons.upsert(&mut *conn, &weapon).await?;
        }

        let duration = report.duration_seconds();
        for (participant, character) in report.characters() {
            let stats = InstanceActivityStatsEntity::from_character(
                report.instance_id,
                participant.membership_id,
                duration,
                character,
            );
            self.instance_stats
                .insert_activity_stats(&mut *conn, &stats)
                .await?;

            for usage in &character.weapons {
                let weapon_stats = InstanceWeaponStatsEntity::from_usage(
                    report.instance_id,
                    participant.membership_id,
                    character.character_id,
                    usage,
                );
                self.instance_stats
                    .insert_weapon_stats(&mut *conn, &weapon_stats)
                    .await?;
            }
        }

        Ok(())
    }
}

// Rows shared between reports (player, weapon, lifetime stats) are written in
// ascending key order, giving every transaction the same lock order.

fn participants_in_lock_order(report: &NormalizedActivityReport) -> Vec<&ParticipantRecord> {
    let mut participants: Vec<_> = report.participants.iter().collect();
    participants.sort_by_key(|p| p.membership_id);
    participants
}

/// Distinct weapon hashes used anywhere in the report, ascending.
fn weapons_in_lock_order(report: &NormalizedActivityReport) -> BTreeSet<i64> {
    report
        .characters()
        .flat_map(|(_, character)| character.weapons.iter().map(|w| w.weapon_hash))
        .collect()
}

fn contributions_in_lock_order(report: &NormalizedActivityReport) -> Vec<AggregateContribution> {
    let mut contributions = AggregateContribution::for_report(report);
    contributions.sort_by_key(|c| c.key.membership_id);
    contributions
}

#[async_trait::async_trait]
impl ReportStore for AggregationOrchestrator {
    /// Persist a report, all or nothing.
    ///
    /// Any failure rolls back every write made for the report. A redelivered
    /// instance id returns [`PersistOutcome::AlreadyApplied`] and leaves the
    /// lifetime aggregates untouched.
    async fn persist(
        &self,
        report: &NormalizedActivityReport,
    ) -> Result<PersistOutcome, ReportError> {
        let blob = shared::codec::encode(report)?;

        let mut tx = self.pool.begin().await?;

        let inserted = self
            .raw_reports
            .insert(&mut *tx, report.instance_id, report.start_time, &blob)
            .await?;
        if !inserted {
            tx.rollback().await?;
            warn!(
                instance_id = report.instance_id,
                "Report already persisted, skipping"
            );
            return Ok(PersistOutcome::AlreadyApplied);
        }

        for participant in participants_in_lock_order(report) {
            self.players
                .upsert_participant(&mut *tx, participant, report.end_time)
                .await?;
        }

        self.activities
            .register(&mut *tx, report.activity_hash, report.identity())
            .await?;

        self.write_instance_stats(&mut *tx, report).await?;

        let contributions = contributions_in_lock_order(report);
        for contribution in &contributions {
            self.aggregates.merge(&mut *tx, contribution).await?;
        }

        tx.commit().await?;

        info!(
            instance_id = report.instance_id,
            activity = report.activity_name.as_str(),
            difficulty = report.difficulty.as_str(),
            players = report.participants.len(),
            contributions = contributions.len(),
            "Report persisted"
        );
        Ok(PersistOutcome::Persisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use domain::models::{
        AbilityKills, ActivityName, CharacterClass, CharacterRecord, Difficulty, WeaponUsageRecord,
    };

    fn character(character_id: i64, weapons: &[i64]) -> CharacterRecord {
        CharacterRecord {
            character_id,
            class: CharacterClass::Hunter,
            light_level: 1800,
            completed: true,
            kills: 10,
            deaths: 0,
            assists: 1,
            kills_deaths_ratio: 10.0,
            kills_deaths_assists: 10.5,
            time_played_seconds: 1800,
            emblem_hash: 0,
            abilities: AbilityKills::default(),
            weapons: weapons
                .iter()
                .map(|&weapon_hash| WeaponUsageRecord {
                    weapon_hash,
                    kills: 5,
                    precision_kills: 2,
                    precision_ratio: 0.4,
                })
                .collect(),
        }
    }

    fn participant(membership_id: i64, characters: Vec<CharacterRecord>) -> ParticipantRecord {
        ParticipantRecord {
            membership_id,
            membership_type: 3,
            display_name: format!("guardian{}", membership_id),
            display_name_code: None,
            characters,
        }
    }

    fn report(participants: Vec<ParticipantRecord>) -> NormalizedActivityReport {
        let start_time = Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap();
        NormalizedActivityReport {
            instance_id: 14_000_000_001,
            start_time,
            end_time: start_time + Duration::seconds(1800),
            activity_name: ActivityName::LastWish,
            difficulty: Difficulty::Normal,
            activity_hash: 2_122_313_384,
            flawless: true,
            solo: false,
            duo: false,
            trio: true,
            from_beginning: true,
            participants,
        }
    }

    fn shuffled_report() -> NormalizedActivityReport {
        report(vec![
            participant(30, vec![character(301, &[900, 100])]),
            participant(10, vec![character(101, &[500]), character(102, &[100])]),
            participant(20, vec![character(201, &[])]),
        ])
    }

    #[test]
    fn test_participants_locked_in_membership_order() {
        let report = shuffled_report();
        let order: Vec<i64> = participants_in_lock_order(&report)
            .iter()
            .map(|p| p.membership_id)
            .collect();
        assert_eq!(order, vec![10, 20, 30]);
    }

    #[test]
    fn test_weapons_deduplicated_and_ascending() {
        let weapons: Vec<i64> = weapons_in_lock_order(&shuffled_report()).into_iter().collect();
        assert_eq!(weapons, vec![100, 500, 900]);
    }

    #[test]
    fn test_contributions_locked_in_membership_order() {
        let contributions = contributions_in_lock_order(&shuffled_report());
        let order: Vec<i64> = contributions.iter().map(|c| c.key.membership_id).collect();
        assert_eq!(order, vec![10, 10, 20, 30]);
    }

    #[test]
    fn test_same_players_in_any_order_lock_identically() {
        let forward = report(vec![
            participant(1, vec![character(11, &[7, 3])]),
            participant(2, vec![character(21, &[5])]),
        ]);
        let backward = report(vec![
            participant(2, vec![character(21, &[5])]),
            participant(1, vec![character(11, &[3, 7])]),
        ]);

        let ids = |r: &NormalizedActivityReport| -> Vec<i64> {
            participants_in_lock_order(r)
                .iter()
                .map(|p| p.membership_id)
                .collect()
        };
        assert_eq!(ids(&forward), ids(&backward));
        assert_eq!(weapons_in_lock_order(&forward), weapons_in_lock_order(&backward));
    }
}
