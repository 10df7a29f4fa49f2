//! Raw report normalization.
//!
//! Turns one [`RawActivityReport`] into a [`NormalizedActivityReport`]. All
//! input validation happens before the single manifest lookup, so a malformed
//! report never touches the cache.

use chrono::Duration;
use shared::game_time::parse_rfc3339;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::classification::classify;
use super::freshness::{FreshnessInput, FreshnessResolver};
use super::manifest::ManifestLookup;
use super::taxonomy::ActivityTaxonomy;
use crate::error::ReportError;
use crate::models::activity::CharacterClass;
use crate::models::raw_report::{metric, parse_id, RawActivityReport, RawParticipantEntry};
use crate::models::report::{
    AbilityKills, CharacterRecord, NormalizedActivityReport, ParticipantRecord, WeaponUsageRecord,
};

#[derive(Clone)]
pub struct Normalizer {
    taxonomy: Arc<ActivityTaxonomy>,
    freshness: Arc<FreshnessResolver>,
    manifest: Arc<dyn ManifestLookup>,
}

impl Normalizer {
    pub fn new(
        taxonomy: Arc<ActivityTaxonomy>,
        freshness: Arc<FreshnessResolver>,
        manifest: Arc<dyn ManifestLookup>,
    ) -> Self {
        Self {
            taxonomy,
            freshness,
            manifest,
        }
    }

    pub async fn normalize(
        &self,
        raw: &RawActivityReport,
    ) -> Result<NormalizedActivityReport, ReportError> {
        let start_time = parse_rfc3339(&raw.period).map_err(|e| {
            ReportError::malformed(format!("period '{}' is not RFC3339: {}", raw.period, e))
        })?;

        let first = raw.entries.first().ok_or_else(|| {
            ReportError::malformed(format!(
                "report {} has no entries, end time is unknown",
                raw.activity_details.instance_id
            ))
        })?;
        // Duration comes from the first entry only.
        let duration = first.values.seconds(metric::ACTIVITY_DURATION_SECONDS)?;
        let end_time = Duration::try_seconds(duration)
            .and_then(|d| start_time.checked_add_signed(d))
            .ok_or_else(|| ReportError::malformed("activity duration overflows end time"))?;

        let instance_id = parse_id("instanceId", &raw.activity_details.instance_id)?;
        let participants = group_participants(&raw.entries)?;

        let activity_hash = raw.activity_details.director_activity_hash;
        let entry = self.manifest.lookup(&activity_hash.to_string()).await?;
        let identity = self.taxonomy.resolve(&entry.display_properties.name)?;

        let classification = classify(&participants);
        let from_beginning = self.freshness.resolve(FreshnessInput {
            activity_hash,
            start_time,
            starting_phase_index: raw.starting_phase_index,
            started_from_beginning: raw.activity_was_started_from_beginning,
            flawless: classification.flawless,
        });

        debug!(
            instance_id,
            activity = %identity.name,
            difficulty = %identity.difficulty,
            participants = participants.len(),
            flawless = classification.flawless,
            era = self.freshness.boundaries().era_of(start_time).as_str(),
            from_beginning,
            "Report normalized"
        );

        Ok(NormalizedActivityReport {
            instance_id,
            start_time,
            end_time,
            activity_name: identity.name,
            difficulty: identity.difficulty,
            activity_hash,
            flawless: classification.flawless,
            solo: classification.solo,
            duo: classification.duo,
            trio: classification.trio,
            from_beginning,
            participants,
        })
    }
}

/// Groups entries by membership id, keeping first-appearance order.
///
/// Identity fields come from the player's first entry.
pub fn group_participants(
    entries: &[RawParticipantEntry],
) -> Result<Vec<ParticipantRecord>, ReportError> {
    let mut participants: Vec<ParticipantRecord> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for entry in entries {
        let info = &entry.player.destiny_user_info;
        let membership_id = parse_id("membershipId", &info.membership_id)?;
        let character = character_record(entry)?;

        match index.get(&membership_id) {
            Some(&i) => participants[i].characters.push(character),
            None => {
                let (display_name, display_name_code) = match info.global_name() {
                    Some(name) => (name.to_string(), info.bungie_global_display_name_code),
                    None => (info.display_name.clone(), None),
                };
                index.insert(membership_id, participants.len());
                participants.push(ParticipantRecord {
                    membership_id,
                    membership_type: info.membership_type,
                    display_name,
                    display_name_code,
                    characters: vec![character],
                });
            }
        }
    }

    Ok(participants)
}

fn character_record(entry: &RawParticipantEntry) -> Result<CharacterRecord, ReportError> {
    let player = &entry.player;
    let class = CharacterClass::from_label(&player.character_class)
        .or_else(|| CharacterClass::from_hash(player.class_hash))
        .ok_or_else(|| {
            ReportError::malformed(format!(
                "unknown character class '{}' ({})",
                player.character_class, player.class_hash
            ))
        })?;

    let values = &entry.values;
    let (abilities, weapons) = match &entry.extended {
        Some(extended) => {
            let abilities = AbilityKills {
                melee: extended.values.count_or_zero(metric::MELEE_KILLS)?,
                grenade: extended.values.count_or_zero(metric::GRENADE_KILLS)?,
                super_kills: extended.values.count_or_zero(metric::SUPER_KILLS)?,
            };
            let weapons = extended
                .weapons
                .iter()
                .map(|weapon| {
                    Ok(WeaponUsageRecord {
                        weapon_hash: weapon.reference_id,
                        kills: weapon.values.count_or_zero(metric::WEAPON_KILLS)?,
                        precision_kills: weapon
                            .values
                            .count_or_zero(metric::WEAPON_PRECISION_KILLS)?,
                        precision_ratio: weapon
                            .values
                            .ratio_or_zero(metric::WEAPON_PRECISION_RATIO)?,
                    })
                })
                .collect::<Result<Vec<_>, ReportError>>()?;
            (abilities, weapons)
        }
        None => (AbilityKills::default(), Vec::new()),
    };

    Ok(CharacterRecord {
        character_id: parse_id("characterId", &entry.character_id)?,
        class,
        light_level: player.light_level,
        completed: values.flag(metric::COMPLETED)?,
        kills: values.count(metric::KILLS)?,
        deaths: values.count(metric::DEATHS)?,
        assists: values.count(metric::ASSISTS)?,
        kills_deaths_ratio: values.ratio(metric::KILLS_DEATHS_RATIO)?,
        kills_deaths_assists: values.ratio(metric::KILLS_DEATHS_ASSISTS)?,
        time_played_seconds: values.seconds(metric::TIME_PLAYED_SECONDS)?,
        emblem_hash: player.emblem_hash,
        abilities,
        weapons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::{ActivityName, Difficulty};
    use crate::models::manifest::ManifestEntry;
    use crate::models::raw_report::{
        RawActivityDetails, RawExtendedStats, RawMetrics, RawPlayer, RawUserInfo, RawWeaponUsage,
    };
    use crate::services::manifest::InMemoryManifest;

    const HASH: i64 = 1_374_392_663;

    fn entry(membership_id: &str, character_id: &str, deaths: f64) -> RawParticipantEntry {
        RawParticipantEntry {
            player: RawPlayer {
                destiny_user_info: RawUserInfo {
                    membership_id: membership_id.to_string(),
                    membership_type: 3,
                    display_name: format!("legacy-{}", membership_id),
                    bungie_global_display_name: None,
                    bungie_global_display_name_code: None,
                    icon_path: None,
                },
                character_class: "Titan".to_string(),
                class_hash: 3_655_393_761,
                race_hash: 0,
                gender_hash: 0,
                light_level: 1790,
                emblem_hash: 4_182_480_236,
            },
            character_id: character_id.to_string(),
            values: RawMetrics::new()
                .with(metric::KILLS, 80.0)
                .with(metric::DEATHS, deaths)
                .with(metric::ASSISTS, 12.0)
                .with(metric::KILLS_DEATHS_RATIO, 80.0)
                .with(metric::KILLS_DEATHS_ASSISTS, 86.0)
                .with(metric::TIME_PLAYED_SECONDS, 2700.0)
                .with(metric::COMPLETED, 1.0)
                .with(metric::ACTIVITY_DURATION_SECONDS, 3000.0),
            extended: None,
        }
    }

    fn report(entries: Vec<RawParticipantEntry>) -> RawActivityReport {
        RawActivityReport {
            period: "2023-01-10T18:00:00Z".to_string(),
            starting_phase_index: 0,
            activity_was_started_from_beginning: true,
            activity_details: RawActivityDetails {
                reference_id: HASH,
                director_activity_hash: HASH,
                instance_id: "12685770593".to_string(),
                mode: 4,
                modes: vec![4, 7],
                is_private: false,
                membership_type: 3,
            },
            entries,
        }
    }

    fn normalizer(manifest: Arc<InMemoryManifest>) -> Normalizer {
        Normalizer::new(
            Arc::new(ActivityTaxonomy::new()),
            Arc::new(FreshnessResolver::default()),
            manifest,
        )
    }

    fn manifest() -> Arc<InMemoryManifest> {
        Arc::new(
            InMemoryManifest::new().with_entry(HASH, ManifestEntry::named("King's Fall: Normal")),
        )
    }

    #[tokio::test]
    async fn test_groups_characters_under_one_participant() {
        let raw = report(vec![
            entry("1", "11", 0.0),
            entry("2", "21", 0.0),
            entry("1", "12", 0.0),
        ]);
        let normalized = normalizer(manifest()).normalize(&raw).await.unwrap();

        assert_eq!(normalized.participants.len(), 2);
        assert_eq!(normalized.participants[0].membership_id, 1);
        assert_eq!(normalized.participants[0].characters.len(), 2);
        assert_eq!(normalized.participants[1].membership_id, 2);
        assert!(normalized.duo);
        assert!(!normalized.trio);
        assert_eq!(normalized.activity_name, ActivityName::KingsFall);
        assert_eq!(normalized.difficulty, Difficulty::Normal);
    }

    #[tokio::test]
    async fn test_end_time_uses_first_entry_duration() {
        let mut second = entry("2", "21", 0.0);
        second.values.insert(metric::ACTIVITY_DURATION_SECONDS, 9999.0);
        let raw = report(vec![entry("1", "11", 0.0), second]);

        let normalized = normalizer(manifest()).normalize(&raw).await.unwrap();
        assert_eq!(normalized.duration_seconds(), 3000);
    }

    #[tokio::test]
    async fn test_empty_entries_are_malformed_without_lookup() {
        let manifest = manifest();
        let result = normalizer(manifest.clone()).normalize(&report(vec![])).await;

        assert!(matches!(result, Err(ReportError::MalformedReport(_))));
        assert_eq!(manifest.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_huge_duration_is_malformed_without_lookup() {
        let manifest = manifest();
        for seconds in [1.0e13, 9.0e15, 9.2e18] {
            let mut first = entry("1", "11", 0.0);
            first.values.insert(metric::ACTIVITY_DURATION_SECONDS, seconds);

            let result = normalizer(manifest.clone())
                .normalize(&report(vec![first]))
                .await;
            assert!(
                matches!(result, Err(ReportError::MalformedReport(_))),
                "duration {} should be rejected",
                seconds
            );
        }
        assert_eq!(manifest.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_bad_period_is_malformed() {
        let mut raw = report(vec![entry("1", "11", 0.0)]);
        raw.period = "not a date".to_string();

        let result = normalizer(manifest()).normalize(&raw).await;
        assert!(matches!(result, Err(ReportError::MalformedReport(_))));
    }

    #[tokio::test]
    async fn test_global_name_preferred() {
        let mut first = entry("1", "11", 0.0);
        first.player.destiny_user_info.bungie_global_display_name = Some("Saint".to_string());
        first.player.destiny_user_info.bungie_global_display_name_code = Some(14);
        let mut second = entry("2", "21", 0.0);
        second.player.destiny_user_info.bungie_global_display_name_code = Some(99);

        let normalized = normalizer(manifest())
            .normalize(&report(vec![first, second]))
            .await
            .unwrap();

        assert_eq!(normalized.participants[0].display_name, "Saint");
        assert_eq!(normalized.participants[0].display_name_code, Some(14));
        assert_eq!(normalized.participants[1].display_name, "legacy-2");
        assert_eq!(normalized.participants[1].display_name_code, None);
    }

    #[tokio::test]
    async fn test_extended_stats_are_mapped() {
        let mut raw_entry = entry("1", "11", 0.0);
        raw_entry.extended = Some(RawExtendedStats {
            weapons: vec![RawWeaponUsage {
                reference_id: 2_171_478_765,
                values: RawMetrics::new()
                    .with(metric::WEAPON_KILLS, 40.0)
                    .with(metric::WEAPON_PRECISION_KILLS, 30.0)
                    .with(metric::WEAPON_PRECISION_RATIO, 0.75),
            }],
            values: RawMetrics::new()
                .with(metric::MELEE_KILLS, 3.0)
                .with(metric::SUPER_KILLS, 9.0),
        });

        let normalized = normalizer(manifest())
            .normalize(&report(vec![raw_entry]))
            .await
            .unwrap();
        let character = &normalized.participants[0].characters[0];

        assert_eq!(character.abilities.melee, 3);
        assert_eq!(character.abilities.grenade, 0);
        assert_eq!(character.abilities.super_kills, 9);
        assert_eq!(character.weapons.len(), 1);
        assert_eq!(character.weapons[0].precision_ratio, 0.75);
        assert!(normalized.solo);
    }

    #[tokio::test]
    async fn test_missing_extended_stats_is_not_an_error() {
        let normalized = normalizer(manifest())
            .normalize(&report(vec![entry("1", "11", 1.0)]))
            .await
            .unwrap();
        let character = &normalized.participants[0].characters[0];

        assert!(character.weapons.is_empty());
        assert_eq!(character.abilities, AbilityKills::default());
        assert!(!normalized.flawless);
    }

    #[tokio::test]
    async fn test_unknown_label_fails() {
        let manifest = Arc::new(
            InMemoryManifest::new().with_entry(HASH, ManifestEntry::named("Prophecy: Normal")),
        );
        let result = normalizer(manifest)
            .normalize(&report(vec![entry("1", "11", 0.0)]))
            .await;

        assert!(matches!(result, Err(ReportError::UnknownActivityName(_))));
    }

    #[test]
    fn test_class_falls_back_to_hash() {
        let mut raw_entry = entry("1", "11", 0.0);
        raw_entry.player.character_class = String::new();
        raw_entry.player.class_hash = 671_679_327;

        let participants = group_participants(&[raw_entry]).unwrap();
        assert_eq!(participants[0].characters[0].class, CharacterClass::Hunter);
    }

    #[test]
    fn test_missing_core_metric_is_malformed() {
        let mut raw_entry = entry("1", "11", 0.0);
        raw_entry.values = RawMetrics::new().with(metric::KILLS, 1.0);

        assert!(matches!(
            group_participants(&[raw_entry]),
            Err(ReportError::MalformedReport(_))
        ));
    }
}
