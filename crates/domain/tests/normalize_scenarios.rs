//! End-to-end normalization scenarios driven by upstream-shaped JSON.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use domain::models::{
    AbilityKills, ActivityName, AggregateContribution, CharacterClass, CharacterRecord,
    Difficulty, ManifestEntry, NormalizedActivityReport, ParticipantRecord, PlayerRaidAggregate,
    RawActivityReport, RawReportEnvelope, WeaponUsageRecord,
};
use fake::Fake;
use domain::services::{ActivityTaxonomy, FreshnessResolver, InMemoryManifest, Normalizer};
use domain::ReportError;
use serde_json::{json, Value};

const KINGS_FALL_HASH: i64 = 1_374_392_663;
const LEVIATHAN_HASH: i64 = 2_693_136_600;

fn stat(value: f64) -> Value {
    json!({ "basic": { "value": value, "displayValue": value.to_string() } })
}

fn entry(membership_id: &str, character_id: &str, deaths: f64, class: &str) -> Value {
    json!({
        "player": {
            "destinyUserInfo": {
                "membershipId": membership_id,
                "membershipType": 3,
                "displayName": format!("steam-{}", membership_id),
                "bungieGlobalDisplayName": format!("Guardian{}", membership_id),
                "bungieGlobalDisplayNameCode": 1234
            },
            "characterClass": class,
            "classHash": 0,
            "lightLevel": 1810,
            "emblemHash": 2_962_058_744i64
        },
        "characterId": character_id,
        "values": {
            "kills": stat(150.0),
            "deaths": stat(deaths),
            "assists": stat(20.0),
            "killsDeathsRatio": stat(150.0),
            "killsDeathsAssists": stat(160.0),
            "timePlayedSeconds": stat(3600.0),
            "completed": stat(1.0),
            "activityDurationSeconds": stat(3720.0)
        },
        "extended": {
            "weapons": [
                {
                    "referenceId": 1_763_584_999,
                    "values": {
                        "uniqueWeaponKills": stat(90.0),
                        "uniqueWeaponPrecisionKills": stat(60.0),
                        "uniqueWeaponKillsPrecisionKills": stat(0.75)
                    }
                }
            ],
            "values": {
                "weaponKillsGrenade": stat(7.0),
                "weaponKillsMelee": stat(4.0),
                "weaponKillsSuper": stat(11.0)
            }
        }
    })
}

fn raw_report(
    period: &str,
    hash: i64,
    phase: i32,
    fresh: bool,
    entries: Vec<Value>,
) -> RawActivityReport {
    serde_json::from_value(json!({
        "period": period,
        "startingPhaseIndex": phase,
        "activityWasStartedFromBeginning": fresh,
        "activityDetails": {
            "referenceId": hash,
            "directorActivityHash": hash,
            "instanceId": "13208431776",
            "mode": 4,
            "modes": [4, 7],
            "isPrivate": false,
            "membershipType": 3
        },
        "entries": entries
    }))
    .expect("fixture must deserialize")
}

fn manifest() -> Arc<InMemoryManifest> {
    Arc::new(
        InMemoryManifest::new()
            .with_entry(KINGS_FALL_HASH, ManifestEntry::named("King's Fall: Expert"))
            .with_entry(LEVIATHAN_HASH, ManifestEntry::named("Leviathan: Normal")),
    )
}

fn normalizer(manifest: Arc<InMemoryManifest>) -> Normalizer {
    Normalizer::new(
        Arc::new(ActivityTaxonomy::new()),
        Arc::new(FreshnessResolver::default()),
        manifest,
    )
}

#[tokio::test]
async fn flawless_trio_after_newest_boundary() {
    let manifest = manifest();
    let raw = raw_report(
        "2023-11-02T19:30:00Z",
        KINGS_FALL_HASH,
        0,
        true,
        vec![
            entry("4611686018467284386", "2305843009301648414", 0.0, "Titan"),
            entry("4611686018471180200", "2305843009299740046", 0.0, "Warlock"),
            entry("4611686018488107374", "2305843009265042115", 0.0, "Hunter"),
        ],
    );

    let report = normalizer(manifest.clone()).normalize(&raw).await.unwrap();

    assert_eq!(manifest.lookup_count(), 1);
    assert_eq!(report.instance_id, 13_208_431_776);
    assert_eq!(report.activity_name, ActivityName::KingsFall);
    assert_eq!(report.difficulty, Difficulty::ChallengeMode);
    assert!(report.trio && report.flawless && report.from_beginning);
    assert!(!report.solo && !report.duo);
    assert_eq!(report.duration_seconds(), 3720);
    assert_eq!(report.participants[0].display_name, "Guardian4611686018467284386");
    assert_eq!(report.participants[0].display_name_code, Some(1234));

    let character = &report.participants[1].characters[0];
    assert_eq!(character.abilities.super_kills, 11);
    assert_eq!(character.weapons[0].weapon_hash, 1_763_584_999);
    assert_eq!(character.kills_deaths_ratio, 150.0);

    let contributions = AggregateContribution::for_report(&report);
    assert_eq!(contributions.len(), 3);
    for c in &contributions {
        assert_eq!(c.clears, 1);
        assert_eq!(c.full_clears, 1);
        assert!(c.flags.trio && c.flags.trio_flawless);
    }
}

#[tokio::test]
async fn repeated_clears_accumulate_on_the_aggregate() {
    let raw = raw_report(
        "2023-11-02T19:30:00Z",
        KINGS_FALL_HASH,
        0,
        true,
        vec![
            entry("1", "10", 0.0, "Titan"),
            entry("2", "20", 0.0, "Warlock"),
            entry("3", "30", 0.0, "Hunter"),
        ],
    );
    let report = normalizer(manifest()).normalize(&raw).await.unwrap();

    let first = AggregateContribution::for_report(&report).remove(0);
    let mut aggregate = PlayerRaidAggregate::empty(first.key);
    aggregate.merge(&first);
    aggregate.merge(&first);

    assert_eq!(aggregate.clears, 2);
    assert_eq!(aggregate.full_clears, 2);
    assert_eq!(aggregate.kills, 300);
    assert!(aggregate.flags.trio && aggregate.flags.trio_flawless);
    assert_eq!(aggregate.hours_played, 2.0);
}

#[tokio::test]
async fn one_death_breaks_flawless_for_everyone() {
    let raw = raw_report(
        "2023-11-02T19:30:00Z",
        KINGS_FALL_HASH,
        0,
        true,
        vec![
            entry("1", "10", 0.0, "Titan"),
            entry("2", "20", 1.0, "Warlock"),
        ],
    );
    let report = normalizer(manifest()).normalize(&raw).await.unwrap();

    assert!(report.duo);
    assert!(!report.flawless);
}

#[tokio::test]
async fn leviathan_phase_heuristics_before_first_boundary() {
    let fresh_checkpoint = raw_report(
        "2019-02-12T18:00:00Z",
        LEVIATHAN_HASH,
        2,
        false,
        vec![entry("1", "10", 3.0, "Hunter")],
    );
    let report = normalizer(manifest())
        .normalize(&fresh_checkpoint)
        .await
        .unwrap();
    assert_eq!(report.activity_name, ActivityName::Leviathan);
    assert!(report.from_beginning);

    let mid_run = raw_report(
        "2019-02-12T18:00:00Z",
        LEVIATHAN_HASH,
        1,
        true,
        vec![entry("1", "10", 3.0, "Hunter")],
    );
    let report = normalizer(manifest()).normalize(&mid_run).await.unwrap();
    assert!(!report.from_beginning);
}

#[tokio::test]
async fn flawless_proves_freshness_in_middle_era() {
    let raw = raw_report(
        "2022-04-01T18:00:00Z",
        KINGS_FALL_HASH,
        3,
        false,
        vec![entry("1", "10", 0.0, "Titan"), entry("2", "20", 0.0, "Titan")],
    );
    let report = normalizer(manifest()).normalize(&raw).await.unwrap();
    assert!(report.from_beginning);
}

#[tokio::test]
async fn unknown_activity_hash_is_a_lookup_failure() {
    let raw = raw_report(
        "2023-11-02T19:30:00Z",
        1,
        0,
        true,
        vec![entry("1", "10", 0.0, "Titan")],
    );
    let err = normalizer(manifest()).normalize(&raw).await.unwrap_err();

    assert!(matches!(err, ReportError::ManifestLookup { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn envelope_with_empty_entries_is_malformed() {
    let envelope: RawReportEnvelope = serde_json::from_value(json!({
        "Response": {
            "period": "2023-11-02T19:30:00Z",
            "activityDetails": {
                "directorActivityHash": KINGS_FALL_HASH,
                "instanceId": "13208431777"
            },
            "entries": []
        },
        "ErrorCode": 1,
        "ErrorStatus": "Success"
    }))
    .unwrap();

    let raw = envelope.response.unwrap();
    let err = normalizer(manifest()).normalize(&raw).await.unwrap_err();
    assert!(matches!(err, ReportError::MalformedReport(_)));
    assert!(!err.is_retryable());
}

#[test]
fn taxonomy_aliases() {
    let taxonomy = ActivityTaxonomy::new();

    let vog = taxonomy.resolve("Vault of Glass: Standard").unwrap();
    assert_eq!(
        (vog.name, vog.difficulty),
        (ActivityName::VaultOfGlass, Difficulty::Normal)
    );

    let kf = taxonomy.resolve("King's Fall: Expert").unwrap();
    assert_eq!(
        (kf.name, kf.difficulty),
        (ActivityName::KingsFall, Difficulty::ChallengeMode)
    );

    let lw = taxonomy.resolve("Last Wish").unwrap();
    assert_eq!(
        (lw.name, lw.difficulty),
        (ActivityName::LastWish, Difficulty::Normal)
    );
}

#[test]
fn normalized_report_survives_blob_round_trip() {
    let raw = raw_report(
        "2023-11-02T19:30:00Z",
        KINGS_FALL_HASH,
        0,
        true,
        vec![entry("1", "10", 0.0, "Titan"), entry("1", "11", 0.0, "Hunter")],
    );
    let report = tokio_test::block_on(normalizer(manifest()).normalize(&raw)).unwrap();

    let blob = shared::codec::encode(&report).unwrap();
    let decoded: domain::models::NormalizedActivityReport = shared::codec::decode(&blob).unwrap();
    assert_eq!(decoded, report);
    assert_eq!(decoded.participants[0].characters.len(), 2);
}

fn ratio() -> f64 {
    let kills: u32 = (0..2_000).fake();
    let deaths: u32 = (1..300).fake();
    kills as f64 / deaths as f64
}

fn random_character(character_id: i64) -> CharacterRecord {
    let weapon_count: usize = (0..4).fake();
    CharacterRecord {
        character_id,
        class: CharacterClass::Warlock,
        light_level: (1_000..2_000).fake(),
        completed: (0..2).fake::<u8>() == 1,
        kills: (0..2_000).fake(),
        deaths: (0..300).fake(),
        assists: (0..500).fake(),
        kills_deaths_ratio: ratio(),
        kills_deaths_assists: ratio() + (0.0..1.0).fake::<f64>(),
        time_played_seconds: (0..20_000).fake(),
        emblem_hash: (1..4_000_000_000i64).fake(),
        abilities: AbilityKills {
            melee: (0..100).fake(),
            grenade: (0..100).fake(),
            super_kills: (0..100).fake(),
        },
        weapons: (0..weapon_count)
            .map(|_| WeaponUsageRecord {
                weapon_hash: (1..4_000_000_000i64).fake(),
                kills: (0..500).fake(),
                precision_kills: (0..500).fake(),
                precision_ratio: (0.0..1.0).fake(),
            })
            .collect(),
    }
}

fn random_report() -> NormalizedActivityReport {
    let start_time = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
        + Duration::seconds((0..150_000_000i64).fake());
    let players: usize = (1..7).fake();
    let participants = (0..players)
        .map(|i| ParticipantRecord {
            membership_id: 4_611_686_018_000_000_000 + i as i64,
            membership_type: 3,
            display_name: format!("Guardian{}", (0..10_000).fake::<u32>()),
            display_name_code: Some((0..10_000).fake()),
            characters: (0..(1..3).fake::<i64>())
                .map(|c| random_character(2_305_843_009_000_000_000 + i as i64 * 10 + c))
                .collect(),
        })
        .collect();

    NormalizedActivityReport {
        instance_id: (1..20_000_000_000i64).fake(),
        start_time,
        end_time: start_time + Duration::seconds((60..20_000i64).fake()),
        activity_name: ActivityName::VaultOfGlass,
        difficulty: Difficulty::ChallengeMode,
        activity_hash: (1..4_000_000_000i64).fake(),
        flawless: (0..2).fake::<u8>() == 1,
        solo: players == 1,
        duo: players == 2,
        trio: players == 3,
        from_beginning: (0..2).fake::<u8>() == 1,
        participants,
    }
}

#[test]
fn randomized_reports_survive_blob_round_trip() {
    for _ in 0..300 {
        let report = random_report();
        let blob = shared::codec::encode(&report).unwrap();
        let decoded: NormalizedActivityReport = shared::codec::decode(&blob).unwrap();
        assert_eq!(decoded, report);
    }
}
