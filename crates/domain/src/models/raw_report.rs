//! Raw activity report as delivered by the upstream statistics API.
//!
//! The upstream document is loosely typed: identifiers are decimal strings
//! and every statistic lives in a string-keyed map of float values. The
//! structs below mirror that shape; [`RawMetrics`] is the only place where
//! metric keys are looked up, and a missing required key becomes
//! [`ReportError::MalformedReport`].

use serde::{Deserialize, Serialize};
use shared::validation;
use std::collections::HashMap;

use crate::error::ReportError;

/// Metric keys read from each participant entry.
pub mod metric {
    pub const KILLS: &str = "kills";
    pub const DEATHS: &str = "deaths";
    pub const ASSISTS: &str = "assists";
    pub const KILLS_DEATHS_RATIO: &str = "killsDeathsRatio";
    pub const KILLS_DEATHS_ASSISTS: &str = "killsDeathsAssists";
    pub const TIME_PLAYED_SECONDS: &str = "timePlayedSeconds";
    pub const COMPLETED: &str = "completed";
    pub const ACTIVITY_DURATION_SECONDS: &str = "activityDurationSeconds";

    pub const MELEE_KILLS: &str = "weaponKillsMelee";
    pub const GRENADE_KILLS: &str = "weaponKillsGrenade";
    pub const SUPER_KILLS: &str = "weaponKillsSuper";

    pub const WEAPON_KILLS: &str = "uniqueWeaponKills";
    pub const WEAPON_PRECISION_KILLS: &str = "uniqueWeaponPrecisionKills";
    pub const WEAPON_PRECISION_RATIO: &str = "uniqueWeaponKillsPrecisionKills";
}

/// Envelope returned by the report endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawReportEnvelope {
    pub response: Option<RawActivityReport>,
    pub error_code: i32,
    #[serde(default)]
    pub error_status: String,
    #[serde(default)]
    pub throttle_seconds: i32,
}

/// One completed activity as reported upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivityReport {
    /// Start timestamp, RFC3339.
    pub period: String,
    #[serde(default)]
    pub starting_phase_index: i32,
    #[serde(default)]
    pub activity_was_started_from_beginning: bool,
    pub activity_details: RawActivityDetails,
    #[serde(default)]
    pub entries: Vec<RawParticipantEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivityDetails {
    #[serde(default)]
    pub reference_id: i64,
    pub director_activity_hash: i64,
    /// Decimal string.
    pub instance_id: String,
    #[serde(default)]
    pub mode: i32,
    #[serde(default)]
    pub modes: Vec<i32>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub membership_type: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParticipantEntry {
    pub player: RawPlayer,
    /// Decimal string.
    pub character_id: String,
    pub values: RawMetrics,
    #[serde(default)]
    pub extended: Option<RawExtendedStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayer {
    pub destiny_user_info: RawUserInfo,
    #[serde(default)]
    pub character_class: String,
    #[serde(default)]
    pub class_hash: i64,
    #[serde(default)]
    pub race_hash: i64,
    #[serde(default)]
    pub gender_hash: i64,
    #[serde(default)]
    pub light_level: i32,
    #[serde(default)]
    pub emblem_hash: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUserInfo {
    /// Decimal string.
    pub membership_id: String,
    pub membership_type: i32,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub bungie_global_display_name: Option<String>,
    #[serde(default)]
    pub bungie_global_display_name_code: Option<i32>,
    #[serde(default)]
    pub icon_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtendedStats {
    #[serde(default)]
    pub weapons: Vec<RawWeaponUsage>,
    #[serde(default)]
    pub values: RawMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWeaponUsage {
    pub reference_id: i64,
    pub values: RawMetrics,
}

/// A single statistic: `{ "basic": { "value": 12.0, "displayValue": "12" } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStat {
    pub basic: RawStatValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatValue {
    pub value: f64,
    #[serde(default)]
    pub display_value: String,
}

/// Typed accessor over a string-keyed metric map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMetrics(HashMap<String, RawStat>);

impl RawMetrics {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Builder used by fixtures.
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        self.0.insert(
            key.to_string(),
            RawStat {
                basic: RawStatValue {
                    value,
                    display_value: value.to_string(),
                },
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).map(|stat| stat.basic.value)
    }

    /// Value of a metric that must be present.
    pub fn require(&self, key: &str) -> Result<f64, ReportError> {
        self.get(key)
            .ok_or_else(|| ReportError::malformed(format!("missing metric '{}'", key)))
    }

    pub fn count(&self, key: &str) -> Result<i32, ReportError> {
        Ok(validation::validate_count(key, self.require(key)?)?)
    }

    /// Counter that the upstream API omits when it is zero.
    pub fn count_or_zero(&self, key: &str) -> Result<i32, ReportError> {
        match self.get(key) {
            Some(value) => Ok(validation::validate_count(key, value)?),
            None => Ok(0),
        }
    }

    pub fn seconds(&self, key: &str) -> Result<i64, ReportError> {
        Ok(validation::validate_seconds(key, self.require(key)?)?)
    }

    pub fn ratio(&self, key: &str) -> Result<f64, ReportError> {
        Ok(validation::validate_ratio(key, self.require(key)?)?)
    }

    pub fn ratio_or_zero(&self, key: &str) -> Result<f64, ReportError> {
        match self.get(key) {
            Some(value) => Ok(validation::validate_ratio(key, value)?),
            None => Ok(0.0),
        }
    }

    pub fn flag(&self, key: &str) -> Result<bool, ReportError> {
        Ok(validation::validate_flag(key, self.require(key)?)?)
    }
}

impl RawUserInfo {
    /// Global display name when the player has one.
    pub fn global_name(&self) -> Option<&str> {
        self.bungie_global_display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Parses a decimal identifier field.
pub fn parse_id(field: &str, value: &str) -> Result<i64, ReportError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ReportError::malformed(format!("{} '{}' is not an int64", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metrics_deserialize_from_upstream_shape() {
        let metrics: RawMetrics = serde_json::from_value(json!({
            "kills": { "basic": { "value": 42.0, "displayValue": "42" } },
            "killsDeathsRatio": { "basic": { "value": 21.0, "displayValue": "21.00" } }
        }))
        .unwrap();

        assert_eq!(metrics.count(metric::KILLS).unwrap(), 42);
        assert_eq!(metrics.ratio(metric::KILLS_DEATHS_RATIO).unwrap(), 21.0);
    }

    #[test]
    fn test_missing_required_metric_is_malformed() {
        let metrics = RawMetrics::new().with(metric::KILLS, 3.0);
        let err = metrics.count(metric::DEATHS).unwrap_err();
        assert!(matches!(err, ReportError::MalformedReport(_)));
        assert_eq!(err.to_string(), "Malformed report: missing metric 'deaths'");
    }

    #[test]
    fn test_optional_counter_defaults_to_zero() {
        let metrics = RawMetrics::new();
        assert_eq!(metrics.count_or_zero(metric::SUPER_KILLS).unwrap(), 0);
        assert_eq!(metrics.ratio_or_zero(metric::WEAPON_PRECISION_RATIO).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_counter_value_is_malformed() {
        let metrics = RawMetrics::new().with(metric::KILLS, 2.5);
        assert!(matches!(
            metrics.count(metric::KILLS),
            Err(ReportError::MalformedReport(_))
        ));
    }

    #[test]
    fn test_flag_metric() {
        let metrics = RawMetrics::new().with(metric::COMPLETED, 1.0);
        assert!(metrics.flag(metric::COMPLETED).unwrap());
    }

    #[test]
    fn test_global_name_ignores_blank() {
        let info = RawUserInfo {
            membership_id: "1".into(),
            membership_type: 3,
            display_name: "legacy".into(),
            bungie_global_display_name: Some("  ".into()),
            bungie_global_display_name_code: Some(12),
            icon_path: None,
        };
        assert_eq!(info.global_name(), None);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(
            parse_id("membershipId", "4611686018467284386").unwrap(),
            4_611_686_018_467_284_386
        );
        assert!(matches!(
            parse_id("membershipId", "abc"),
            Err(ReportError::MalformedReport(_))
        ));
    }

    #[test]
    fn test_envelope_deserializes() {
        let envelope: RawReportEnvelope = serde_json::from_value(json!({
            "Response": {
                "period": "2023-09-01T17:00:00Z",
                "startingPhaseIndex": 0,
                "activityWasStartedFromBeginning": true,
                "activityDetails": {
                    "directorActivityHash": 4179289725i64,
                    "instanceId": "13541829810"
                },
                "entries": []
            },
            "ErrorCode": 1,
            "ErrorStatus": "Success",
            "ThrottleSeconds": 0
        }))
        .unwrap();

        let report = envelope.response.unwrap();
        assert_eq!(report.activity_details.instance_id, "13541829810");
        assert_eq!(report.activity_details.director_activity_hash, 4_179_289_725);
        assert!(report.entries.is_empty());
    }
}
