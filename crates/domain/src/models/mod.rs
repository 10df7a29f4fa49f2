//! Domain models for the raid report pipeline.

pub mod activity;
pub mod aggregate;
pub mod manifest;
pub mod raw_report;
pub mod report;

pub use activity::{
    ActivityIdentity, ActivityName, CharacterClass, Difficulty, EquipmentSlot, WeaponDamageType,
};
pub use aggregate::{AchievementFlags, AggregateContribution, AggregateKey, PlayerRaidAggregate};
pub use manifest::ManifestEntry;
pub use raw_report::{RawActivityReport, RawMetrics, RawParticipantEntry, RawReportEnvelope};
pub use report::{
    AbilityKills, CharacterRecord, NormalizedActivityReport, ParticipantRecord, WeaponUsageRecord,
};
