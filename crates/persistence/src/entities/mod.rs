//! Database entity definitions.
//!
//! Entities map directly to database rows. Activity, difficulty and class
//! columns are stored as TEXT using the domain enums' `as_str` names.

pub mod activity;
pub mod instance_stats;
pub mod player;
pub mod player_activity_stats;
pub mod raw_activity_report;
pub mod weapon;

pub use activity::{ActivityEntity, ActivityHashEntity};
pub use instance_stats::{InstanceActivityStatsEntity, InstanceWeaponStatsEntity};
pub use player::{PlayerCharacterEntity, PlayerEntity};
pub use player_activity_stats::PlayerActivityStatsEntity;
pub use raw_activity_report::RawActivityReportEntity;
pub use weapon::WeaponEntity;
