//! Repository implementations for database operations.
//!
//! Write methods take a caller-supplied connection so one report's writes
//! share a single transaction. Read methods use the pool.

pub mod activity;
pub mod instance_stats;
pub mod player;
pub mod player_activity_stats;
pub mod raw_activity_report;
pub mod weapon;

pub use activity::ActivityRepository;
pub use instance_stats::InstanceStatsRepository;
pub use player::PlayerRepository;
pub use player_activity_stats::PlayerActivityStatsRepository;
pub use raw_activity_report::RawActivityReportRepository;
pub use weapon::WeaponRepository;
