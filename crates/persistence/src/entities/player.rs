//! Player identity entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the player table.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerEntity {
    pub membership_id: i64,
    pub membership_type: i32,
    pub display_name: String,
    pub display_name_code: Option<i32>,
    pub last_seen: DateTime<Utc>,
}

/// Database row mapping for the player_character table.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerCharacterEntity {
    pub character_id: i64,
    pub player_membership_id: i64,
    pub character_class: String,
    pub current_emblem: i64,
}
