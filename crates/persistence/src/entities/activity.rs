//! Activity catalog entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{ActivityIdentity, ActivityName, Difficulty};
use sqlx::FromRow;

/// Database row mapping for the activity table.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityEntity {
    pub activity_name: String,
    pub difficulty: String,
    pub is_active: bool,
    pub release_date: DateTime<Utc>,
}

impl ActivityEntity {
    /// Catalog row for an activity identity, filled from the static raid calendar.
    pub fn from_identity(identity: ActivityIdentity) -> Self {
        Self {
            activity_name: identity.name.as_str().to_string(),
            difficulty: identity.difficulty.as_str().to_string(),
            is_active: identity.name.is_active(),
            release_date: identity.name.release_date(),
        }
    }
}

/// Database row mapping for the activity_hash table.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityHashEntity {
    pub activity_hash: i64,
    pub activity_name: String,
    pub difficulty: String,
}

impl TryFrom<ActivityHashEntity> for ActivityIdentity {
    type Error = String;

    fn try_from(entity: ActivityHashEntity) -> Result<Self, Self::Error> {
        Ok(ActivityIdentity {
            name: entity.activity_name.parse::<ActivityName>()?,
            difficulty: entity.difficulty.parse::<Difficulty>()?,
        })
    }
}
