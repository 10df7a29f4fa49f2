//! Player identity repository.

use chrono::{DateTime, Utc};
use domain::models::ParticipantRecord;
use sqlx::{PgConnection, PgPool};

use crate::entities::{PlayerCharacterEntity, PlayerEntity};
use crate::metrics::QueryTimer;

/// Repository for the player and player_character tables.
#[derive(Clone)]
pub struct PlayerRepository {
    pool: PgPool,
}

impl PlayerRepository {
    /// Creates a new PlayerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert a participant and each of their characters.
    ///
    /// `last_seen` only moves forward, so an older report delivered late
    /// does not roll it back. Character emblems always take the new value.
    pub async fn upsert_participant(
        &self,
        conn: &mut PgConnection,
        participant: &ParticipantRecord,
        seen_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("upsert_player");
        let result = sqlx::query(
            r#"
            INSERT INTO player (membership_id, membership_type, display_name, display_name_code, last_seen)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (membership_id) DO UPDATE
            SET last_seen = GREATEST(player.last_seen, EXCLUDED.last_seen),
                display_name = EXCLUDED.display_name,
                display_name_code = EXCLUDED.display_name_code
            "#,
        )
        .bind(participant.membership_id)
        .bind(participant.membership_type)
        .bind(&participant.display_name)
        .bind(participant.display_name_code)
        .bind(seen_at)
        .execute(&mut *conn)
        .await;
        timer.finish(result)?;

        for character in &participant.characters {
            let timer = QueryTimer::new("upsert_player_character");
            let result = sqlx::query(
                r#"
                INSERT INTO player_character (character_id, player_membership_id, character_class, current_emblem)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (character_id) DO UPDATE
                SET current_emblem = EXCLUDED.current_emblem
                "#,
            )
            .bind(character.character_id)
            .bind(participant.membership_id)
            .bind(character.class.as_str())
            .bind(character.emblem_hash)
            .execute(&mut *conn)
            .await;
            timer.finish(result)?;
        }

        Ok(())
    }

    /// Find a player by membership id.
    pub async fn find_by_membership_id(
        &self,
        membership_id: i64,
    ) -> Result<Option<PlayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_player");
        let result = sqlx::query_as::<_, PlayerEntity>(
            r#"
            SELECT membership_id, membership_type, display_name, display_name_code, last_seen
            FROM player
            WHERE membership_id = $1
            "#,
        )
        .bind(membership_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// List a player's known characters.
    pub async fn find_characters(
        &self,
        membership_id: i64,
    ) -> Result<Vec<PlayerCharacterEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_player_characters");
        let result = sqlx::query_as::<_, PlayerCharacterEntity>(
            r#"
            SELECT character_id, player_membership_id, character_class, current_emblem
            FROM player_character
            WHERE player_membership_id = $1
            ORDER BY character_id
            "#,
        )
        .bind(membership_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }
}
