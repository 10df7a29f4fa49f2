//! Weapon catalog repository.

use sqlx::{PgConnection, PgPool};

use crate::entities::WeaponEntity;
use crate::metrics::QueryTimer;

/// Repository for the weapon table.
#[derive(Clone)]
pub struct WeaponRepository {
    pool: PgPool,
}

impl WeaponRepository {
    /// Creates a new WeaponRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or refresh a weapon's display metadata.
    pub async fn upsert(
        &self,
        conn: &mut PgConnection,
        weapon: &WeaponEntity,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("upsert_weapon");
        let result = sqlx::query(
            r#"
            INSERT INTO weapon (weapon_hash, name, icon, damage_type, equipment_slot)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (weapon_hash) DO UPDATE
            SET name = EXCLUDED.name,
                icon = EXCLUDED.icon,
                damage_type = EXCLUDED.damage_type,
                equipment_slot = EXCLUDED.equipment_slot
            "#,
        )
        .bind(weapon.weapon_hash)
        .bind(&weapon.name)
        .bind(&weapon.icon)
        .bind(&weapon.damage_type)
        .bind(&weapon.equipment_slot)
        .execute(conn)
        .await;
        timer.finish(result).map(|_| ())
    }

    /// Find a weapon by hash.
    pub async fn find_by_hash(
        &self,
        weapon_hash: i64,
    ) -> Result<Option<WeaponEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_weapon");
        let result = sqlx::query_as::<_, WeaponEntity>(
            r#"
            SELECT weapon_hash, name, icon, damage_type, equipment_slot
            FROM weapon
            WHERE weapon_hash = $1
            "#,
        )
        .bind(weapon_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }
}
