//! Weapon catalog entity (database row mapping).

use domain::models::ManifestEntry;
use sqlx::FromRow;

/// Database row mapping for the weapon table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WeaponEntity {
    pub weapon_hash: i64,
    pub name: String,
    pub icon: String,
    pub damage_type: String,
    pub equipment_slot: String,
}

impl WeaponEntity {
    pub fn from_manifest(weapon_hash: i64, entry: &ManifestEntry) -> Self {
        Self {
            weapon_hash,
            name: entry.display_properties.name.clone(),
            icon: entry.display_properties.icon.clone(),
            damage_type: entry.damage_type().as_str().to_string(),
            equipment_slot: entry.equipment_slot().as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::manifest::{DisplayProperties, EquippingBlock};

    #[test]
    fn test_weapon_from_manifest() {
        let entry = ManifestEntry {
            display_properties: DisplayProperties {
                name: "Gjallarhorn".to_string(),
                icon: "/common/gjallarhorn.jpg".to_string(),
            },
            equipping_block: Some(EquippingBlock {
                ammo_type: 3,
                equipment_slot_type_hash: 953_998_645,
            }),
        };

        let weapon = WeaponEntity::from_manifest(1_363_886_209, &entry);
        assert_eq!(weapon.name, "Gjallarhorn");
        assert_eq!(weapon.damage_type, "HEAVY");
        assert_eq!(weapon.equipment_slot, "POWER");
    }

    #[test]
    fn test_weapon_without_equipping_block() {
        let weapon = WeaponEntity::from_manifest(1, &ManifestEntry::named("Mystery"));
        assert_eq!(weapon.damage_type, "UNKNOWN");
        assert_eq!(weapon.equipment_slot, "UNKNOWN");
        assert_eq!(weapon.icon, "");
    }
}
