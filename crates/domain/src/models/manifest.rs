//! Manifest metadata for activity and weapon hashes.

use serde::{Deserialize, Serialize};

use super::activity::{EquipmentSlot, WeaponDamageType};

/// Display metadata stored in the manifest cache under a decimal hash key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub display_properties: DisplayProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipping_block: Option<EquippingBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayProperties {
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

/// Weapon-only equipment data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquippingBlock {
    #[serde(default)]
    pub ammo_type: i32,
    #[serde(default)]
    pub equipment_slot_type_hash: i64,
}

impl ManifestEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            display_properties: DisplayProperties {
                name: name.into(),
                icon: String::new(),
            },
            equipping_block: None,
        }
    }

    pub fn damage_type(&self) -> WeaponDamageType {
        self.equipping_block
            .map(|block| WeaponDamageType::from_ammo_type(block.ammo_type))
            .unwrap_or(WeaponDamageType::Unknown)
    }

    pub fn equipment_slot(&self) -> EquipmentSlot {
        self.equipping_block
            .map(|block| EquipmentSlot::from_slot_hash(block.equipment_slot_type_hash))
            .unwrap_or(EquipmentSlot::Unknown)
    }
}
