//! Closed activity, difficulty and character enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::game_time::{fixed_instant, PacificInstant, PacificZone};
use std::fmt;

// ============================================================================
// Activity names
// ============================================================================

/// Every raid the pipeline knows about.
///
/// Adding a raid means adding a variant here and a row to
/// [`ActivityName::ALL`]; the label table in the taxonomy is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityName {
    SalvationsEdge,
    CrotasEnd,
    RootOfNightmares,
    KingsFall,
    VowOfTheDisciple,
    VaultOfGlass,
    DeepStoneCrypt,
    GardenOfSalvation,
    CrownOfSorrow,
    LastWish,
    SpireOfStars,
    EaterOfWorlds,
    Leviathan,
    ScourgeOfThePast,
}

impl ActivityName {
    pub const ALL: [ActivityName; 14] = [
        ActivityName::SalvationsEdge,
        ActivityName::CrotasEnd,
        ActivityName::RootOfNightmares,
        ActivityName::KingsFall,
        ActivityName::VowOfTheDisciple,
        ActivityName::VaultOfGlass,
        ActivityName::DeepStoneCrypt,
        ActivityName::GardenOfSalvation,
        ActivityName::CrownOfSorrow,
        ActivityName::LastWish,
        ActivityName::SpireOfStars,
        ActivityName::EaterOfWorlds,
        ActivityName::Leviathan,
        ActivityName::ScourgeOfThePast,
    ];

    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityName::SalvationsEdge => "SALVATIONS_EDGE",
            ActivityName::CrotasEnd => "CROTAS_END",
            ActivityName::RootOfNightmares => "ROOT_OF_NIGHTMARES",
            ActivityName::KingsFall => "KINGS_FALL",
            ActivityName::VowOfTheDisciple => "VOW_OF_THE_DISCIPLE",
            ActivityName::VaultOfGlass => "VAULT_OF_GLASS",
            ActivityName::DeepStoneCrypt => "DEEP_STONE_CRYPT",
            ActivityName::GardenOfSalvation => "GARDEN_OF_SALVATION",
            ActivityName::CrownOfSorrow => "CROWN_OF_SORROW",
            ActivityName::LastWish => "LAST_WISH",
            ActivityName::SpireOfStars => "SPIRE_OF_STARS",
            ActivityName::EaterOfWorlds => "EATER_OF_WORLDS",
            ActivityName::Leviathan => "LEVIATHAN",
            ActivityName::ScourgeOfThePast => "SCOURGE_OF_THE_PAST",
        }
    }

    /// Display label as it appears in the manifest.
    ///
    /// Leviathan raid lairs use a comma so the label never collides with the
    /// `Name: Difficulty` separator.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityName::SalvationsEdge => "Salvation's Edge",
            ActivityName::CrotasEnd => "Crota's End",
            ActivityName::RootOfNightmares => "Root of Nightmares",
            ActivityName::KingsFall => "King's Fall",
            ActivityName::VowOfTheDisciple => "Vow of the Disciple",
            ActivityName::VaultOfGlass => "Vault of Glass",
            ActivityName::DeepStoneCrypt => "Deep Stone Crypt",
            ActivityName::GardenOfSalvation => "Garden of Salvation",
            ActivityName::CrownOfSorrow => "Crown of Sorrow",
            ActivityName::LastWish => "Last Wish",
            ActivityName::SpireOfStars => "Leviathan, Spire of Stars",
            ActivityName::EaterOfWorlds => "Leviathan, Eater of Worlds",
            ActivityName::Leviathan => "Leviathan",
            ActivityName::ScourgeOfThePast => "Scourge of the Past",
        }
    }

    /// Whether the raid is still playable in the current game.
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            ActivityName::CrownOfSorrow
                | ActivityName::SpireOfStars
                | ActivityName::EaterOfWorlds
                | ActivityName::Leviathan
                | ActivityName::ScourgeOfThePast
        )
    }

    /// Launch instant of the raid's first race.
    pub fn release_instant(&self) -> PacificInstant {
        use PacificZone::{Daylight, Standard};
        match self {
            ActivityName::SalvationsEdge => PacificInstant::new(2024, 6, 7, 9, Daylight),
            ActivityName::CrotasEnd => PacificInstant::new(2023, 9, 1, 9, Daylight),
            ActivityName::RootOfNightmares => PacificInstant::new(2023, 3, 10, 9, Standard),
            ActivityName::KingsFall => PacificInstant::new(2022, 8, 26, 9, Daylight),
            ActivityName::VowOfTheDisciple => PacificInstant::new(2022, 3, 5, 9, Standard),
            ActivityName::VaultOfGlass => PacificInstant::new(2021, 5, 22, 9, Daylight),
            ActivityName::DeepStoneCrypt => PacificInstant::new(2020, 11, 21, 9, Standard),
            ActivityName::GardenOfSalvation => PacificInstant::new(2019, 10, 5, 9, Daylight),
            ActivityName::CrownOfSorrow => PacificInstant::new(2019, 6, 4, 9, Daylight),
            ActivityName::LastWish => PacificInstant::new(2018, 9, 14, 9, Daylight),
            ActivityName::ScourgeOfThePast => PacificInstant::new(2018, 12, 7, 9, Standard),
            ActivityName::SpireOfStars => PacificInstant::new(2018, 5, 8, 9, Daylight),
            ActivityName::EaterOfWorlds => PacificInstant::new(2017, 12, 6, 9, Standard),
            ActivityName::Leviathan => PacificInstant::new(2017, 9, 13, 9, Daylight),
        }
    }

    pub fn release_date(&self) -> DateTime<Utc> {
        fixed_instant(self.release_instant())
    }
}

impl fmt::Display for ActivityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActivityName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("Invalid activity name: {}", s))
    }
}

// ============================================================================
// Difficulty
// ============================================================================

/// Raid difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Normal,
    Prestige,
    Master,
    GuidedGames,
    ChallengeMode,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Normal,
        Difficulty::Prestige,
        Difficulty::Master,
        Difficulty::GuidedGames,
        Difficulty::ChallengeMode,
    ];

    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Normal => "NORMAL",
            Difficulty::Prestige => "PRESTIGE",
            Difficulty::Master => "MASTER",
            Difficulty::GuidedGames => "GUIDED_GAMES",
            Difficulty::ChallengeMode => "CHALLENGE_MODE",
        }
    }

    /// Display label as it appears after the colon in a manifest name.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Prestige => "Prestige",
            Difficulty::Master => "Master",
            Difficulty::GuidedGames => "Guided Games",
            Difficulty::ChallengeMode => "Challenge Mode",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .iter()
            .copied()
            .find(|difficulty| difficulty.as_str() == s)
            .ok_or_else(|| format!("Invalid difficulty: {}", s))
    }
}

/// Resolved identity of an activity hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityIdentity {
    pub name: ActivityName,
    pub difficulty: Difficulty,
}

// ============================================================================
// Character class
// ============================================================================

/// Guardian class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CharacterClass {
    Titan,
    Warlock,
    Hunter,
}

impl CharacterClass {
    const TITAN_HASH: i64 = 3_655_393_761;
    const HUNTER_HASH: i64 = 671_679_327;
    const WARLOCK_HASH: i64 = 2_271_682_572;

    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Titan => "TITAN",
            CharacterClass::Warlock => "WARLOCK",
            CharacterClass::Hunter => "HUNTER",
        }
    }

    /// Parses the class label used by the report API ("Titan", "Hunter", ...).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            l if l.eq_ignore_ascii_case("Titan") => Some(CharacterClass::Titan),
            l if l.eq_ignore_ascii_case("Warlock") => Some(CharacterClass::Warlock),
            l if l.eq_ignore_ascii_case("Hunter") => Some(CharacterClass::Hunter),
            _ => None,
        }
    }

    /// Resolves a class definition hash.
    pub fn from_hash(hash: i64) -> Option<Self> {
        match hash {
            Self::TITAN_HASH => Some(CharacterClass::Titan),
            Self::WARLOCK_HASH => Some(CharacterClass::Warlock),
            Self::HUNTER_HASH => Some(CharacterClass::Hunter),
            _ => None,
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Weapon classification
// ============================================================================

/// Ammunition category a weapon draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponDamageType {
    Primary,
    Special,
    Heavy,
    Unknown,
}

impl WeaponDamageType {
    pub fn from_ammo_type(ammo_type: i32) -> Self {
        match ammo_type {
            1 => WeaponDamageType::Primary,
            2 => WeaponDamageType::Special,
            3 => WeaponDamageType::Heavy,
            _ => WeaponDamageType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponDamageType::Primary => "PRIMARY",
            WeaponDamageType::Special => "SPECIAL",
            WeaponDamageType::Heavy => "HEAVY",
            WeaponDamageType::Unknown => "UNKNOWN",
        }
    }
}

/// Inventory slot a weapon is equipped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentSlot {
    Kinetic,
    Energy,
    Power,
    Unknown,
}

impl EquipmentSlot {
    const KINETIC_HASH: i64 = 1_498_876_634;
    const ENERGY_HASH: i64 = 2_465_295_065;
    const POWER_HASH: i64 = 953_998_645;

    pub fn from_slot_hash(hash: i64) -> Self {
        match hash {
            Self::KINETIC_HASH => EquipmentSlot::Kinetic,
            Self::ENERGY_HASH => EquipmentSlot::Energy,
            Self::POWER_HASH => EquipmentSlot::Power,
            _ => EquipmentSlot::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentSlot::Kinetic => "KINETIC",
            EquipmentSlot::Energy => "ENERGY",
            EquipmentSlot::Power => "POWER",
            EquipmentSlot::Unknown => "UNKNOWN",
        }
    }
}
