//! Character classes and the class families their tables are keyed by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Ability;

/// Highest level covered by the progression tables.
pub const MAX_LEVEL: u8 = 20;

/// Clamp a level into the 1..=20 range covered by the tables.
pub fn table_level(level: u8) -> u8 {
    if !(1..=MAX_LEVEL).contains(&level) {
        tracing::debug!(level, "Level outside 1-20, clamping for table lookup");
    }
    level.clamp(1, MAX_LEVEL)
}

// ============================================================================
// ClassFamily
// ============================================================================

/// Progression group used by the attack, save, and XP tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassFamily {
    #[serde(rename = "fighter-like")]
    Fighter,
    #[serde(rename = "cleric-like")]
    Cleric,
    #[serde(rename = "magic-user-like")]
    MagicUser,
    #[serde(rename = "thief-like")]
    Thief,
}

/// XP needed for each level, index is level - 1.
const FIGHTER_XP: [u32; 20] = [
    0, 2_000, 4_000, 8_000, 16_000, 32_000, 64_000, 120_000, 240_000, 360_000, 480_000, 600_000,
    720_000, 840_000, 960_000, 1_080_000, 1_200_000, 1_320_000, 1_440_000, 1_560_000,
];
const CLERIC_XP: [u32; 20] = [
    0, 1_500, 3_000, 6_000, 12_000, 24_000, 48_000, 90_000, 180_000, 270_000, 360_000, 450_000,
    540_000, 630_000, 720_000, 810_000, 900_000, 990_000, 1_080_000, 1_170_000,
];
const MAGIC_USER_XP: [u32; 20] = [
    0, 2_500, 5_000, 10_000, 20_000, 40_000, 80_000, 150_000, 300_000, 450_000, 600_000, 750_000,
    900_000, 1_050_000, 1_200_000, 1_350_000, 1_500_000, 1_650_000, 1_800_000, 1_950_000,
];
const THIEF_XP: [u32; 20] = [
    0, 1_250, 2_500, 5_000, 10_000, 20_000, 40_000, 75_000, 150_000, 225_000, 300_000, 375_000,
    450_000, 525_000, 600_000, 675_000, 750_000, 825_000, 900_000, 975_000,
];

impl ClassFamily {
    pub const ALL: [ClassFamily; 4] = [
        ClassFamily::Fighter,
        ClassFamily::Cleric,
        ClassFamily::MagicUser,
        ClassFamily::Thief,
    ];

    /// Family for a free-form class name.
    ///
    /// Names that don't parse as a known class use the fighter-like tables.
    pub fn for_class_name(name: &str) -> Self {
        match name.parse::<CharacterClass>() {
            Ok(class) => class.primary_family(),
            Err(_) => {
                tracing::warn!(class = name, "Unknown class, using fighter-like tables");
                ClassFamily::Fighter
            }
        }
    }

    pub fn xp_table(self) -> &'static [u32; 20] {
        match self {
            ClassFamily::Fighter => &FIGHTER_XP,
            ClassFamily::Cleric => &CLERIC_XP,
            ClassFamily::MagicUser => &MAGIC_USER_XP,
            ClassFamily::Thief => &THIEF_XP,
        }
    }

    /// Hit points gained per level after 9th.
    pub fn fixed_hp_after_ninth(self) -> i32 {
        match self {
            ClassFamily::Fighter | ClassFamily::Thief => 2,
            ClassFamily::Cleric | ClassFamily::MagicUser => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassFamily::Fighter => "fighter-like",
            ClassFamily::Cleric => "cleric-like",
            ClassFamily::MagicUser => "magic-user-like",
            ClassFamily::Thief => "thief-like",
        }
    }
}

impl fmt::Display for ClassFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClassFamily {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let stem = lowered.strip_suffix("-like").unwrap_or(&lowered);
        match stem {
            "fighter" => Ok(ClassFamily::Fighter),
            "cleric" => Ok(ClassFamily::Cleric),
            "magic-user" | "magic user" | "magicuser" => Ok(ClassFamily::MagicUser),
            "thief" => Ok(ClassFamily::Thief),
            _ => Err(DomainError::parse(format!("Unknown class family: {}", s))),
        }
    }
}

// ============================================================================
// CharacterClass
// ============================================================================

/// A playable class, including the elven combination classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    #[serde(rename = "cleric")]
    Cleric,
    #[serde(rename = "fighter")]
    Fighter,
    #[serde(rename = "magic-user")]
    MagicUser,
    #[serde(rename = "thief")]
    Thief,
    #[serde(rename = "fighter/magic-user")]
    FighterMagicUser,
    #[serde(rename = "magic-user/thief")]
    MagicUserThief,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 6] = [
        CharacterClass::Cleric,
        CharacterClass::Fighter,
        CharacterClass::MagicUser,
        CharacterClass::Thief,
        CharacterClass::FighterMagicUser,
        CharacterClass::MagicUserThief,
    ];

    /// The families whose tables this class draws on.
    pub fn families(self) -> &'static [ClassFamily] {
        match self {
            CharacterClass::Cleric => &[ClassFamily::Cleric],
            CharacterClass::Fighter => &[ClassFamily::Fighter],
            CharacterClass::MagicUser => &[ClassFamily::MagicUser],
            CharacterClass::Thief => &[ClassFamily::Thief],
            CharacterClass::FighterMagicUser => &[ClassFamily::Fighter, ClassFamily::MagicUser],
            CharacterClass::MagicUserThief => &[ClassFamily::MagicUser, ClassFamily::Thief],
        }
    }

    pub fn primary_family(self) -> ClassFamily {
        self.families()[0]
    }

    pub fn is_combination(self) -> bool {
        self.families().len() > 1
    }

    pub fn has_family(self, family: ClassFamily) -> bool {
        self.families().contains(&family)
    }

    /// Hit die as written in the class description.
    pub fn hit_die(self) -> &'static str {
        match self {
            CharacterClass::Cleric => "1d6",
            CharacterClass::Fighter => "1d8",
            CharacterClass::MagicUser => "1d4",
            CharacterClass::Thief => "1d4",
            CharacterClass::FighterMagicUser => "1d6",
            CharacterClass::MagicUserThief => "1d4",
        }
    }

    /// Abilities that must be at least 9 to take this class.
    pub fn prime_requisites(self) -> &'static [Ability] {
        match self {
            CharacterClass::Cleric => &[Ability::Wisdom],
            CharacterClass::Fighter => &[Ability::Strength],
            CharacterClass::MagicUser => &[Ability::Intelligence],
            CharacterClass::Thief => &[Ability::Dexterity],
            CharacterClass::FighterMagicUser => &[Ability::Strength, Ability::Intelligence],
            CharacterClass::MagicUserThief => &[Ability::Intelligence, Ability::Dexterity],
        }
    }

    /// XP needed to reach each level; combination classes add both tables.
    pub fn xp_table(self) -> [u32; 20] {
        let mut table = [0u32; 20];
        for family in self.families() {
            for (total, xp) in table.iter_mut().zip(family.xp_table()) {
                *total += xp;
            }
        }
        table
    }

    /// Fixed hit points per level after 9th; combination classes take the lower.
    pub fn fixed_hp_after_ninth(self) -> i32 {
        self.families()
            .iter()
            .map(|f| f.fixed_hp_after_ninth())
            .min()
            .unwrap_or(1)
    }

    pub fn has_thief_skills(self) -> bool {
        self.has_family(ClassFamily::Thief)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CharacterClass::Cleric => "cleric",
            CharacterClass::Fighter => "fighter",
            CharacterClass::MagicUser => "magic-user",
            CharacterClass::Thief => "thief",
            CharacterClass::FighterMagicUser => "fighter/magic-user",
            CharacterClass::MagicUserThief => "magic-user/thief",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Fighter => "Fighter",
            CharacterClass::MagicUser => "Magic-User",
            CharacterClass::Thief => "Thief",
            CharacterClass::FighterMagicUser => "Fighter/Magic-User",
            CharacterClass::MagicUserThief => "Magic-User/Thief",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for CharacterClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "cleric" => Ok(CharacterClass::Cleric),
            "fighter" => Ok(CharacterClass::Fighter),
            "magic-user" | "magicuser" | "mage" => Ok(CharacterClass::MagicUser),
            "thief" => Ok(CharacterClass::Thief),
            "fighter/magic-user" | "fighter-magic-user" => Ok(CharacterClass::FighterMagicUser),
            "magic-user/thief" | "magic-user-thief" => Ok(CharacterClass::MagicUserThief),
            _ => Err(DomainError::parse(format!("Unknown class: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_class_names_use_fighter_tables() {
        assert_eq!(ClassFamily::for_class_name("Paladin"), ClassFamily::Fighter);
        assert_eq!(ClassFamily::for_class_name("thief"), ClassFamily::Thief);
        assert_eq!(
            ClassFamily::for_class_name("Magic User"),
            ClassFamily::MagicUser
        );
    }

    #[test]
    fn class_family_parses_with_or_without_suffix() {
        assert_eq!(
            "cleric-like".parse::<ClassFamily>().expect("parse"),
            ClassFamily::Cleric
        );
        assert_eq!(
            "magic-user".parse::<ClassFamily>().expect("parse"),
            ClassFamily::MagicUser
        );
        assert!("bard-like".parse::<ClassFamily>().is_err());
    }

    #[test]
    fn combination_xp_adds_both_tables() {
        let table = CharacterClass::FighterMagicUser.xp_table();
        assert_eq!(table[0], 0);
        assert_eq!(table[1], 4_500);
        assert_eq!(table[19], 1_560_000 + 1_950_000);

        let table = CharacterClass::MagicUserThief.xp_table();
        assert_eq!(table[1], 3_750);
    }

    #[test]
    fn combination_classes_take_lower_fixed_hp() {
        assert_eq!(CharacterClass::Fighter.fixed_hp_after_ninth(), 2);
        assert_eq!(CharacterClass::FighterMagicUser.fixed_hp_after_ninth(), 1);
        assert_eq!(CharacterClass::Thief.fixed_hp_after_ninth(), 2);
    }

    #[test]
    fn class_parses_common_spellings() {
        assert_eq!(
            "Magic User".parse::<CharacterClass>().expect("parse"),
            CharacterClass::MagicUser
        );
        assert_eq!(
            "fighter/magic-user".parse::<CharacterClass>().expect("parse"),
            CharacterClass::FighterMagicUser
        );
        assert!("ranger".parse::<CharacterClass>().is_err());
    }

    #[test]
    fn class_serializes_with_rulebook_names() {
        let json = serde_json::to_string(&CharacterClass::MagicUserThief).expect("serialize");
        assert_eq!(json, "\"magic-user/thief\"");
        let json = serde_json::to_string(&ClassFamily::MagicUser).expect("serialize");
        assert_eq!(json, "\"magic-user-like\"");
    }

    #[test]
    fn table_level_clamps() {
        assert_eq!(table_level(0), 1);
        assert_eq!(table_level(7), 7);
        assert_eq!(table_level(35), 20);
    }
}
