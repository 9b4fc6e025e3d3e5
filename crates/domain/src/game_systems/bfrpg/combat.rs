//! Attack bonus, saving throw, and armor class tables.
//!
//! Both progression tables are indexed by class family and level (1-20).
//! Saving throws are target numbers: lower is better.

use serde::{Deserialize, Serialize};

use super::classes::{table_level, CharacterClass, ClassFamily};
use super::races::Race;

/// Armor class of an unarmored character before Dexterity.
pub const UNARMORED_AC: i32 = 11;

/// Best save target a racial bonus can produce.
const MIN_SAVE_TARGET: u8 = 1;

// ============================================================================
// Attack bonus
// ============================================================================

/// Attack bonus by level, index is level - 1.
const FIGHTER_ATTACK: [i32; 20] = [1, 2, 2, 3, 4, 4, 5, 6, 6, 6, 7, 7, 8, 8, 8, 9, 9, 9, 10, 10];
const CLERIC_ATTACK: [i32; 20] = [1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 5, 6, 6, 6, 7, 7, 7, 8, 8, 8];
const MAGIC_USER_ATTACK: [i32; 20] = [1, 1, 1, 2, 2, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 6, 6, 6, 7, 7];

/// Base attack bonus for a class family at a level.
///
/// Levels outside 1-20 are clamped.
pub fn base_attack_bonus(level: u8, family: ClassFamily) -> i32 {
    let table = match family {
        ClassFamily::Fighter => &FIGHTER_ATTACK,
        ClassFamily::Cleric | ClassFamily::Thief => &CLERIC_ATTACK,
        ClassFamily::MagicUser => &MAGIC_USER_ATTACK,
    };
    table[usize::from(table_level(level) - 1)]
}

/// Attack bonus for a class; combination classes use the better family.
pub fn class_attack_bonus(level: u8, class: CharacterClass) -> i32 {
    class
        .families()
        .iter()
        .map(|&family| base_attack_bonus(level, family))
        .max()
        .unwrap_or_else(|| base_attack_bonus(level, ClassFamily::Fighter))
}

// ============================================================================
// Saving throws
// ============================================================================

/// The five saving throw targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingThrows {
    /// Death ray or poison
    pub death_ray: u8,
    /// Magic wands
    pub wands: u8,
    /// Paralysis or petrification
    pub paralysis: u8,
    /// Dragon breath
    pub breath: u8,
    /// Rods, staves, and spells
    pub spells: u8,
}

impl SavingThrows {
    pub const fn from_array(values: [u8; 5]) -> Self {
        let [death_ray, wands, paralysis, breath, spells] = values;
        Self {
            death_ray,
            wands,
            paralysis,
            breath,
            spells,
        }
    }

    pub fn as_array(&self) -> [u8; 5] {
        [
            self.death_ray,
            self.wands,
            self.paralysis,
            self.breath,
            self.spells,
        ]
    }

    fn zip_with(&self, other: &Self, f: impl Fn(u8, u8) -> u8) -> Self {
        let (a, b) = (self.as_array(), other.as_array());
        Self::from_array(std::array::from_fn(|i| f(a[i], b[i])))
    }

    /// Per-save best (lowest) of two sets.
    pub fn best_of(&self, other: &Self) -> Self {
        self.zip_with(other, u8::min)
    }

    /// Subtract a set of bonuses, never going below 1.
    pub fn with_bonus(&self, bonus: &Self) -> Self {
        self.zip_with(bonus, |target, bonus| {
            target.saturating_sub(bonus).max(MIN_SAVE_TARGET)
        })
    }

    /// Apply a race's saving throw bonuses.
    pub fn with_racial_bonus(&self, race: Race) -> Self {
        self.with_bonus(&race.saving_throw_bonus())
    }
}

/// Save targets by highest level of each band.
type SaveTable = [(u8, [u8; 5]); 11];

const FIGHTER_SAVES: SaveTable = [
    (1, [12, 13, 14, 15, 17]),
    (3, [11, 12, 14, 15, 16]),
    (5, [11, 11, 13, 14, 15]),
    (7, [10, 11, 12, 14, 15]),
    (9, [9, 10, 12, 13, 14]),
    (11, [9, 9, 11, 12, 13]),
    (13, [8, 9, 10, 12, 13]),
    (15, [7, 8, 10, 11, 12]),
    (17, [7, 7, 9, 10, 11]),
    (19, [6, 7, 8, 10, 11]),
    (20, [5, 6, 8, 9, 10]),
];

const CLERIC_SAVES: SaveTable = [
    (1, [11, 12, 14, 16, 15]),
    (3, [10, 11, 13, 15, 14]),
    (5, [9, 10, 13, 15, 14]),
    (7, [9, 10, 12, 14, 13]),
    (9, [8, 9, 12, 14, 13]),
    (11, [8, 9, 11, 13, 12]),
    (13, [7, 8, 11, 13, 12]),
    (15, [7, 8, 10, 12, 11]),
    (17, [6, 7, 10, 12, 11]),
    (19, [6, 7, 9, 11, 10]),
    (20, [5, 6, 9, 11, 10]),
];

const MAGIC_USER_SAVES: SaveTable = [
    (1, [13, 14, 13, 16, 15]),
    (3, [13, 14, 13, 15, 14]),
    (5, [12, 13, 12, 15, 13]),
    (7, [12, 12, 11, 14, 13]),
    (9, [11, 11, 10, 14, 12]),
    (11, [11, 10, 9, 13, 11]),
    (13, [10, 10, 9, 13, 11]),
    (15, [10, 9, 8, 12, 10]),
    (17, [9, 8, 7, 12, 9]),
    (19, [9, 7, 6, 11, 9]),
    (20, [8, 6, 5, 11, 8]),
];

const THIEF_SAVES: SaveTable = [
    (1, [13, 14, 13, 16, 15]),
    (3, [12, 14, 12, 15, 14]),
    (5, [11, 13, 12, 14, 13]),
    (7, [11, 13, 11, 13, 13]),
    (9, [10, 12, 11, 13, 12]),
    (11, [9, 12, 10, 12, 11]),
    (13, [9, 10, 10, 11, 11]),
    (15, [8, 10, 9, 11, 10]),
    (17, [7, 9, 8, 10, 9]),
    (19, [6, 8, 8, 9, 8]),
    (20, [5, 7, 7, 8, 7]),
];

/// Saving throw targets for a class family at a level, before racial bonuses.
pub fn saving_throws(level: u8, family: ClassFamily) -> SavingThrows {
    let table = match family {
        ClassFamily::Fighter => &FIGHTER_SAVES,
        ClassFamily::Cleric => &CLERIC_SAVES,
        ClassFamily::MagicUser => &MAGIC_USER_SAVES,
        ClassFamily::Thief => &THIEF_SAVES,
    };
    let level = table_level(level);
    let (_, targets) = table
        .iter()
        .find(|(max_level, _)| level <= *max_level)
        .unwrap_or(&table[table.len() - 1]);
    SavingThrows::from_array(*targets)
}

/// Saving throws for a class and race; combination classes take the best of
/// each save across their families.
pub fn class_saving_throws(level: u8, class: CharacterClass, race: Race) -> SavingThrows {
    let families = class.families();
    let base = families
        .iter()
        .skip(1)
        .fold(saving_throws(level, families[0]), |best, &family| {
            best.best_of(&saving_throws(level, family))
        });
    base.with_racial_bonus(race)
}

// ============================================================================
// Armor class
// ============================================================================

/// Armor class from worn armor, a worn shield, and the Dexterity modifier.
///
/// `armor_ac` replaces the unarmored base of 11; `shield_bonus` is added.
pub fn armor_class(
    armor_ac: Option<i32>,
    shield_bonus: Option<i32>,
    dexterity_modifier: i32,
) -> i32 {
    armor_ac.unwrap_or(UNARMORED_AC) + shield_bonus.unwrap_or(0) + dexterity_modifier
}
