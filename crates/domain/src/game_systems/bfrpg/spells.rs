//! Spell slot tables and scroll costs.

use serde::{Deserialize, Serialize};

use super::classes::{table_level, CharacterClass, ClassFamily};

/// Highest spell level in either caster table.
pub const MAX_SPELL_LEVEL: u8 = 6;

type SlotTable = [[u8; 6]; 20];

/// Cleric slots per caster level (rows) and spell level (columns).
const CLERIC_SLOTS: SlotTable = [
    [0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0],
    [2, 0, 0, 0, 0, 0],
    [2, 1, 0, 0, 0, 0],
    [2, 2, 0, 0, 0, 0],
    [2, 2, 1, 0, 0, 0],
    [3, 2, 2, 0, 0, 0],
    [3, 2, 2, 1, 0, 0],
    [3, 3, 2, 2, 0, 0],
    [3, 3, 2, 2, 1, 0],
    [4, 3, 3, 2, 2, 0],
    [4, 4, 3, 2, 2, 1],
    [4, 4, 3, 3, 2, 2],
    [4, 4, 4, 3, 2, 2],
    [4, 4, 4, 3, 3, 2],
    [5, 4, 4, 3, 3, 2],
    [5, 5, 4, 3, 3, 2],
    [5, 5, 4, 4, 3, 3],
    [6, 5, 4, 4, 3, 3],
    [6, 5, 5, 4, 3, 3],
];

/// Magic-user slots per caster level (rows) and spell level (columns).
const MAGIC_USER_SLOTS: SlotTable = [
    [1, 0, 0, 0, 0, 0],
    [2, 0, 0, 0, 0, 0],
    [2, 1, 0, 0, 0, 0],
    [2, 2, 0, 0, 0, 0],
    [2, 2, 1, 0, 0, 0],
    [3, 2, 2, 0, 0, 0],
    [3, 2, 2, 1, 0, 0],
    [3, 3, 2, 2, 0, 0],
    [3, 3, 2, 2, 1, 0],
    [4, 3, 3, 2, 2, 0],
    [4, 4, 3, 2, 2, 1],
    [4, 4, 3, 3, 2, 2],
    [4, 4, 4, 3, 2, 2],
    [4, 4, 4, 3, 3, 2],
    [5, 4, 4, 3, 3, 2],
    [5, 5, 4, 3, 3, 2],
    [5, 5, 4, 4, 3, 3],
    [6, 5, 4, 4, 3, 3],
    [6, 5, 5, 4, 3, 3],
    [6, 5, 5, 4, 4, 3],
];

/// Spells castable per day, one entry per spell level starting at 1st.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellSlots(Vec<u8>);

impl SpellSlots {
    pub fn new(slots: Vec<u8>) -> Self {
        Self(slots)
    }

    /// Slots for a spell level. Levels with no table entry have zero slots.
    pub fn for_level(&self, spell_level: u8) -> u8 {
        spell_level
            .checked_sub(1)
            .and_then(|index| self.0.get(usize::from(index)))
            .copied()
            .unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|&n| u32::from(n)).sum()
    }

    /// Highest spell level with at least one slot.
    pub fn highest_level(&self) -> Option<u8> {
        self.0.iter().rposition(|&n| n > 0).map(|i| i as u8 + 1)
    }
}

/// Spell slot table for a class family, if the family casts spells.
fn family_table(family: ClassFamily) -> Option<&'static SlotTable> {
    match family {
        ClassFamily::Cleric => Some(&CLERIC_SLOTS),
        ClassFamily::MagicUser => Some(&MAGIC_USER_SLOTS),
        ClassFamily::Fighter | ClassFamily::Thief => None,
    }
}

/// Spell slots for a class at a level.
///
/// Combination classes cast from their magic-user table. Non-casters get an
/// empty set.
pub fn spell_slots(class: CharacterClass, level: u8) -> SpellSlots {
    let Some(table) = class.families().iter().find_map(|&f| family_table(f)) else {
        return SpellSlots::default();
    };
    let row = table[usize::from(table_level(level) - 1)];
    let len = row.iter().rposition(|&n| n > 0).map_or(0, |i| i + 1);
    SpellSlots(row[..len].to_vec())
}

/// Whether a class can cast spells at all.
pub fn is_spellcaster(class: CharacterClass) -> bool {
    class
        .families()
        .iter()
        .any(|&family| family_table(family).is_some())
}

/// Cost in gold pieces to scribe a scroll of a spell level.
pub fn scroll_cost(spell_level: u8) -> u32 {
    let level = u32::from(spell_level);
    level * level * 25 + level * 10
}
