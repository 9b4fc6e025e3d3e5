//! Basic Fantasy RPG game system implementation.
//!
//! The rules are plain lookup tables and small formulas. Each submodule
//! exposes free functions over typed inputs; `BfrpgSystem` adapts them to the
//! name-based [`GameSystem`] traits.

mod advancement;
mod classes;
mod combat;
mod encumbrance;
mod races;
mod spells;
mod thief_skills;

pub use advancement::{
    capped_xp_award, class_hit_point_gain, hit_point_gain, level_for_xp, roll_starting_gold,
    xp_for_level, xp_for_next_level, LAST_ROLLED_LEVEL,
};
pub use classes::{table_level, CharacterClass, ClassFamily, MAX_LEVEL};
pub use combat::{
    armor_class, base_attack_bonus, class_attack_bonus, class_saving_throws, saving_throws,
    SavingThrows, UNARMORED_AC,
};
pub use encumbrance::{
    carrying_capacity, carrying_capacity_with, encumbrance_tier, movement_rate, ArmorWeight,
    EncumbranceConfig, EncumbranceTier,
};
pub use races::{bonus_language_slots, AbilityRequirement, LoadThresholds, Race};
pub use spells::{is_spellcaster, scroll_cost, spell_slots, SpellSlots, MAX_SPELL_LEVEL};
pub use thief_skills::{thief_skills, ThiefSkills};

use std::collections::HashMap;

use super::traits::{CalculationEngine, GameSystem, SaveTarget, SpellcastingSystem};
use crate::value_objects::modifier_for;

/// Saving throw categories in the order of [`SavingThrows::as_array`].
pub const SAVE_NAMES: [&str; 5] = [
    "Death Ray or Poison",
    "Magic Wands",
    "Paralysis or Petrify",
    "Dragon Breath",
    "Spells",
];

/// Basic Fantasy RPG game system.
pub struct BfrpgSystem;

impl Default for BfrpgSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl BfrpgSystem {
    /// Create a new BFRPG system instance.
    pub fn new() -> Self {
        Self
    }

    /// Resolve a class name, falling back to fighter for unknown names.
    fn resolve_class(class_name: &str) -> CharacterClass {
        class_name.parse().unwrap_or_else(|_| {
            tracing::warn!(class = class_name, "Unknown class, using fighter tables");
            CharacterClass::Fighter
        })
    }

    /// Resolve a race name; unknown races get no racial adjustments.
    fn resolve_race(race_name: &str) -> Race {
        race_name.parse().unwrap_or_else(|_| {
            tracing::debug!(race = race_name, "Unknown race, no racial save bonus");
            Race::Human
        })
    }
}

impl GameSystem for BfrpgSystem {
    fn system_id(&self) -> &str {
        "bfrpg"
    }

    fn display_name(&self) -> &str {
        "Basic Fantasy RPG"
    }

    fn calculation_engine(&self) -> &dyn CalculationEngine {
        self
    }

    fn spellcasting_system(&self) -> Option<&dyn SpellcastingSystem> {
        Some(self)
    }

    fn stat_names(&self) -> &[&str] {
        &["STR", "DEX", "CON", "INT", "WIS", "CHA"]
    }
}

impl CalculationEngine for BfrpgSystem {
    fn ability_modifier(&self, score: i32) -> i32 {
        modifier_for(score)
    }

    fn attack_bonus(&self, level: u8, class_name: &str) -> i32 {
        class_attack_bonus(level, Self::resolve_class(class_name))
    }

    fn saving_throws(&self, level: u8, class_name: &str, race_name: &str) -> Vec<SaveTarget> {
        let saves = class_saving_throws(
            level,
            Self::resolve_class(class_name),
            Self::resolve_race(race_name),
        );
        SAVE_NAMES
            .iter()
            .zip(saves.as_array())
            .map(|(&name, target)| SaveTarget {
                name,
                target: i32::from(target),
            })
            .collect()
    }

    fn hit_die(&self, class_name: &str) -> &'static str {
        Self::resolve_class(class_name).hit_die()
    }

    fn calculate_ac(
        &self,
        armor_ac: Option<i32>,
        shield_bonus: Option<i32>,
        dexterity_modifier: i32,
    ) -> i32 {
        armor_class(armor_ac, shield_bonus, dexterity_modifier)
    }
}

impl SpellcastingSystem for BfrpgSystem {
    fn is_caster(&self, class_name: &str) -> bool {
        class_name
            .parse::<CharacterClass>()
            .map(is_spellcaster)
            .unwrap_or(false)
    }

    fn spell_slots(&self, class_name: &str, level: u8) -> HashMap<u8, u8> {
        let Ok(class) = class_name.parse::<CharacterClass>() else {
            return HashMap::new();
        };
        spell_slots(class, level)
            .as_slice()
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(index, &count)| (index as u8 + 1, count))
            .collect()
    }

    fn scroll_cost(&self, spell_level: u8) -> u32 {
        scroll_cost(spell_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_identity() {
        let system = BfrpgSystem::new();
        assert_eq!(system.system_id(), "bfrpg");
        assert_eq!(system.display_name(), "Basic Fantasy RPG");
        assert_eq!(system.stat_names().len(), 6);
        assert!(system.spellcasting_system().is_some());
    }

    #[test]
    fn unknown_class_uses_fighter_tables() {
        let engine = BfrpgSystem::new();
        assert_eq!(engine.attack_bonus(20, "Barbarian"), 10);
        assert_eq!(engine.hit_die("Barbarian"), "1d8");
        let saves = engine.saving_throws(1, "Barbarian", "human");
        assert_eq!(saves[0].target, 12);
        assert_eq!(saves[4].target, 17);
    }

    #[test]
    fn saves_are_named_and_race_adjusted() {
        let engine = BfrpgSystem::new();
        let saves = engine.saving_throws(1, "cleric", "dwarf");
        assert_eq!(saves.len(), 5);
        assert_eq!(saves[0].name, "Death Ray or Poison");
        assert_eq!(saves[0].target, 7);
        assert_eq!(saves[3].name, "Dragon Breath");
        assert_eq!(saves[3].target, 13);
    }

    #[test]
    fn spell_slots_by_name() {
        let system = BfrpgSystem::new();
        let slots = system.spell_slots("Magic-User", 3);
        assert_eq!(slots.get(&1), Some(&2));
        assert_eq!(slots.get(&2), Some(&1));
        assert_eq!(slots.get(&3), None);
        assert!(system.spell_slots("fighter", 10).is_empty());
        assert!(!system.is_caster("thief"));
        assert_eq!(system.scroll_cost(3), 255);
    }

    #[test]
    fn ability_modifier_uses_bucket_table() {
        let system = BfrpgSystem::new();
        assert_eq!(system.ability_modifier(3), -3);
        assert_eq!(system.ability_modifier(18), 3);
    }
}
