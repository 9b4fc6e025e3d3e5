//! Game system traits for rules lookups.
//!
//! These traits take free-form class and race names, the way they arrive from
//! stored sheets and user input. Implementations decide how to fall back when
//! a name is not recognized.

use std::collections::HashMap;

/// Core trait all game systems must implement.
///
/// This trait provides system identification and access to the calculation engine.
pub trait GameSystem: Send + Sync {
    /// Unique identifier for this game system (e.g., "bfrpg").
    fn system_id(&self) -> &str;

    /// Human-readable display name.
    fn display_name(&self) -> &str;

    /// Get the calculation engine for this system.
    fn calculation_engine(&self) -> &dyn CalculationEngine;

    /// Optional: Get the spellcasting system if this system has spellcasting.
    fn spellcasting_system(&self) -> Option<&dyn SpellcastingSystem> {
        None
    }

    /// List of stat names used by this system.
    fn stat_names(&self) -> &[&str];
}

/// One saving throw category and the number a roll must meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTarget {
    pub name: &'static str,
    pub target: i32,
}

/// Calculation rules that vary per game system.
pub trait CalculationEngine: Send + Sync {
    /// Calculate ability modifier from score.
    fn ability_modifier(&self, score: i32) -> i32;

    /// Base attack bonus for a class at a level.
    fn attack_bonus(&self, level: u8, class_name: &str) -> i32;

    /// Saving throw targets for a class and race at a level.
    fn saving_throws(&self, level: u8, class_name: &str, race_name: &str) -> Vec<SaveTarget>;

    /// Get the hit die for a class (e.g., "1d8").
    fn hit_die(&self, class_name: &str) -> &'static str;

    /// Calculate Armor Class from worn armor, shield, and Dexterity modifier.
    fn calculate_ac(
        &self,
        armor_ac: Option<i32>,
        shield_bonus: Option<i32>,
        dexterity_modifier: i32,
    ) -> i32;
}

/// For systems with spellcasting.
pub trait SpellcastingSystem: Send + Sync {
    /// Whether a class casts spells.
    fn is_caster(&self, class_name: &str) -> bool;

    /// Spell slots keyed by spell level. Missing keys mean zero slots.
    fn spell_slots(&self, class_name: &str, level: u8) -> HashMap<u8, u8>;

    /// Cost in gold pieces to scribe a scroll.
    fn scroll_cost(&self, spell_level: u8) -> u32;
}
