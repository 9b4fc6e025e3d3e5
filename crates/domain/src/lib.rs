//! Basic Fantasy RPG rules engine.
//!
//! Pure rules and character bookkeeping with no I/O. Functions that need dice
//! take a `roll` closure returning one result of a die with the given number
//! of sides, so callers choose the randomness and tests can script it.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use aggregates::{Character, Combatant, Encounter, HitPoints};
pub use entities::{
    calculate_total_weight, EquipmentItem, ItemCategory, PreparedSpell, Spell, SpellBook,
};
pub use error::DomainError;
pub use events::{DamageOutcome, HealOutcome, LevelUp, TurnAdvance, WearingChange, XpAward};

// Re-export game system traits and rules
pub use game_systems::bfrpg::{
    roll_starting_gold, scroll_cost, AbilityRequirement, ArmorWeight, CharacterClass, ClassFamily,
    EncumbranceConfig, EncumbranceTier, LoadThresholds, Race, SavingThrows, SpellSlots, ThiefSkills,
    SAVE_NAMES,
};
pub use game_systems::{
    BfrpgSystem, CalculationEngine, GameSystem, GameSystemRegistry, SaveTarget, SpellcastingSystem,
};

// Re-export ID types
pub use ids::{CharacterId, CombatantId, EncounterId, ItemId};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    calculate_coin_weight, calculate_total_coin_count, calculate_total_gold_value, convert_currency,
    modifier_for, roll_ability_scores, Ability, AbilityScore, AbilityScores, AmountChange,
    CharacterName, Coin, CurrencyPurse, DiceFormula, DiceParseError, DiceRollResult, ItemName,
    PurseAmounts,
};
