//! Character-related domain events
//!
//! These enums communicate what happened when character state was modified,
//! allowing callers to react appropriately.

use crate::ids::ItemId;

/// Outcome of applying damage to a character or combatant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Already at 0 HP or below, no effect
    AlreadyDead,
    /// Took damage but survived
    Wounded { damage_dealt: i32, remaining_hp: i32 },
    /// Dropped to 0 HP or below
    Killed { damage_dealt: i32 },
}

impl DamageOutcome {
    /// Apply `damage` to `current_hp`, returning the new HP and the outcome.
    ///
    /// Negative damage is treated as zero.
    pub fn resolve(current_hp: i32, damage: i32) -> (i32, Self) {
        if current_hp <= 0 {
            return (current_hp, Self::AlreadyDead);
        }
        let damage_dealt = damage.max(0);
        let remaining_hp = current_hp - damage_dealt;
        if remaining_hp <= 0 {
            (remaining_hp, Self::Killed { damage_dealt })
        } else {
            (
                remaining_hp,
                Self::Wounded {
                    damage_dealt,
                    remaining_hp,
                },
            )
        }
    }
}

/// Outcome of healing a character or combatant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealOutcome {
    /// At 0 HP or below, cannot heal
    Dead,
    /// Healing applied
    Healed { amount_healed: i32, new_hp: i32 },
    /// Already at max HP
    AlreadyFull,
}

impl HealOutcome {
    /// Heal `amount` up to `max_hp`, returning the new HP and the outcome.
    pub fn resolve(current_hp: i32, max_hp: i32, amount: i32) -> (i32, Self) {
        if current_hp <= 0 {
            return (current_hp, Self::Dead);
        }
        if current_hp >= max_hp {
            return (current_hp, Self::AlreadyFull);
        }
        let new_hp = (current_hp + amount.max(0)).min(max_hp);
        (
            new_hp,
            Self::Healed {
                amount_healed: new_hp - current_hp,
                new_hp,
            },
        )
    }
}

/// A level gained from an XP award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub from: u8,
    pub to: u8,
    pub hp_gained: i32,
}

/// Outcome of awarding experience points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    /// XP actually added after the one-level cap
    pub xp_gained: u32,
    pub total_xp: u32,
    pub level_up: Option<LevelUp>,
}

/// Outcome of toggling whether an item is worn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WearingChange {
    /// The item is now worn; `replaced` was taken off to make room
    PutOn {
        item: ItemId,
        replaced: Option<ItemId>,
    },
    /// The item was worn and has been taken off
    TakenOff { item: ItemId },
}
