//! Domain entities - Inventory and spell records owned by a character

mod item;
mod spell;

pub use item::{calculate_total_weight, EquipmentItem, ItemCategory};
pub use spell::{PreparedSpell, Spell, SpellBook};
