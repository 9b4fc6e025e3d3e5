//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//! - Returns outcome enums from mutations

pub mod character;
pub mod encounter;

pub use character::{Character, HitPoints};
pub use encounter::{Combatant, Encounter};
