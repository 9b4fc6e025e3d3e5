//! Combat-related domain events

use crate::ids::CombatantId;

/// Outcome of advancing an encounter to the next turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAdvance {
    /// The next combatant acts in the same round
    NextCombatant { round: u32, combatant: CombatantId },
    /// The order wrapped around and a new round began
    NewRound { round: u32, combatant: CombatantId },
    /// Nobody is left standing to act
    NoActiveCombatants,
}

impl TurnAdvance {
    pub fn combatant(&self) -> Option<CombatantId> {
        match self {
            Self::NextCombatant { combatant, .. } | Self::NewRound { combatant, .. } => {
                Some(*combatant)
            }
            Self::NoActiveCombatants => None,
        }
    }
}
