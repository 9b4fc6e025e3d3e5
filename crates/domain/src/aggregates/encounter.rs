//! Encounter aggregate - Initiative order, rounds, and hit points in a fight

use serde::{Deserialize, Serialize};

use super::character::{Character, HitPoints};
use crate::error::DomainError;
use crate::events::{DamageOutcome, HealOutcome, TurnAdvance};
use crate::ids::{CharacterId, CombatantId, EncounterId};
use crate::value_objects::Ability;

/// Die rolled for initiative.
const INITIATIVE_DIE: u8 = 6;

/// One participant in an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    #[serde(default)]
    pub initiative: i32,
    pub hit_points: HitPoints,
    pub armor_class: i32,
    #[serde(default)]
    pub dexterity_modifier: i32,
    /// Set when the combatant is a player character
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<CharacterId>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, max_hp: i32, armor_class: i32) -> Self {
        Self {
            id: CombatantId::new(),
            name: name.into(),
            initiative: 0,
            hit_points: HitPoints::full(max_hp),
            armor_class,
            dexterity_modifier: 0,
            character_id: None,
        }
    }

    pub fn with_dexterity_modifier(mut self, modifier: i32) -> Self {
        self.dexterity_modifier = modifier;
        self
    }

    /// Snapshot a character's current HP, AC, and Dexterity.
    pub fn from_character(character: &Character) -> Self {
        Self {
            id: CombatantId::new(),
            name: character.name().to_string(),
            initiative: 0,
            hit_points: character.hit_points(),
            armor_class: character.armor_class(),
            dexterity_modifier: character.modifier(Ability::Dexterity),
            character_id: Some(character.id()),
        }
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.hit_points.current <= 0
    }
}

/// A combat encounter
///
/// # Invariants
///
/// - `round` is 0 until the first turn, then counts up from 1
/// - once started, `turn` indexes the combatant currently acting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    id: EncounterId,
    name: String,
    combatants: Vec<Combatant>,
    round: u32,
    turn: usize,
}

impl Encounter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EncounterId::new(),
            name: name.into(),
            combatants: Vec::new(),
            round: 0,
            turn: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> EncounterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Combatants in initiative order.
    #[inline]
    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    #[inline]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The combatant whose turn it is, once the encounter has started.
    pub fn current(&self) -> Option<&Combatant> {
        if self.round == 0 {
            return None;
        }
        self.combatants.get(self.turn)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn active_combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| !c.is_defeated())
    }

    // =========================================================================
    // Mutation Methods
    // =========================================================================

    /// Add a combatant at the end of the order. Returns its id.
    pub fn add_combatant(&mut self, combatant: Combatant) -> CombatantId {
        let id = combatant.id;
        self.combatants.push(combatant);
        id
    }

    /// Roll 1d6 plus Dexterity modifier for everyone and sort the order.
    ///
    /// Higher initiative acts first; ties keep the order combatants were added
    /// in. The encounter restarts, so the next turn opens round 1.
    pub fn roll_initiative(&mut self, roll: &mut impl FnMut(u8) -> u8) {
        for combatant in &mut self.combatants {
            let die = i32::from(roll(INITIATIVE_DIE).clamp(1, INITIATIVE_DIE));
            combatant.initiative = die + combatant.dexterity_modifier;
        }
        self.combatants.sort_by_key(|c| std::cmp::Reverse(c.initiative));
        self.round = 0;
        self.turn = 0;
        tracing::debug!(
            encounter = %self.id,
            combatants = self.combatants.len(),
            "Initiative rolled"
        );
    }

    /// Move to the next combatant still standing, skipping defeated ones.
    pub fn next_turn(&mut self) -> TurnAdvance {
        if self.active_combatants().next().is_none() {
            return TurnAdvance::NoActiveCombatants;
        }

        let len = self.combatants.len();
        let (mut index, mut round, mut new_round) = if self.round == 0 {
            (0, 1, true)
        } else {
            (self.turn + 1, self.round, false)
        };
        loop {
            if index >= len {
                index = 0;
                round += 1;
                new_round = true;
            }
            if !self.combatants[index].is_defeated() {
                break;
            }
            index += 1;
        }

        self.turn = index;
        self.round = round;
        let combatant = self.combatants[index].id;
        if new_round {
            TurnAdvance::NewRound { round, combatant }
        } else {
            TurnAdvance::NextCombatant { round, combatant }
        }
    }

    fn combatant_mut(&mut self, id: CombatantId) -> Result<&mut Combatant, DomainError> {
        self.combatants
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::not_found("Combatant", id.to_string()))
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the combatant is not in this encounter.
    pub fn apply_damage(
        &mut self,
        id: CombatantId,
        damage: i32,
    ) -> Result<DamageOutcome, DomainError> {
        let combatant = self.combatant_mut(id)?;
        let (hp, outcome) = DamageOutcome::resolve(combatant.hit_points.current, damage);
        combatant.hit_points.current = hp;
        if matches!(outcome, DamageOutcome::Killed { .. }) {
            tracing::info!(combatant = %combatant.name, "Combatant defeated");
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the combatant is not in this encounter.
    pub fn heal(&mut self, id: CombatantId, amount: i32) -> Result<HealOutcome, DomainError> {
        let combatant = self.combatant_mut(id)?;
        let (hp, outcome) = HealOutcome::resolve(
            combatant.hit_points.current,
            combatant.hit_points.max,
            amount,
        );
        combatant.hit_points.current = hp;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out the given faces in order.
    fn scripted(faces: Vec<u8>) -> impl FnMut(u8) -> u8 {
        let mut faces = faces.into_iter();
        move |_| faces.next().unwrap_or(1)
    }

    fn goblin(name: &str) -> Combatant {
        Combatant::new(name, 4, 14)
    }

    fn three_way() -> (Encounter, [CombatantId; 3]) {
        let mut encounter = Encounter::new("Goblin ambush");
        let a = encounter.add_combatant(goblin("Goblin A"));
        let b = encounter.add_combatant(goblin("Goblin B").with_dexterity_modifier(1));
        let c = encounter.add_combatant(goblin("Goblin C"));
        (encounter, [a, b, c])
    }

    fn order(encounter: &Encounter) -> Vec<&str> {
        encounter
            .combatants()
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    #[test]
    fn initiative_sorts_descending_with_dexterity() {
        let (mut encounter, _) = three_way();
        encounter.roll_initiative(&mut scripted(vec![2, 3, 5]));
        assert_eq!(order(&encounter), ["Goblin C", "Goblin B", "Goblin A"]);
        assert_eq!(encounter.combatants()[1].initiative, 4);
    }

    #[test]
    fn initiative_ties_keep_insertion_order() {
        let (mut encounter, _) = three_way();
        // A: 4, B: 3 + 1 = 4, C: 4
        encounter.roll_initiative(&mut scripted(vec![4, 3, 4]));
        assert_eq!(order(&encounter), ["Goblin A", "Goblin B", "Goblin C"]);
    }

    #[test]
    fn turns_advance_and_wrap_into_new_rounds() {
        let (mut encounter, [a, b, c]) = three_way();
        encounter.roll_initiative(&mut scripted(vec![6, 4, 1]));
        assert!(encounter.current().is_none());

        assert_eq!(
            encounter.next_turn(),
            TurnAdvance::NewRound {
                round: 1,
                combatant: a
            }
        );
        assert_eq!(
            encounter.next_turn(),
            TurnAdvance::NextCombatant {
                round: 1,
                combatant: b
            }
        );
        assert_eq!(encounter.next_turn().combatant(), Some(c));
        assert_eq!(
            encounter.next_turn(),
            TurnAdvance::NewRound {
                round: 2,
                combatant: a
            }
        );
        assert_eq!(encounter.round(), 2);
        assert_eq!(encounter.current().map(|c| c.id), Some(a));
    }

    #[test]
    fn defeated_combatants_are_skipped() {
        let (mut encounter, [a, b, c]) = three_way();
        encounter.roll_initiative(&mut scripted(vec![6, 4, 1]));
        assert_eq!(
            encounter.apply_damage(b, 10),
            Ok(DamageOutcome::Killed { damage_dealt: 10 })
        );

        assert_eq!(encounter.next_turn().combatant(), Some(a));
        assert_eq!(encounter.next_turn().combatant(), Some(c));
        assert_eq!(encounter.active_combatants().count(), 2);
    }

    #[test]
    fn no_one_left_standing() {
        let (mut encounter, ids) = three_way();
        for id in ids {
            encounter.apply_damage(id, 4).expect("present");
        }
        assert_eq!(encounter.next_turn(), TurnAdvance::NoActiveCombatants);
    }

    #[test]
    fn healing_and_unknown_combatants() {
        let (mut encounter, [a, ..]) = three_way();
        encounter.apply_damage(a, 3).expect("present");
        assert_eq!(
            encounter.heal(a, 5),
            Ok(HealOutcome::Healed {
                amount_healed: 3,
                new_hp: 4
            })
        );
        assert!(matches!(
            encounter.apply_damage(CombatantId::new(), 1),
            Err(DomainError::NotFound { .. })
        ));
    }
}
