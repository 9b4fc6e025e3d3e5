//! Spell reference records and a character's spell book.
//!
//! Spells are listed per casting class: a spell may be 1st level for clerics
//! and absent from the magic-user list, or appear on both at different levels.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::game_systems::bfrpg::{CharacterClass, ClassFamily, SpellSlots};

/// A spell as printed in the rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    pub name: String,
    /// Level on the cleric list, if the spell is on it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleric_level: Option<u8>,
    /// Level on the magic-user list, if the spell is on it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic_user_level: Option<u8>,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub reversible: bool,
    #[serde(default)]
    pub description: String,
}

impl Spell {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cleric_level: None,
            magic_user_level: None,
            range: String::new(),
            duration: String::new(),
            reversible: false,
            description: String::new(),
        }
    }

    pub fn with_cleric_level(mut self, level: u8) -> Self {
        self.cleric_level = Some(level);
        self
    }

    pub fn with_magic_user_level(mut self, level: u8) -> Self {
        self.magic_user_level = Some(level);
        self
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn reversible(mut self) -> Self {
        self.reversible = true;
        self
    }

    /// Spell level for a class, or `None` if the class cannot cast it.
    pub fn level_for(&self, class: CharacterClass) -> Option<u8> {
        class.families().iter().find_map(|family| match family {
            ClassFamily::Cleric => self.cleric_level,
            ClassFamily::MagicUser => self.magic_user_level,
            ClassFamily::Fighter | ClassFamily::Thief => None,
        })
    }

    fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

/// One prepared copy of a spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedSpell {
    pub name: String,
    pub level: u8,
    /// Set once cast; cleared by rest
    #[serde(default)]
    pub cast: bool,
}

/// Known and prepared spells for one character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellBook {
    #[serde(default)]
    known: Vec<Spell>,
    #[serde(default)]
    prepared: Vec<PreparedSpell>,
}

impl SpellBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn known(&self) -> &[Spell] {
        &self.known
    }

    pub fn prepared(&self) -> &[PreparedSpell] {
        &self.prepared
    }

    /// Number of spells prepared at a spell level, cast or not.
    pub fn prepared_at_level(&self, level: u8) -> u32 {
        self.prepared.iter().filter(|p| p.level == level).count() as u32
    }

    /// Add a spell to the known list.
    ///
    /// # Errors
    ///
    /// - `Constraint` if the class has no level for the spell
    /// - `Validation` if the spell is already known
    pub fn learn(&mut self, spell: Spell, class: CharacterClass) -> Result<(), DomainError> {
        if spell.level_for(class).is_none() {
            return Err(DomainError::constraint(format!(
                "{} cannot learn {}",
                class.display_name(),
                spell.name
            )));
        }
        if self.known.iter().any(|s| s.is_named(&spell.name)) {
            return Err(DomainError::validation(format!(
                "{} is already known",
                spell.name
            )));
        }
        self.known.push(spell);
        Ok(())
    }

    /// Prepare one copy of a known spell.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the spell is not known
    /// - `Constraint` if the class cannot cast it
    /// - `ContainerFull` if every slot of that spell level is taken
    pub fn prepare(
        &mut self,
        name: &str,
        class: CharacterClass,
        slots: &SpellSlots,
    ) -> Result<u8, DomainError> {
        let spell = self
            .known
            .iter()
            .find(|s| s.is_named(name))
            .ok_or_else(|| DomainError::not_found("Spell", name))?;
        let level = spell.level_for(class).ok_or_else(|| {
            DomainError::constraint(format!("{} cannot cast {}", class.display_name(), spell.name))
        })?;

        let max = u32::from(slots.for_level(level));
        let current = self.prepared_at_level(level);
        if current >= max {
            return Err(DomainError::container_full(current, max));
        }

        self.prepared.push(PreparedSpell {
            name: spell.name.clone(),
            level,
            cast: false,
        });
        Ok(level)
    }

    /// Cast a prepared copy of a spell, returning its level.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no uncast copy is prepared.
    pub fn cast(&mut self, name: &str) -> Result<u8, DomainError> {
        let name = name.trim();
        let prepared = self
            .prepared
            .iter_mut()
            .find(|p| !p.cast && p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| DomainError::not_found("PreparedSpell", name))?;
        prepared.cast = true;
        Ok(prepared.level)
    }

    /// Restore every cast spell. Returns how many were restored.
    pub fn rest(&mut self) -> usize {
        let mut restored = 0;
        for prepared in self.prepared.iter_mut().filter(|p| p.cast) {
            prepared.cast = false;
            restored += 1;
        }
        restored
    }

    /// Drop prepared spells that no longer fit the slots, newest first.
    ///
    /// Returns how many were dropped.
    pub fn fit_to_slots(&mut self, slots: &SpellSlots) -> usize {
        let before = self.prepared.len();
        let mut kept: Vec<PreparedSpell> = Vec::with_capacity(before);
        for spell in self.prepared.drain(..) {
            let used = kept.iter().filter(|p| p.level == spell.level).count();
            if used < usize::from(slots.for_level(spell.level)) {
                kept.push(spell);
            }
        }
        self.prepared = kept;
        before - self.prepared.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_systems::bfrpg::spell_slots;

    fn magic_missile() -> Spell {
        Spell::new("Magic Missile")
            .with_magic_user_level(1)
            .with_range("100'")
            .with_duration("instant")
    }

    fn cure_light_wounds() -> Spell {
        Spell::new("Cure Light Wounds").with_cleric_level(1).reversible()
    }

    #[test]
    fn level_depends_on_class_list() {
        let light = Spell::new("Light").with_cleric_level(1).with_magic_user_level(1);
        assert_eq!(light.level_for(CharacterClass::Cleric), Some(1));
        assert_eq!(magic_missile().level_for(CharacterClass::Cleric), None);
        assert_eq!(
            magic_missile().level_for(CharacterClass::FighterMagicUser),
            Some(1)
        );
        assert_eq!(magic_missile().level_for(CharacterClass::Thief), None);
    }

    #[test]
    fn learn_rejects_other_lists_and_duplicates() {
        let mut book = SpellBook::new();
        assert!(matches!(
            book.learn(cure_light_wounds(), CharacterClass::MagicUser),
            Err(DomainError::Constraint(_))
        ));
        book.learn(magic_missile(), CharacterClass::MagicUser)
            .expect("learnable");
        assert!(matches!(
            book.learn(magic_missile(), CharacterClass::MagicUser),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(book.known().len(), 1);
    }

    #[test]
    fn prepare_respects_slots() {
        let class = CharacterClass::MagicUser;
        let slots = spell_slots(class, 1);
        let mut book = SpellBook::new();
        book.learn(magic_missile(), class).expect("learnable");

        assert_eq!(book.prepare("magic missile", class, &slots), Ok(1));
        assert_eq!(
            book.prepare("Magic Missile", class, &slots),
            Err(DomainError::container_full(1, 1))
        );
        assert!(matches!(
            book.prepare("Sleep", class, &slots),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn first_level_clerics_cannot_prepare() {
        let class = CharacterClass::Cleric;
        let mut book = SpellBook::new();
        book.learn(cure_light_wounds(), class).expect("learnable");
        assert_eq!(
            book.prepare("Cure Light Wounds", class, &spell_slots(class, 1)),
            Err(DomainError::container_full(0, 0))
        );
    }

    #[test]
    fn cast_then_rest() {
        let class = CharacterClass::MagicUser;
        let slots = spell_slots(class, 2);
        let mut book = SpellBook::new();
        book.learn(magic_missile(), class).expect("learnable");
        book.prepare("Magic Missile", class, &slots).expect("slot");
        book.prepare("Magic Missile", class, &slots).expect("slot");

        assert_eq!(book.cast("Magic Missile"), Ok(1));
        assert_eq!(book.cast("Magic Missile"), Ok(1));
        assert!(matches!(
            book.cast("Magic Missile"),
            Err(DomainError::NotFound { .. })
        ));

        assert_eq!(book.rest(), 2);
        assert!(book.prepared().iter().all(|p| !p.cast));
        assert_eq!(book.cast("Magic Missile"), Ok(1));
    }

    #[test]
    fn fit_to_slots_drops_excess() {
        let class = CharacterClass::MagicUser;
        let mut book = SpellBook::new();
        book.learn(magic_missile(), class).expect("learnable");
        book.prepare("Magic Missile", class, &spell_slots(class, 2))
            .expect("slot");
        book.prepare("Magic Missile", class, &spell_slots(class, 2))
            .expect("slot");

        assert_eq!(book.fit_to_slots(&spell_slots(class, 1)), 1);
        assert_eq!(book.prepared_at_level(1), 1);
    }
}
