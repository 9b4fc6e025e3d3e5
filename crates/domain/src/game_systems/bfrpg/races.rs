//! Playable races: requirements, class permissions, and racial adjustments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::classes::CharacterClass;
use super::combat::SavingThrows;
use crate::error::DomainError;
use crate::value_objects::{Ability, AbilityScores};

/// An ability bound a race imposes on starting scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityRequirement {
    AtLeast(Ability, i32),
    AtMost(Ability, i32),
}

impl AbilityRequirement {
    pub fn is_met_by(self, scores: &AbilityScores) -> bool {
        match self {
            AbilityRequirement::AtLeast(ability, min) => scores.get(ability).value() >= min,
            AbilityRequirement::AtMost(ability, max) => scores.get(ability).value() <= max,
        }
    }
}

impl fmt::Display for AbilityRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityRequirement::AtLeast(ability, min) => {
                write!(f, "{} of at least {}", ability, min)
            }
            AbilityRequirement::AtMost(ability, max) => write!(f, "{} of at most {}", ability, max),
        }
    }
}

/// Light and heavy load limits in pounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadThresholds {
    pub light: u32,
    pub heavy: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Race {
    Dwarf,
    Elf,
    Halfling,
    Human,
}

impl Race {
    pub const ALL: [Race; 4] = [Race::Dwarf, Race::Elf, Race::Halfling, Race::Human];

    pub fn requirements(self) -> &'static [AbilityRequirement] {
        use AbilityRequirement::{AtLeast, AtMost};
        match self {
            Race::Dwarf => &[
                AtLeast(Ability::Constitution, 9),
                AtMost(Ability::Charisma, 17),
            ],
            Race::Elf => &[
                AtLeast(Ability::Intelligence, 9),
                AtMost(Ability::Constitution, 17),
            ],
            Race::Halfling => &[
                AtLeast(Ability::Dexterity, 9),
                AtMost(Ability::Strength, 17),
            ],
            Race::Human => &[],
        }
    }

    pub fn allowed_classes(self) -> &'static [CharacterClass] {
        match self {
            Race::Dwarf | Race::Halfling => &[
                CharacterClass::Cleric,
                CharacterClass::Fighter,
                CharacterClass::Thief,
            ],
            Race::Elf => &CharacterClass::ALL,
            Race::Human => &[
                CharacterClass::Cleric,
                CharacterClass::Fighter,
                CharacterClass::MagicUser,
                CharacterClass::Thief,
            ],
        }
    }

    /// Check that a set of scores satisfies this race's requirements.
    pub fn check_requirements(self, scores: &AbilityScores) -> Result<(), DomainError> {
        match self.requirements().iter().find(|req| !req.is_met_by(scores)) {
            Some(req) => Err(DomainError::validation(format!(
                "{} requires {}",
                self.display_name(),
                req
            ))),
            None => Ok(()),
        }
    }

    pub fn allows_class(self, class: CharacterClass) -> bool {
        self.allowed_classes().contains(&class)
    }

    /// Largest hit die this race may roll, if capped.
    pub fn max_hit_die(self) -> Option<u8> {
        match self {
            Race::Elf | Race::Halfling => Some(6),
            Race::Dwarf | Race::Human => None,
        }
    }

    /// Bonuses subtracted from the save targets
    /// (death ray, wands, paralysis, breath, spells).
    pub fn saving_throw_bonus(self) -> SavingThrows {
        match self {
            Race::Dwarf | Race::Halfling => SavingThrows::from_array([4, 4, 4, 3, 4]),
            Race::Elf => SavingThrows::from_array([0, 2, 1, 0, 2]),
            Race::Human => SavingThrows::from_array([0, 0, 0, 0, 0]),
        }
    }

    pub fn base_load(self) -> LoadThresholds {
        match self {
            Race::Halfling => LoadThresholds {
                light: 50,
                heavy: 100,
            },
            Race::Dwarf | Race::Elf | Race::Human => LoadThresholds {
                light: 60,
                heavy: 150,
            },
        }
    }

    /// Languages known at creation, before any bonus languages.
    pub fn native_languages(self) -> &'static [&'static str] {
        match self {
            Race::Dwarf => &["Common", "Dwarvish"],
            Race::Elf => &["Common", "Elvish"],
            Race::Halfling => &["Common", "Halfling"],
            Race::Human => &["Common"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Race::Dwarf => "dwarf",
            Race::Elf => "elf",
            Race::Halfling => "halfling",
            Race::Human => "human",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Race::Dwarf => "Dwarf",
            Race::Elf => "Elf",
            Race::Halfling => "Halfling",
            Race::Human => "Human",
        }
    }
}

/// Additional languages granted by an Intelligence modifier.
pub fn bonus_language_slots(intelligence_modifier: i32) -> u32 {
    intelligence_modifier.max(0) as u32
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Race {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dwarf" => Ok(Race::Dwarf),
            "elf" => Ok(Race::Elf),
            "halfling" => Ok(Race::Halfling),
            "human" => Ok(Race::Human),
            other => Err(DomainError::parse(format!("Unknown race: {}", other))),
        }
    }
}
