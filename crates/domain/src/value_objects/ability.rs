//! Ability scores and their modifiers.
//!
//! A score's modifier is always derived from its value. It is serialized
//! alongside the value for display, but recomputed on every read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Upper bound of each modifier bucket, paired with the modifier.
/// Scores above the last bound get +3.
const MODIFIER_BREAKPOINTS: [(i32, i32); 6] = [
    (3, -3),
    (5, -2),
    (8, -1),
    (12, 0),
    (15, 1),
    (17, 2),
];

/// Modifier for an ability score.
///
/// Total over all integers: scores below 3 share the -3 bucket and scores
/// above 18 share the +3 bucket.
pub fn modifier_for(score: i32) -> i32 {
    MODIFIER_BREAKPOINTS
        .iter()
        .find(|(bound, _)| score <= *bound)
        .map(|(_, modifier)| *modifier)
        .unwrap_or(3)
}

// ============================================================================
// Ability
// ============================================================================

/// The six abilities every character has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Short uppercase name (e.g., "STR").
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Dexterity => "Dexterity",
            Self::Constitution => "Constitution",
            Self::Intelligence => "Intelligence",
            Self::Wisdom => "Wisdom",
            Self::Charisma => "Charisma",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|a| {
                a.display_name().eq_ignore_ascii_case(&lowered)
                    || a.abbreviation().eq_ignore_ascii_case(&lowered)
            })
            .ok_or_else(|| DomainError::parse(format!("Unknown ability: {}", s)))
    }
}

// ============================================================================
// AbilityScore
// ============================================================================

/// Serialized shape of an ability score. The stored modifier is ignored.
#[derive(Serialize, Deserialize)]
struct AbilityScoreWireFormat {
    value: i32,
    #[serde(default)]
    modifier: i32,
}

/// A single ability score with its derived modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AbilityScoreWireFormat", into = "AbilityScoreWireFormat")]
pub struct AbilityScore {
    value: i32,
}

impl AbilityScore {
    pub fn new(value: i32) -> Self {
        Self { value }
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Modifier derived from the current value.
    #[inline]
    pub fn modifier(&self) -> i32 {
        modifier_for(self.value)
    }
}

impl Default for AbilityScore {
    fn default() -> Self {
        Self::new(10)
    }
}

impl From<AbilityScoreWireFormat> for AbilityScore {
    fn from(wire: AbilityScoreWireFormat) -> Self {
        Self::new(wire.value)
    }
}

impl From<AbilityScore> for AbilityScoreWireFormat {
    fn from(score: AbilityScore) -> Self {
        Self {
            value: score.value,
            modifier: score.modifier(),
        }
    }
}

// ============================================================================
// AbilityScores
// ============================================================================

/// The full set of six ability scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: AbilityScore,
    pub dexterity: AbilityScore,
    pub constitution: AbilityScore,
    pub intelligence: AbilityScore,
    pub wisdom: AbilityScore,
    pub charisma: AbilityScore,
}

impl AbilityScores {
    /// Build from raw values in the canonical order (STR, DEX, CON, INT, WIS, CHA).
    pub fn from_values(values: [i32; 6]) -> Self {
        let [strength, dexterity, constitution, intelligence, wisdom, charisma] = values;
        Self {
            strength: AbilityScore::new(strength),
            dexterity: AbilityScore::new(dexterity),
            constitution: AbilityScore::new(constitution),
            intelligence: AbilityScore::new(intelligence),
            wisdom: AbilityScore::new(wisdom),
            charisma: AbilityScore::new(charisma),
        }
    }

    pub fn get(&self, ability: Ability) -> AbilityScore {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Replace one score; its modifier follows automatically.
    pub fn set(&mut self, ability: Ability, value: i32) {
        let slot = match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        };
        *slot = AbilityScore::new(value);
    }

    #[inline]
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.get(ability).modifier()
    }
}

/// Roll 3d6 in order for each ability.
///
/// `roll` returns one result of a die with the given number of sides.
pub fn roll_ability_scores(roll: &mut impl FnMut(u8) -> u8) -> AbilityScores {
    let mut values = [0; 6];
    for value in values.iter_mut() {
        *value = (0..3).map(|_| i32::from(roll(6).clamp(1, 6))).sum();
    }
    AbilityScores::from_values(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_matches_table_at_breakpoints() {
        assert_eq!(modifier_for(3), -3);
        assert_eq!(modifier_for(4), -2);
        assert_eq!(modifier_for(5), -2);
        assert_eq!(modifier_for(6), -1);
        assert_eq!(modifier_for(8), -1);
        assert_eq!(modifier_for(9), 0);
        assert_eq!(modifier_for(12), 0);
        assert_eq!(modifier_for(13), 1);
        assert_eq!(modifier_for(15), 1);
        assert_eq!(modifier_for(16), 2);
        assert_eq!(modifier_for(17), 2);
        assert_eq!(modifier_for(18), 3);
    }

    #[test]
    fn modifier_clamps_out_of_range_scores() {
        assert_eq!(modifier_for(-4), -3);
        assert_eq!(modifier_for(0), -3);
        assert_eq!(modifier_for(25), 3);
    }

    #[test]
    fn modifier_is_monotonic() {
        for score in -5..30 {
            assert!(modifier_for(score) <= modifier_for(score + 1));
        }
    }

    #[test]
    fn set_recomputes_modifier() {
        let mut scores = AbilityScores::from_values([10, 10, 10, 10, 10, 10]);
        assert_eq!(scores.modifier(Ability::Strength), 0);
        scores.set(Ability::Strength, 17);
        assert_eq!(scores.modifier(Ability::Strength), 2);
    }

    #[test]
    fn deserialize_ignores_stale_modifier() {
        let score: AbilityScore =
            serde_json::from_str(r#"{"value": 16, "modifier": -3}"#).expect("deserialize");
        assert_eq!(score.modifier(), 2);

        let json = serde_json::to_value(score).expect("serialize");
        assert_eq!(json["modifier"], 2);
    }

    #[test]
    fn roll_ability_scores_clamps_roller_output() {
        let high = roll_ability_scores(&mut |_| 9);
        assert_eq!(high.strength.value(), 18);
        let low = roll_ability_scores(&mut |_| 0);
        assert_eq!(low.charisma.value(), 3);
    }

    #[test]
    fn roll_ability_scores_sums_three_dice() {
        let mut faces = [6u8, 6, 6, 1, 1, 1, 3, 4, 5, 2, 2, 2, 4, 4, 4, 5, 5, 6].into_iter();
        let mut roll = |_sides: u8| faces.next().unwrap_or(1);
        let scores = roll_ability_scores(&mut roll);
        assert_eq!(scores.strength.value(), 18);
        assert_eq!(scores.dexterity.value(), 3);
        assert_eq!(scores.constitution.value(), 12);
        assert_eq!(scores.intelligence.value(), 6);
        assert_eq!(scores.wisdom.value(), 12);
        assert_eq!(scores.charisma.value(), 16);
    }

    #[test]
    fn ability_parses_abbreviation_and_name() {
        assert_eq!("dex".parse::<Ability>().expect("parse"), Ability::Dexterity);
        assert_eq!("Wisdom".parse::<Ability>().expect("parse"), Ability::Wisdom);
        assert!("luck".parse::<Ability>().is_err());
    }
}
