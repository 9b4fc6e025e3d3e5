//! Carrying capacity, encumbrance tiers, and movement.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::races::{LoadThresholds, Race};

/// Tunables for scaling a race's base load by Strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncumbranceConfig {
    /// Capacities are rounded to the nearest multiple of this many pounds.
    pub rounding_unit: u32,
    /// Fraction of the base load added per point of positive modifier.
    pub positive_step: f64,
    /// Fraction of the base load removed per point of negative modifier.
    pub negative_step: f64,
}

impl Default for EncumbranceConfig {
    fn default() -> Self {
        Self {
            rounding_unit: 5,
            positive_step: 0.10,
            negative_step: 0.20,
        }
    }
}

impl EncumbranceConfig {
    fn multiplier(&self, strength_modifier: i32) -> f64 {
        if strength_modifier >= 0 {
            1.0 + self.positive_step * f64::from(strength_modifier)
        } else {
            (1.0 + self.negative_step * f64::from(strength_modifier)).max(0.0)
        }
    }

    fn round(&self, pounds: f64) -> u32 {
        let unit = f64::from(self.rounding_unit.max(1));
        ((pounds / unit).round() * unit) as u32
    }
}

/// Carrying capacity with the default configuration.
pub fn carrying_capacity(race: Race, strength_modifier: i32) -> LoadThresholds {
    carrying_capacity_with(race, strength_modifier, &EncumbranceConfig::default())
}

/// Carrying capacity: the race's base load scaled by Strength, then rounded.
pub fn carrying_capacity_with(
    race: Race,
    strength_modifier: i32,
    config: &EncumbranceConfig,
) -> LoadThresholds {
    let base = race.base_load();
    let multiplier = config.multiplier(strength_modifier);
    LoadThresholds {
        light: config.round(f64::from(base.light) * multiplier),
        heavy: config.round(f64::from(base.heavy) * multiplier),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncumbranceTier {
    Light,
    Heavy,
    Overloaded,
}

impl fmt::Display for EncumbranceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncumbranceTier::Light => write!(f, "light"),
            EncumbranceTier::Heavy => write!(f, "heavy"),
            EncumbranceTier::Overloaded => write!(f, "overloaded"),
        }
    }
}

/// Classify a carried weight. Each threshold is inclusive.
pub fn encumbrance_tier(total_weight: f64, capacity: LoadThresholds) -> EncumbranceTier {
    if total_weight <= f64::from(capacity.light) {
        EncumbranceTier::Light
    } else if total_weight <= f64::from(capacity.heavy) {
        EncumbranceTier::Heavy
    } else {
        EncumbranceTier::Overloaded
    }
}

/// Armor weight class for movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorWeight {
    #[default]
    None,
    Leather,
    Metal,
}

/// Movement in feet per turn.
pub fn movement_rate(tier: EncumbranceTier, armor: ArmorWeight) -> u32 {
    match (tier, armor) {
        (EncumbranceTier::Overloaded, _) => 0,
        (EncumbranceTier::Light, ArmorWeight::None) => 40,
        (EncumbranceTier::Heavy, ArmorWeight::None) => 30,
        (EncumbranceTier::Light, ArmorWeight::Leather) => 30,
        (EncumbranceTier::Heavy, ArmorWeight::Leather) => 20,
        (EncumbranceTier::Light, ArmorWeight::Metal) => 20,
        (EncumbranceTier::Heavy, ArmorWeight::Metal) => 10,
    }
}
