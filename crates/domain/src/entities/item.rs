//! Equipment entity - Gear carried in a character's inventory
//!
//! Items of the same name and category stack into one entry with an
//! `amount`. Only armor and shields can be worn.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::game_systems::bfrpg::ArmorWeight;
use crate::ids::ItemId;
use crate::value_objects::{convert_currency, AmountChange, Coin, ItemName};

/// Equipment category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Weapon,
    Armor,
    Shield,
    Ammunition,
    /// Everything else, including categories this version does not know
    #[default]
    #[serde(other)]
    General,
}

impl ItemCategory {
    /// Whether items of this category can be worn.
    pub fn is_wearable(self) -> bool {
        matches!(self, Self::Armor | Self::Shield)
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon => write!(f, "Weapon"),
            Self::Armor => write!(f, "Armor"),
            Self::Shield => write!(f, "Shield"),
            Self::Ammunition => write!(f, "Ammunition"),
            Self::General => write!(f, "General"),
        }
    }
}

impl FromStr for ItemCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weapon" => Ok(Self::Weapon),
            "armor" | "armour" => Ok(Self::Armor),
            "shield" => Ok(Self::Shield),
            "ammunition" | "ammo" => Ok(Self::Ammunition),
            "general" | "gear" => Ok(Self::General),
            other => Err(DomainError::parse(format!("Unknown item category: {}", other))),
        }
    }
}

fn default_cost_currency() -> Coin {
    Coin::Gold
}

/// A stack of identical equipment in an inventory.
///
/// Fields missing from imported data default to zero, so an entry without
/// weight or amount contributes nothing to carried weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    #[serde(default)]
    pub id: ItemId,
    pub name: ItemName,
    /// Weight of one unit in pounds
    #[serde(default)]
    pub weight: f64,
    /// Price of one unit, in `cost_currency`
    #[serde(default)]
    pub cost_value: f64,
    #[serde(default = "default_cost_currency")]
    pub cost_currency: Coin,
    #[serde(default, alias = "quantity")]
    pub amount: u32,
    #[serde(default)]
    pub category: ItemCategory,
    /// Armor class for armor, bonus for shields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_weight: Option<ArmorWeight>,
    #[serde(default)]
    pub wearing: bool,
}

impl EquipmentItem {
    pub fn new(
        name: ItemName,
        category: ItemCategory,
        weight: f64,
        cost_value: f64,
        cost_currency: Coin,
    ) -> Self {
        Self {
            id: ItemId::new(),
            name,
            weight,
            cost_value,
            cost_currency,
            amount: 1,
            category,
            ac: None,
            damage: None,
            range: None,
            armor_weight: None,
            wearing: false,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_ac(mut self, ac: i32) -> Self {
        self.ac = Some(ac);
        self
    }

    pub fn with_damage(mut self, damage: impl Into<String>) -> Self {
        self.damage = Some(damage.into());
        self
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    pub fn with_armor_weight(mut self, armor_weight: ArmorWeight) -> Self {
        self.armor_weight = Some(armor_weight);
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Weight of the whole stack.
    pub fn total_weight(&self) -> f64 {
        self.weight * f64::from(self.amount)
    }

    /// Price of `amount` units in copper pieces, rounded to the nearest coin.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` if the item carries a negative cost.
    pub fn cost_in_copper(&self, amount: u32) -> Result<u64, DomainError> {
        let unit_cp = convert_currency(self.cost_value, self.cost_currency, Coin::Copper)?;
        Ok((unit_cp * f64::from(amount)).round() as u64)
    }

    /// Whether `other` would merge into this stack when added.
    pub fn stacks_with(&self, other: &EquipmentItem) -> bool {
        !self.wearing
            && !other.wearing
            && self.category == other.category
            && self.name.matches(&other.name)
    }

    /// Remove `amount` units from the stack.
    ///
    /// # Errors
    ///
    /// See [`AmountChange::take`].
    pub fn take(&mut self, amount: u32) -> Result<AmountChange, DomainError> {
        let change = AmountChange::take(self.amount, amount)?;
        self.amount = change.remaining();
        Ok(change)
    }
}

/// Total carried weight of a list of items (weight x amount each).
pub fn calculate_total_weight(items: &[EquipmentItem]) -> f64 {
    items.iter().map(EquipmentItem::total_weight).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_parse_by_name() {
        assert_eq!(
            "Armour".parse::<ItemCategory>().ok(),
            Some(ItemCategory::Armor)
        );
        assert_eq!(
            "ammo".parse::<ItemCategory>().ok(),
            Some(ItemCategory::Ammunition)
        );
        assert!(matches!("wand".parse::<ItemCategory>(), Err(DomainError::Parse(_))));
    }

    fn rope() -> EquipmentItem {
        EquipmentItem::new(
            ItemName::new("Rope, 50'").expect("valid name"),
            ItemCategory::General,
            5.0,
            1.0,
            Coin::Gold,
        )
    }

    #[test]
    fn total_weight_multiplies_amount() {
        let items = vec![
            rope().with_amount(2),
            EquipmentItem::new(
                ItemName::new("Chain Mail").expect("valid"),
                ItemCategory::Armor,
                40.0,
                60.0,
                Coin::Gold,
            ),
        ];
        assert_eq!(calculate_total_weight(&items), 50.0);
        assert_eq!(calculate_total_weight(&[]), 0.0);
    }

    #[test]
    fn quantity_field_is_accepted_and_missing_fields_weigh_nothing() {
        let json = r#"[
            {"name": "Arrows", "weight": 0.1, "quantity": 20, "category": "ammunition"},
            {"name": "Mystery Box"},
            {"name": "Torch", "weight": 1, "amount": 3}
        ]"#;
        let items: Vec<EquipmentItem> = serde_json::from_str(json).expect("valid json");
        assert_eq!(items[0].amount, 20);
        assert_eq!(items[1].amount, 0);
        assert_eq!(items[1].cost_currency, Coin::Gold);
        assert!((calculate_total_weight(&items) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_category_reads_as_general() {
        let json = r#"{"name": "Lute", "category": "instrument"}"#;
        let item: EquipmentItem = serde_json::from_str(json).expect("valid json");
        assert_eq!(item.category, ItemCategory::General);
    }

    #[test]
    fn cost_in_copper_scales_with_amount() {
        let arrows = EquipmentItem::new(
            ItemName::new("Arrows").expect("valid"),
            ItemCategory::Ammunition,
            0.1,
            2.5,
            Coin::Silver,
        );
        assert_eq!(arrows.cost_in_copper(1), Ok(25));
        assert_eq!(arrows.cost_in_copper(4), Ok(100));
    }

    #[test]
    fn stacking_ignores_case_but_not_category_or_worn_items() {
        let a = rope();
        let mut b = rope();
        b.name = ItemName::new("ROPE, 50'").expect("valid");
        assert!(a.stacks_with(&b));

        b.category = ItemCategory::Weapon;
        assert!(!a.stacks_with(&b));

        let mut worn = rope();
        worn.wearing = true;
        assert!(!a.stacks_with(&worn));
    }

    #[test]
    fn take_reduces_amount() {
        let mut item = rope().with_amount(3);
        assert_eq!(item.take(2), Ok(AmountChange::Remaining(1)));
        assert_eq!(item.amount, 1);
        assert_eq!(item.take(1), Ok(AmountChange::Depleted));
        assert_eq!(item.amount, 0);
        assert!(item.take(1).is_err());
    }

    #[test]
    fn only_armor_and_shields_are_wearable() {
        assert!(ItemCategory::Armor.is_wearable());
        assert!(ItemCategory::Shield.is_wearable());
        assert!(!ItemCategory::Weapon.is_wearable());
    }
}
