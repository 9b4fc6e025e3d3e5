//! Character aggregate - A player character's sheet and its derived values
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: All fields are encapsulated
//! - **Newtypes**: `CharacterName` for the validated name
//! - **Valid by construction**: `create()` checks race and class rules
//! - **Derived values are computed**: modifiers, saves, AC, and load are never
//!   stored, so they cannot drift from the scores and gear they come from

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::entities::{calculate_total_weight, EquipmentItem, ItemCategory, Spell, SpellBook};
use crate::error::DomainError;
use crate::events::{DamageOutcome, HealOutcome, LevelUp, WearingChange, XpAward};
use crate::game_systems::bfrpg::{
    armor_class, bonus_language_slots, capped_xp_award, carrying_capacity_with, class_attack_bonus,
    class_hit_point_gain, class_saving_throws, encumbrance_tier, level_for_xp, movement_rate,
    spell_slots, thief_skills, xp_for_next_level, CharacterClass, EncumbranceConfig,
    EncumbranceTier, LoadThresholds, Race, SavingThrows, SpellSlots, ThiefSkills, MAX_LEVEL,
};
use crate::ids::{CharacterId, ItemId};
use crate::value_objects::{
    Ability, AbilityScores, AmountChange, CharacterName, Coin, CurrencyPurse,
};

/// Minimum score in a prime requisite.
const PRIME_REQUISITE_MINIMUM: i32 = 9;

/// Current and maximum hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub max: i32,
}

impl HitPoints {
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }
}

/// A Basic Fantasy RPG character
///
/// # Invariants
///
/// - `level` is within 1..=20
/// - `abilities` always report modifiers derived from their values
/// - `purse` holds whole, non-negative coin counts
/// - at most one armor and one shield are worn at a time
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    // Identity
    id: CharacterId,
    name: CharacterName,
    race: Race,
    class: CharacterClass,

    // Progression
    level: u8,
    xp: u32,
    hit_points: HitPoints,

    // Sheet
    abilities: AbilityScores,
    purse: CurrencyPurse,
    equipment: Vec<EquipmentItem>,
    spellbook: SpellBook,
    languages: Vec<String>,

    // Metadata
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a new 1st level character and roll its hit points.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - the race's ability requirements are not met
    /// - the race may not take the class
    /// - a prime requisite of the class is below 9
    pub fn create(
        name: CharacterName,
        race: Race,
        class: CharacterClass,
        abilities: AbilityScores,
        now: DateTime<Utc>,
        roll: &mut impl FnMut(u8) -> u8,
    ) -> Result<Self, DomainError> {
        race.check_requirements(&abilities)?;
        if !race.allows_class(class) {
            return Err(DomainError::validation(format!(
                "{} cannot be a {}",
                race.display_name(),
                class.display_name()
            )));
        }
        if let Some(ability) = class
            .prime_requisites()
            .iter()
            .find(|&&ability| abilities.get(ability).value() < PRIME_REQUISITE_MINIMUM)
        {
            return Err(DomainError::validation(format!(
                "{} requires {} of at least {}",
                class.display_name(),
                ability.display_name(),
                PRIME_REQUISITE_MINIMUM
            )));
        }

        let hp = class_hit_point_gain(
            class,
            race,
            1,
            abilities.modifier(Ability::Constitution),
            roll,
        );
        tracing::debug!(name = %name, race = %race, class = %class, hp, "Character created");

        Ok(Self {
            id: CharacterId::new(),
            name,
            race,
            class,
            level: 1,
            xp: 0,
            hit_points: HitPoints::full(hp),
            abilities,
            purse: CurrencyPurse::default(),
            equipment: Vec::new(),
            spellbook: SpellBook::new(),
            languages: race
                .native_languages()
                .iter()
                .map(|lang| lang.to_string())
                .collect(),
            created_at: now,
            updated_at: now,
        })
    }

    // =========================================================================
    // Identity Accessors (read-only)
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    #[inline]
    pub fn race(&self) -> Race {
        self.race
    }

    #[inline]
    pub fn class(&self) -> CharacterClass {
        self.class
    }

    // =========================================================================
    // Progression Accessors
    // =========================================================================

    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[inline]
    pub fn xp(&self) -> u32 {
        self.xp
    }

    /// XP needed for the next level, or `None` at maximum level.
    pub fn xp_for_next_level(&self) -> Option<u32> {
        xp_for_next_level(self.class, self.level)
    }

    #[inline]
    pub fn hit_points(&self) -> HitPoints {
        self.hit_points
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hit_points.current > 0
    }

    // =========================================================================
    // Sheet Accessors
    // =========================================================================

    #[inline]
    pub fn abilities(&self) -> &AbilityScores {
        &self.abilities
    }

    #[inline]
    pub fn purse(&self) -> &CurrencyPurse {
        &self.purse
    }

    /// Mutable access to the coin purse for direct adds and spends.
    #[inline]
    pub fn purse_mut(&mut self) -> &mut CurrencyPurse {
        &mut self.purse
    }

    #[inline]
    pub fn equipment(&self) -> &[EquipmentItem] {
        &self.equipment
    }

    pub fn item(&self, item_id: ItemId) -> Option<&EquipmentItem> {
        self.equipment.iter().find(|item| item.id == item_id)
    }

    #[inline]
    pub fn spellbook(&self) -> &SpellBook {
        &self.spellbook
    }

    #[inline]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    // =========================================================================
    // Timestamp Accessors
    // =========================================================================

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Builder Methods (for construction)
    // =========================================================================

    /// Start with a given purse (e.g., rolled starting gold).
    pub fn with_purse(mut self, purse: CurrencyPurse) -> Self {
        self.purse = purse;
        self
    }

    // =========================================================================
    // Derived Values
    // =========================================================================

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    pub fn attack_bonus(&self) -> i32 {
        class_attack_bonus(self.level, self.class)
    }

    pub fn saving_throws(&self) -> SavingThrows {
        class_saving_throws(self.level, self.class, self.race)
    }

    fn worn(&self, category: ItemCategory) -> Option<&EquipmentItem> {
        self.equipment
            .iter()
            .find(|item| item.wearing && item.category == category)
    }

    /// Armor class from worn armor, worn shield, and Dexterity.
    pub fn armor_class(&self) -> i32 {
        armor_class(
            self.worn(ItemCategory::Armor).and_then(|armor| armor.ac),
            self.worn(ItemCategory::Shield).and_then(|shield| shield.ac),
            self.modifier(Ability::Dexterity),
        )
    }

    /// Weight of all equipment plus coins.
    pub fn total_weight(&self) -> f64 {
        calculate_total_weight(&self.equipment) + self.purse.coin_weight()
    }

    pub fn carrying_capacity(&self, config: &EncumbranceConfig) -> LoadThresholds {
        carrying_capacity_with(self.race, self.modifier(Ability::Strength), config)
    }

    pub fn encumbrance(&self, config: &EncumbranceConfig) -> EncumbranceTier {
        encumbrance_tier(self.total_weight(), self.carrying_capacity(config))
    }

    /// Movement in feet per turn. Worn armor without a weight class counts as none.
    pub fn movement(&self, config: &EncumbranceConfig) -> u32 {
        let armor = self
            .worn(ItemCategory::Armor)
            .and_then(|armor| armor.armor_weight)
            .unwrap_or_default();
        movement_rate(self.encumbrance(config), armor)
    }

    pub fn spell_slots(&self) -> SpellSlots {
        spell_slots(self.class, self.level)
    }

    pub fn thief_skills(&self) -> Option<ThiefSkills> {
        self.class
            .has_thief_skills()
            .then(|| thief_skills(self.level))
    }

    pub fn hit_die(&self) -> &'static str {
        self.class.hit_die()
    }

    /// Bonus languages the character may still learn.
    pub fn open_language_slots(&self) -> u32 {
        let native = self.race.native_languages().len();
        let extra = self.languages.len().saturating_sub(native) as u32;
        bonus_language_slots(self.modifier(Ability::Intelligence)).saturating_sub(extra)
    }

    // =========================================================================
    // Mutation Methods
    // =========================================================================

    pub fn set_name(&mut self, name: CharacterName, now: DateTime<Utc>) {
        self.name = name;
        self.updated_at = now;
    }

    /// Change one ability score. Its modifier follows automatically.
    pub fn set_ability(&mut self, ability: Ability, value: i32, now: DateTime<Utc>) {
        self.abilities.set(ability, value);
        self.updated_at = now;
    }

    /// Award experience points, gaining at most one level.
    ///
    /// A level gained rolls hit points for the new level and adds them to both
    /// current and maximum HP.
    pub fn award_xp(
        &mut self,
        amount: u32,
        now: DateTime<Utc>,
        roll: &mut impl FnMut(u8) -> u8,
    ) -> XpAward {
        let total_xp = capped_xp_award(self.class, self.level, self.xp, amount).max(self.xp);
        let xp_gained = total_xp - self.xp;
        self.xp = total_xp;
        self.updated_at = now;

        let target = level_for_xp(self.class, total_xp).min(self.level.saturating_add(1));
        if target <= self.level {
            return XpAward {
                xp_gained,
                total_xp,
                level_up: None,
            };
        }

        let hp_gained = class_hit_point_gain(
            self.class,
            self.race,
            target,
            self.modifier(Ability::Constitution),
            roll,
        );
        let from = self.level;
        self.level = target;
        self.hit_points.max += hp_gained;
        self.hit_points.current += hp_gained;
        tracing::info!(
            character = %self.name,
            from,
            to = target,
            hp_gained,
            "Level gained"
        );

        XpAward {
            xp_gained,
            total_xp,
            level_up: Some(LevelUp {
                from,
                to: target,
                hp_gained,
            }),
        }
    }

    pub fn apply_damage(&mut self, damage: i32, now: DateTime<Utc>) -> DamageOutcome {
        let (hp, outcome) = DamageOutcome::resolve(self.hit_points.current, damage);
        self.hit_points.current = hp;
        self.updated_at = now;
        outcome
    }

    pub fn heal(&mut self, amount: i32, now: DateTime<Utc>) -> HealOutcome {
        let (hp, outcome) =
            HealOutcome::resolve(self.hit_points.current, self.hit_points.max, amount);
        self.hit_points.current = hp;
        self.updated_at = now;
        outcome
    }

    /// Learn an extra language using a bonus language slot.
    ///
    /// # Errors
    ///
    /// - `Validation` if the language is already known
    /// - `ContainerFull` if no bonus slots remain
    pub fn learn_language(
        &mut self,
        language: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let language = language.into();
        let language = language.trim();
        if self
            .languages
            .iter()
            .any(|known| known.eq_ignore_ascii_case(language))
        {
            return Err(DomainError::validation(format!(
                "{language} is already known"
            )));
        }
        if self.open_language_slots() == 0 {
            let max = bonus_language_slots(self.modifier(Ability::Intelligence));
            return Err(DomainError::container_full(max, max));
        }
        self.languages.push(language.to_string());
        self.updated_at = now;
        Ok(())
    }

    // =========================================================================
    // Equipment
    // =========================================================================

    fn item_index(&self, item_id: ItemId) -> Result<usize, DomainError> {
        self.equipment
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| DomainError::not_found("Item", item_id.to_string()))
    }

    /// Put an item in the inventory, merging it into a matching unworn stack.
    ///
    /// Returns the id of the stack that now holds it.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the item's amount is zero.
    pub fn add_item(
        &mut self,
        item: EquipmentItem,
        now: DateTime<Utc>,
    ) -> Result<ItemId, DomainError> {
        if item.amount == 0 {
            return Err(DomainError::validation("Amount must be at least 1"));
        }
        self.updated_at = now;
        if let Some(existing) = self
            .equipment
            .iter_mut()
            .find(|existing| existing.stacks_with(&item))
        {
            existing.amount = existing.amount.saturating_add(item.amount);
            return Ok(existing.id);
        }
        let id = item.id;
        self.equipment.push(item);
        Ok(id)
    }

    /// Use up `amount` units of an item, removing the stack when it runs out.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the item is not carried
    /// - `Constraint` if fewer than `amount` units are carried
    pub fn use_item(
        &mut self,
        item_id: ItemId,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<AmountChange, DomainError> {
        let index = self.item_index(item_id)?;
        let change = self.equipment[index].take(amount)?;
        if change.should_remove() {
            self.equipment.remove(index);
        }
        self.updated_at = now;
        Ok(change)
    }

    /// Sell `amount` units of an item for `sale_ratio` of its price.
    ///
    /// The refund is paid into the purse as gold, silver, and copper. Returns
    /// the refund in copper pieces.
    ///
    /// # Errors
    ///
    /// - `Validation` if `sale_ratio` is outside 0.0..=1.0
    /// - the errors of [`Character::use_item`]
    pub fn sell_item(
        &mut self,
        item_id: ItemId,
        amount: u32,
        sale_ratio: f64,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        if !(0.0..=1.0).contains(&sale_ratio) {
            return Err(DomainError::validation(format!(
                "Sale ratio must be between 0 and 1, got {sale_ratio}"
            )));
        }
        let index = self.item_index(item_id)?;
        let price_cp = self.equipment[index].cost_in_copper(amount)?;
        let refund_cp = (price_cp as f64 * sale_ratio).round() as u64;

        self.use_item(item_id, amount, now)?;
        self.purse.receive_copper(refund_cp);
        tracing::debug!(item = %item_id, amount, refund_cp, "Item sold");
        Ok(refund_cp)
    }

    /// Buy an item (its whole `amount`) and add it to the inventory.
    ///
    /// # Errors
    ///
    /// - `Validation` if the item's amount is zero
    /// - `InsufficientFunds` if the purse cannot cover the price
    pub fn buy_item(
        &mut self,
        item: EquipmentItem,
        now: DateTime<Utc>,
    ) -> Result<ItemId, DomainError> {
        if item.amount == 0 {
            return Err(DomainError::validation("Amount must be at least 1"));
        }
        let price_cp = item.cost_in_copper(item.amount)?;
        self.purse.spend(price_cp as f64, Coin::Copper)?;
        self.add_item(item, now)
    }

    /// Toggle whether an armor or shield is worn.
    ///
    /// Putting an item on takes off any other worn item of the same category.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the item is not carried
    /// - `Constraint` if the item is neither armor nor a shield
    pub fn toggle_wearing(
        &mut self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<WearingChange, DomainError> {
        let index = self.item_index(item_id)?;
        let category = self.equipment[index].category;
        if !category.is_wearable() {
            return Err(DomainError::constraint(format!(
                "{} is not armor or a shield",
                self.equipment[index].name
            )));
        }
        self.updated_at = now;

        if self.equipment[index].wearing {
            self.equipment[index].wearing = false;
            return Ok(WearingChange::TakenOff { item: item_id });
        }

        let mut replaced = None;
        self.equipment
            .iter_mut()
            .filter(|item| item.wearing && item.category == category)
            .for_each(|item| {
                item.wearing = false;
                replaced.get_or_insert(item.id);
            });
        self.equipment[index].wearing = true;
        Ok(WearingChange::PutOn {
            item: item_id,
            replaced,
        })
    }

    // =========================================================================
    // Spells
    // =========================================================================

    /// # Errors
    ///
    /// See [`SpellBook::learn`].
    pub fn learn_spell(&mut self, spell: Spell, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.spellbook.learn(spell, self.class)?;
        self.updated_at = now;
        Ok(())
    }

    /// Prepare a known spell in a free slot. Returns the spell's level.
    ///
    /// # Errors
    ///
    /// See [`SpellBook::prepare`].
    pub fn prepare_spell(&mut self, name: &str, now: DateTime<Utc>) -> Result<u8, DomainError> {
        let slots = self.spell_slots();
        let level = self.spellbook.prepare(name, self.class, &slots)?;
        self.updated_at = now;
        Ok(level)
    }

    /// # Errors
    ///
    /// See [`SpellBook::cast`].
    pub fn cast_spell(&mut self, name: &str, now: DateTime<Utc>) -> Result<u8, DomainError> {
        let level = self.spellbook.cast(name)?;
        self.updated_at = now;
        Ok(level)
    }

    /// A night's rest restores every cast spell.
    pub fn rest(&mut self, now: DateTime<Utc>) -> usize {
        self.updated_at = now;
        self.spellbook.rest()
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Intermediate format for serialization that matches the wire format
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterWireFormat {
    id: CharacterId,
    name: CharacterName,
    race: Race,
    class: CharacterClass,
    level: u8,
    #[serde(default)]
    xp: u32,
    hp: HitPoints,
    abilities: AbilityScores,
    #[serde(default)]
    currency: CurrencyPurse,
    #[serde(default)]
    equipment: Vec<EquipmentItem>,
    #[serde(default)]
    spells: SpellBook,
    #[serde(default)]
    languages: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Serialize for Character {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = CharacterWireFormat {
            id: self.id,
            name: self.name.clone(),
            race: self.race,
            class: self.class,
            level: self.level,
            xp: self.xp,
            hp: self.hit_points,
            abilities: self.abilities,
            currency: self.purse,
            equipment: self.equipment.clone(),
            spells: self.spellbook.clone(),
            languages: self.languages.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        wire.serialize(serializer)
    }
}

/// Take off every worn armor or shield after the first of its category.
fn keep_one_worn_per_category(equipment: &mut [EquipmentItem]) {
    let mut armor_worn = false;
    let mut shield_worn = false;
    for item in equipment.iter_mut().filter(|item| item.wearing) {
        let already_worn = match item.category {
            ItemCategory::Armor => &mut armor_worn,
            ItemCategory::Shield => &mut shield_worn,
            _ => {
                item.wearing = false;
                continue;
            }
        };
        if *already_worn {
            tracing::warn!(item = %item.name, "Dropping duplicate worn {}", item.category);
            item.wearing = false;
        }
        *already_worn = true;
    }
}

impl<'de> Deserialize<'de> for Character {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = CharacterWireFormat::deserialize(deserializer)?;
        if !(1..=MAX_LEVEL).contains(&wire.level) {
            return Err(de::Error::custom(format!(
                "level must be between 1 and {MAX_LEVEL}, got {}",
                wire.level
            )));
        }

        let mut equipment = wire.equipment;
        keep_one_worn_per_category(&mut equipment);

        Ok(Character {
            id: wire.id,
            name: wire.name,
            race: wire.race,
            class: wire.class,
            level: wire.level,
            xp: wire.xp,
            hit_points: wire.hp,
            abilities: wire.abilities,
            purse: wire.currency,
            equipment,
            spellbook: wire.spells,
            languages: wire.languages,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
