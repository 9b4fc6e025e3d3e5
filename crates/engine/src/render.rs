//! Character sheet rendering
//!
//! [`SheetSummary`] collects every derived value once. It serializes as the
//! JSON sheet and implements `Display` for the plain-text one.

use std::fmt;

use bfrpg_domain::{
    Ability, Character, CurrencyPurse, EncumbranceConfig, EncumbranceTier, HitPoints,
    LoadThresholds, SavingThrows, SpellSlots, ThiefSkills, SAVE_NAMES,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityLine {
    pub ability: &'static str,
    pub score: i32,
    pub modifier: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentLine {
    pub name: String,
    pub amount: u32,
    pub total_weight: f64,
    pub wearing: bool,
}

/// Everything shown on a character sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSummary {
    pub name: String,
    pub race: String,
    pub class: String,
    pub level: u8,
    pub xp: u32,
    pub xp_for_next_level: Option<u32>,
    pub hit_points: HitPoints,
    pub alive: bool,
    pub armor_class: i32,
    pub attack_bonus: i32,
    pub abilities: Vec<AbilityLine>,
    pub saving_throws: SavingThrows,
    pub purse: CurrencyPurse,
    pub gold_value: f64,
    pub equipment: Vec<EquipmentLine>,
    pub total_weight: f64,
    pub carrying_capacity: LoadThresholds,
    pub encumbrance: EncumbranceTier,
    pub movement: u32,
    pub spell_slots: SpellSlots,
    pub prepared_spells: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thief_skills: Option<ThiefSkills>,
    pub languages: Vec<String>,
    pub open_language_slots: u32,
}

impl SheetSummary {
    pub fn new(character: &Character, encumbrance: &EncumbranceConfig) -> Self {
        let abilities = Ability::ALL
            .iter()
            .map(|&ability| AbilityLine {
                ability: ability.abbreviation(),
                score: character.abilities().get(ability).value(),
                modifier: character.modifier(ability),
            })
            .collect();
        let equipment = character
            .equipment()
            .iter()
            .map(|item| EquipmentLine {
                name: item.name.to_string(),
                amount: item.amount,
                total_weight: item.total_weight(),
                wearing: item.wearing,
            })
            .collect();
        let prepared_spells = character
            .spellbook()
            .prepared()
            .iter()
            .filter(|p| !p.cast)
            .map(|p| p.name.clone())
            .collect();

        Self {
            name: character.name().to_string(),
            race: character.race().display_name().to_string(),
            class: character.class().display_name().to_string(),
            level: character.level(),
            xp: character.xp(),
            xp_for_next_level: character.xp_for_next_level(),
            hit_points: character.hit_points(),
            alive: character.is_alive(),
            armor_class: character.armor_class(),
            attack_bonus: character.attack_bonus(),
            abilities,
            saving_throws: character.saving_throws(),
            purse: *character.purse(),
            gold_value: character.purse().total_gold_value(),
            equipment,
            total_weight: character.total_weight(),
            carrying_capacity: character.carrying_capacity(encumbrance),
            encumbrance: character.encumbrance(encumbrance),
            movement: character.movement(encumbrance),
            spell_slots: character.spell_slots(),
            prepared_spells,
            thief_skills: character.thief_skills(),
            languages: character.languages().to_vec(),
            open_language_slots: character.open_language_slots(),
        }
    }
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

impl fmt::Display for SheetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        write!(
            f,
            "{} {}, level {} (XP {}",
            self.race, self.class, self.level, self.xp
        )?;
        match self.xp_for_next_level {
            Some(next) => writeln!(f, " / {})", next)?,
            None => writeln!(f, ")")?,
        }
        write!(
            f,
            "HP {}/{}  AC {}  Attack {:+}",
            self.hit_points.current, self.hit_points.max, self.armor_class, self.attack_bonus
        )?;
        if !self.alive {
            write!(f, "  DEAD")?;
        }
        writeln!(f)?;

        writeln!(f)?;
        writeln!(f, "Abilities")?;
        for line in &self.abilities {
            writeln!(
                f,
                "  {} {:>2} ({:+})",
                line.ability, line.score, line.modifier
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Saving Throws")?;
        for (name, target) in SAVE_NAMES.iter().zip(self.saving_throws.as_array()) {
            writeln!(f, "  {:<22}{:>2}", name, target)?;
        }

        writeln!(f)?;
        writeln!(f, "Coins: {} ({:.2} gp total)", self.purse, self.gold_value)?;

        writeln!(f)?;
        writeln!(f, "Equipment")?;
        if self.equipment.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for item in &self.equipment {
            write!(f, "  {}", item.name)?;
            if item.amount != 1 {
                write!(f, " x{}", item.amount)?;
            }
            write!(f, " ({} lb)", item.total_weight)?;
            if item.wearing {
                write!(f, " [worn]")?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "Load: {:.1} lb of {}/{} ({}), movement {}'",
            self.total_weight,
            self.carrying_capacity.light,
            self.carrying_capacity.heavy,
            self.encumbrance,
            self.movement
        )?;

        if self.spell_slots.total() > 0 {
            let slots: Vec<String> = self
                .spell_slots
                .as_slice()
                .iter()
                .enumerate()
                .filter(|&(_, &count)| count > 0)
                .map(|(i, count)| format!("{} {}", ordinal(i + 1), count))
                .collect();
            writeln!(f)?;
            writeln!(f, "Spell slots: {}", slots.join(", "))?;
            if !self.prepared_spells.is_empty() {
                writeln!(f, "Prepared: {}", self.prepared_spells.join(", "))?;
            }
        }

        if let Some(skills) = &self.thief_skills {
            writeln!(f)?;
            writeln!(f, "Thief Skills")?;
            for (name, chance) in [
                ("Open Locks", skills.open_locks),
                ("Remove Traps", skills.remove_traps),
                ("Pick Pockets", skills.pick_pockets),
                ("Move Silently", skills.move_silently),
                ("Climb Walls", skills.climb_walls),
                ("Hide", skills.hide),
                ("Listen", skills.listen),
            ] {
                writeln!(f, "  {:<14}{:>3}%", name, chance)?;
            }
        }

        writeln!(f)?;
        write!(f, "Languages: {}", self.languages.join(", "))?;
        if self.open_language_slots > 0 {
            write!(f, " ({} open)", self.open_language_slots)?;
        }
        writeln!(f)
    }
}

/// Plain-text character sheet.
pub fn render_sheet(character: &Character, encumbrance: &EncumbranceConfig) -> String {
    SheetSummary::new(character, encumbrance).to_string()
}
