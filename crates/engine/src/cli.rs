//! Command-line interface
//!
//! Commands:
//! - `sheet <file>` - print the derived sheet for a character file
//! - `convert <amount> <from> <to>` - convert between coin types
//! - `scroll-cost <level>` - gold needed to scribe a scroll
//! - `create --name --race --class [--out <file>]` - roll a new character
//! - `award-xp <file> <amount>` - award experience and save the file back
//! - `buy <file> --name --cost [..]` - pay for an item and add it to the inventory
//! - `sell <file> <item> <amount>` - sell carried items for `BFRPG_SALE_RATIO` of their price
//! - `rules <class> <level> [--race] [--system]` - class tables by name
//!
//! Every command honors the global `--format` flag, which overrides
//! `BFRPG_OUTPUT_FORMAT`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bfrpg_domain::game_systems::bfrpg::MAX_SPELL_LEVEL;
use bfrpg_domain::{
    convert_currency, roll_ability_scores, roll_starting_gold, scroll_cost, Character,
    CharacterClass, CharacterName, Coin, CurrencyPurse, DomainError, EquipmentItem,
    GameSystemRegistry, ItemCategory, ItemName, Race,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rand::Rng;
use serde_json::json;

use crate::config::{EngineConfig, OutputFormat};
use crate::export::{load_character, save_character, CharacterExport};
use crate::render::SheetSummary;

/// Ability score sets rolled before `create` gives up on a race and class.
pub const MAX_CREATION_ATTEMPTS: u32 = 1000;

#[derive(Debug, Parser)]
#[command(name = "bfrpg-engine")]
#[command(about = "Basic Fantasy RPG character sheets and rules calculators")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (overrides BFRPG_OUTPUT_FORMAT)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the character sheet stored in an export file
    Sheet {
        /// Character export (JSON)
        file: PathBuf,
    },
    /// Convert an amount of coin into another denomination
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// pp, gp, ep, sp, cp or the full coin name
        from: Coin,
        to: Coin,
    },
    /// Gold needed to scribe a scroll of a spell level
    ScrollCost { level: u8 },
    /// Roll up a new 1st level character
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        race: Race,
        /// cleric, fighter, magic-user, thief, fighter/magic-user, magic-user/thief
        #[arg(long)]
        class: CharacterClass,
        /// Save the export here instead of printing it
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Award experience points and save the character back
    AwardXp { file: PathBuf, amount: u32 },
    /// Buy an item and save the character back
    Buy {
        file: PathBuf,
        #[arg(long)]
        name: String,
        /// weapon, armor, shield, ammunition or general
        #[arg(long, default_value = "general")]
        category: ItemCategory,
        /// Weight of one unit in pounds
        #[arg(long, default_value_t = 0.0)]
        weight: f64,
        /// Price of one unit
        #[arg(long)]
        cost: f64,
        #[arg(long, default_value = "gp")]
        currency: Coin,
        #[arg(long, default_value_t = 1)]
        amount: u32,
    },
    /// Sell carried items and save the character back
    Sell {
        file: PathBuf,
        /// Item name, matched case-insensitively
        item: String,
        amount: u32,
    },
    /// Look up attack bonus, saves, and spell slots by class name
    Rules {
        class: String,
        level: u8,
        #[arg(long, default_value = "human")]
        race: String,
        #[arg(long, default_value = "bfrpg")]
        system: String,
    },
}

/// A roller backed by the thread-local RNG.
pub fn thread_roller() -> impl FnMut(u8) -> u8 {
    let mut rng = rand::thread_rng();
    move |sides| rng.gen_range(1..=sides.max(1))
}

/// Execute one parsed command, writing its result to `out`.
pub fn run(
    cli: Cli,
    config: &EngineConfig,
    out: &mut impl Write,
    roll: &mut impl FnMut(u8) -> u8,
) -> Result<()> {
    let format = cli.format.unwrap_or(config.output_format);
    let now = Utc::now();

    match cli.command {
        Command::Sheet { file } => {
            let export = load_character(&file)?;
            let summary = SheetSummary::new(&export.character, &config.encumbrance());
            match format {
                OutputFormat::Text => write!(out, "{}", summary)?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?,
            }
        }
        Command::Convert { amount, from, to } => {
            let result = convert_currency(amount, from, to)?;
            match format {
                OutputFormat::Text => writeln!(
                    out,
                    "{} {} = {} {}",
                    amount,
                    from.abbreviation(),
                    result,
                    to.abbreviation()
                )?,
                OutputFormat::Json => writeln!(
                    out,
                    "{}",
                    json!({ "amount": amount, "from": from, "to": to, "result": result })
                )?,
            }
        }
        Command::ScrollCost { level } => {
            if !(1..=MAX_SPELL_LEVEL).contains(&level) {
                bail!("spell level must be between 1 and {}", MAX_SPELL_LEVEL);
            }
            let cost = scroll_cost(level);
            match format {
                OutputFormat::Text => writeln!(out, "Level {} scroll: {} gp", level, cost)?,
                OutputFormat::Json => {
                    writeln!(out, "{}", json!({ "spellLevel": level, "costGp": cost }))?
                }
            }
        }
        Command::Create {
            name,
            race,
            class,
            out: path,
        } => {
            let character = create_character(&name, race, class, now, roll)?;
            write_created(&character, path.as_deref(), format, now, out)?;
        }
        Command::AwardXp { file, amount } => {
            let mut character = load_character(&file)?.character;
            let award = character.award_xp(amount, now, roll);
            save_character(&file, &character, now)?;
            match format {
                OutputFormat::Text => {
                    writeln!(
                        out,
                        "{} gains {} XP (total {})",
                        character.name(),
                        award.xp_gained,
                        award.total_xp
                    )?;
                    if let Some(level_up) = award.level_up {
                        writeln!(
                            out,
                            "Level {} -> {} (+{} HP)",
                            level_up.from, level_up.to, level_up.hp_gained
                        )?;
                    }
                }
                OutputFormat::Json => {
                    let level_up = award.level_up.map(|l| {
                        json!({ "from": l.from, "to": l.to, "hpGained": l.hp_gained })
                    });
                    writeln!(
                        out,
                        "{}",
                        json!({
                            "xpGained": award.xp_gained,
                            "totalXp": award.total_xp,
                            "levelUp": level_up,
                        })
                    )?;
                }
            }
        }
        Command::Buy {
            file,
            name,
            category,
            weight,
            cost,
            currency,
            amount,
        } => {
            let mut character = load_character(&file)?.character;
            let item = EquipmentItem::new(ItemName::new(name)?, category, weight, cost, currency)
                .with_amount(amount);
            let name = item.name.clone();
            let price_cp = item.cost_in_copper(amount)?;
            character.buy_item(item, now)?;
            save_character(&file, &character, now)?;
            tracing::info!(
                character = %character.name(),
                item = %name,
                amount,
                price_cp,
                "Item bought"
            );
            write_trade(&character, "buys", &name, amount, price_cp, format, out)?;
        }
        Command::Sell { file, item, amount } => {
            let mut character = load_character(&file)?.character;
            let wanted = ItemName::new(item)?;
            let (item_id, name) = character
                .equipment()
                .iter()
                .find(|carried| carried.name.matches(&wanted))
                .map(|carried| (carried.id, carried.name.clone()))
                .with_context(|| format!("{} carries no {}", character.name(), wanted))?;
            let refund_cp = character.sell_item(item_id, amount, config.sale_ratio, now)?;
            save_character(&file, &character, now)?;
            tracing::info!(
                character = %character.name(),
                item = %name,
                amount,
                refund_cp,
                "Item sold"
            );
            write_trade(&character, "sells", &name, amount, refund_cp, format, out)?;
        }
        Command::Rules {
            class,
            level,
            race,
            system,
        } => rules(&class, level, &race, &system, format, out)?,
    }
    Ok(())
}

/// Roll ability scores until they qualify for the race and class, then
/// create the character with rolled starting gold.
pub fn create_character(
    name: &str,
    race: Race,
    class: CharacterClass,
    now: DateTime<Utc>,
    roll: &mut impl FnMut(u8) -> u8,
) -> Result<Character> {
    if !race.allows_class(class) {
        bail!(
            "{} cannot be a {}",
            race.display_name(),
            class.display_name()
        );
    }
    let name = CharacterName::new(name)?;

    for attempt in 1..=MAX_CREATION_ATTEMPTS {
        let scores = roll_ability_scores(roll);
        match Character::create(name.clone(), race, class, scores, now, roll) {
            Ok(character) => {
                let gold = roll_starting_gold(roll);
                tracing::info!(
                    character = %character.name(),
                    attempt,
                    gold,
                    "Character rolled"
                );
                return Ok(character.with_purse(CurrencyPurse::with_gold(gold)));
            }
            Err(DomainError::Validation(reason)) => {
                tracing::debug!(attempt, %reason, "Scores do not qualify, rerolling");
            }
            Err(e) => return Err(e.into()),
        }
    }
    bail!(
        "no qualifying ability scores for a {} {} after {} attempts",
        race.display_name(),
        class.display_name(),
        MAX_CREATION_ATTEMPTS
    )
}

fn write_created(
    character: &Character,
    path: Option<&Path>,
    format: OutputFormat,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<()> {
    let Some(path) = path else {
        let json = CharacterExport::new(character.clone(), now).to_json()?;
        writeln!(out, "{}", json)?;
        return Ok(());
    };

    save_character(path, character, now)?;
    match format {
        OutputFormat::Text => writeln!(
            out,
            "Created {} the {} {} in {}",
            character.name(),
            character.race().display_name(),
            character.class().display_name(),
            path.display()
        )?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            json!({ "created": character.id().to_string(), "path": path.display().to_string() })
        )?,
    }
    Ok(())
}

fn write_trade(
    character: &Character,
    verb: &str,
    item: &ItemName,
    amount: u32,
    copper: u64,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(
            out,
            "{} {} {} x{} for {} cp (purse: {})",
            character.name(),
            verb,
            item,
            amount,
            copper,
            character.purse()
        )?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            json!({
                "item": item.as_str(),
                "amount": amount,
                "copper": copper,
                "purse": character.purse(),
            })
        )?,
    }
    Ok(())
}

fn rules(
    class: &str,
    level: u8,
    race: &str,
    system_id: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let registry = GameSystemRegistry::new();
    let system = registry.get(system_id).with_context(|| {
        format!(
            "unknown game system '{}' (available: {})",
            system_id,
            registry.list_systems().join(", ")
        )
    })?;
    let engine = system.calculation_engine();

    let hit_die = engine.hit_die(class);
    let attack_bonus = engine.attack_bonus(level, class);
    let saves = engine.saving_throws(level, class, race);
    let mut slots: Vec<(u8, u8)> = system
        .spellcasting_system()
        .filter(|casting| casting.is_caster(class))
        .map(|casting| casting.spell_slots(class, level).into_iter().collect())
        .unwrap_or_default();
    slots.sort_unstable();

    match format {
        OutputFormat::Text => {
            writeln!(out, "{} {} level {}", system.display_name(), class, level)?;
            writeln!(out, "Hit die: {}", hit_die)?;
            writeln!(out, "Attack bonus: {:+}", attack_bonus)?;
            for save in &saves {
                writeln!(out, "  {:<22}{:>2}", save.name, save.target)?;
            }
            if !slots.is_empty() {
                let listed: Vec<String> = slots
                    .iter()
                    .map(|(spell_level, count)| format!("{}:{}", spell_level, count))
                    .collect();
                writeln!(out, "Spell slots: {}", listed.join(" "))?;
            }
        }
        OutputFormat::Json => {
            let saves: serde_json::Map<String, serde_json::Value> = saves
                .iter()
                .map(|save| (save.name.to_string(), json!(save.target)))
                .collect();
            let slots: Vec<_> = slots
                .iter()
                .map(|(spell_level, count)| json!({ "spellLevel": spell_level, "slots": count }))
                .collect();
            writeln!(
                out,
                "{}",
                json!({
                    "system": system.system_id(),
                    "class": class,
                    "level": level,
                    "hitDie": hit_die,
                    "attackBonus": attack_bonus,
                    "savingThrows": saves,
                    "spellSlots": slots,
                })
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(face: u8) -> impl FnMut(u8) -> u8 {
        move |sides| face.min(sides)
    }

    fn run_args(args: &[&str], config: &EngineConfig, roll: &mut impl FnMut(u8) -> u8) -> String {
        let cli = Cli::try_parse_from(std::iter::once("bfrpg-engine").chain(args.iter().copied()))
            .expect("valid arguments");
        let mut out = Vec::new();
        run(cli, config, &mut out, roll).expect("command succeeds");
        String::from_utf8(out).expect("utf-8 output")
    }

    fn run_text(args: &[&str]) -> String {
        run_args(args, &EngineConfig::default(), &mut fixed(4))
    }

    #[test]
    fn convert_prints_both_amounts() {
        assert_eq!(run_text(&["convert", "3", "gp", "sp"]), "3 gp = 30 sp\n");
        assert_eq!(
            run_text(&["convert", "1", "platinum", "gold"]),
            "1 pp = 5 gp\n"
        );
    }

    #[test]
    fn convert_rejects_negative_amounts() {
        let cli = Cli::try_parse_from(["bfrpg-engine", "convert", "-2", "gp", "sp"])
            .expect("negative numbers parse");
        let mut out = Vec::new();
        let err = run(cli, &EngineConfig::default(), &mut out, &mut fixed(4))
            .expect_err("negative amount");
        assert!(err.to_string().contains("cannot be negative"));
    }

    #[test]
    fn unknown_coin_is_a_usage_error() {
        assert!(Cli::try_parse_from(["bfrpg-engine", "convert", "1", "gp", "doubloons"]).is_err());
    }

    #[test]
    fn scroll_cost_in_text_and_json() {
        assert_eq!(run_text(&["scroll-cost", "3"]), "Level 3 scroll: 255 gp\n");
        let json = run_text(&["scroll-cost", "1", "--format", "json"]);
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["costGp"], 35);
    }

    #[test]
    fn scroll_cost_rejects_out_of_range_levels() {
        let cli = Cli::try_parse_from(["bfrpg-engine", "scroll-cost", "7"]).expect("parses");
        let mut out = Vec::new();
        assert!(run(cli, &EngineConfig::default(), &mut out, &mut fixed(4)).is_err());
    }

    #[test]
    fn format_flag_overrides_config() {
        let config = EngineConfig {
            output_format: OutputFormat::Json,
            ..EngineConfig::default()
        };
        let text = run_args(&["-f", "text", "scroll-cost", "2"], &config, &mut fixed(4));
        assert_eq!(text, "Level 2 scroll: 120 gp\n");
    }

    #[test]
    fn create_rolls_scores_hp_and_gold() {
        // Every die shows 4: all scores 12, HP 4 + 0, gold 12 x 10
        let character = create_character(
            "Ailith",
            Race::Human,
            CharacterClass::Cleric,
            Utc::now(),
            &mut fixed(4),
        )
        .expect("qualifies");
        assert_eq!(character.abilities().wisdom.value(), 12);
        assert_eq!(character.hit_points().max, 4);
        assert_eq!(character.purse().gold, 120);
    }

    #[test]
    fn create_rerolls_until_scores_qualify() {
        // First set of 18 dice rolls all 1s (scores of 3), then 5s
        let mut rolls = 0;
        let mut roll = |sides: u8| {
            rolls += 1;
            if rolls <= 18 {
                1
            } else {
                5u8.min(sides)
            }
        };
        let character = create_character(
            "Ailith",
            Race::Dwarf,
            CharacterClass::Fighter,
            Utc::now(),
            &mut roll,
        )
        .expect("second set qualifies");
        assert_eq!(character.abilities().strength.value(), 15);
    }

    #[test]
    fn create_gives_up_on_hopeless_rolls() {
        let err = create_character(
            "Ailith",
            Race::Human,
            CharacterClass::Fighter,
            Utc::now(),
            &mut fixed(1),
        )
        .expect_err("scores of 3 never qualify");
        assert!(err.to_string().contains("no qualifying ability scores"));
    }

    #[test]
    fn create_rejects_forbidden_combinations_immediately() {
        let err = create_character(
            "Ailith",
            Race::Dwarf,
            CharacterClass::MagicUser,
            Utc::now(),
            &mut fixed(4),
        )
        .expect_err("dwarves cannot be magic-users");
        assert!(err.to_string().contains("cannot be a"));
    }

    #[test]
    fn create_save_sheet_and_award_xp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ailith.json");
        let path_arg = path.to_str().expect("utf-8 path");

        let created = run_text(&[
            "create", "--name", "Ailith", "--race", "human", "--class", "cleric", "--out", path_arg,
        ]);
        assert!(created.starts_with("Created Ailith the Human Cleric"));

        let sheet = run_text(&["sheet", path_arg]);
        assert!(sheet.starts_with("Ailith\nHuman Cleric, level 1 (XP 0 / 1500)\n"));

        let awarded = run_text(&["award-xp", path_arg, "5000"]);
        assert_eq!(
            awarded,
            "Ailith gains 2999 XP (total 2999)\nLevel 1 -> 2 (+4 HP)\n"
        );
        let reloaded = load_character(&path).expect("saved back");
        assert_eq!(reloaded.character.level(), 2);
        assert_eq!(reloaded.character.xp(), 2999);
    }

    #[test]
    fn buy_then_sell_at_the_configured_ratio() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ailith.json");
        let path_arg = path.to_str().expect("utf-8 path");
        run_text(&[
            "create", "--name", "Ailith", "--race", "human", "--class", "fighter", "--out",
            path_arg,
        ]);

        let bought = run_text(&[
            "buy", path_arg, "--name", "Spear", "--category", "weapon", "--weight", "5", "--cost",
            "3", "--amount", "2",
        ]);
        assert_eq!(bought, "Ailith buys Spear x2 for 600 cp (purse: 114 gp)\n");

        let config = EngineConfig {
            sale_ratio: 0.25,
            ..EngineConfig::default()
        };
        let sold = run_args(&["sell", path_arg, "spear", "1"], &config, &mut fixed(4));
        assert_eq!(
            sold,
            "Ailith sells Spear x1 for 75 cp (purse: 114 gp 7 sp 5 cp)\n"
        );

        let character = load_character(&path).expect("saved back").character;
        assert_eq!(character.purse().total_copper(), 11_475);
        let spears: Vec<u32> = character
            .equipment()
            .iter()
            .filter(|item| item.category == ItemCategory::Weapon)
            .map(|item| item.amount)
            .collect();
        assert_eq!(spears, [1]);
    }

    #[test]
    fn sell_rejects_missing_items_and_short_stacks() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ailith.json");
        let path_arg = path.to_str().expect("utf-8 path");
        run_text(&[
            "create", "--name", "Ailith", "--race", "human", "--class", "fighter", "--out",
            path_arg,
        ]);
        run_text(&[
            "buy", path_arg, "--name", "Torch", "--cost", "1", "--currency", "cp",
        ]);

        let missing = ["sell", path_arg, "Lantern", "1"];
        let too_many = ["sell", path_arg, "torch", "2"];
        for args in [missing, too_many] {
            let cli = Cli::try_parse_from(std::iter::once("bfrpg-engine").chain(args))
                .expect("parses");
            let mut out = Vec::new();
            assert!(run(cli, &EngineConfig::default(), &mut out, &mut fixed(4)).is_err());
        }
        let character = load_character(&path).expect("unchanged").character;
        assert_eq!(character.equipment().len(), 1);
        assert_eq!(character.purse().total_copper(), 11_999);
    }

    #[test]
    fn buy_json_reports_the_purse() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ailith.json");
        let path_arg = path.to_str().expect("utf-8 path");
        run_text(&[
            "create", "--name", "Ailith", "--race", "human", "--class", "fighter", "--out",
            path_arg,
        ]);

        let args = [
            "--format", "json", "buy", path_arg, "--name", "Rope", "--cost", "1",
        ];
        let json = run_text(&args);
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["copper"], 100);
        assert_eq!(value["purse"]["gold"], 119);
    }

    #[test]
    fn create_without_out_prints_the_export() {
        let json = run_text(&[
            "create", "--name", "Ailith", "--race", "elf", "--class", "magic-user",
        ]);
        let export = CharacterExport::from_json(&json).expect("export json");
        assert_eq!(export.character.class(), CharacterClass::MagicUser);
        assert_eq!(export.character.languages(), ["Common", "Elvish"]);
    }

    #[test]
    fn rules_reads_tables_by_name() {
        let text = run_text(&["rules", "fighter", "1"]);
        assert!(text.contains("Hit die: 1d8"));
        assert!(text.contains("Attack bonus: +1"));
        assert!(!text.contains("Spell slots"));

        let json = run_text(&["rules", "magic-user", "3", "--format", "json"]);
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["hitDie"], "1d4");
        assert_eq!(value["spellSlots"][0]["spellLevel"], 1);
    }

    #[test]
    fn rules_rejects_unknown_systems() {
        let args = ["bfrpg-engine", "rules", "fighter", "1", "--system", "gurps"];
        let cli = Cli::try_parse_from(args).expect("parses");
        let mut out = Vec::new();
        let err = run(cli, &EngineConfig::default(), &mut out, &mut fixed(4))
            .expect_err("unknown system");
        assert!(err.to_string().contains("available: bfrpg"));
    }
}
