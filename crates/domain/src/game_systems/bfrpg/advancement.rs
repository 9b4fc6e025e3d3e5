//! Experience, levels, and hit point progression.

use super::classes::{CharacterClass, MAX_LEVEL};
use super::races::Race;
use crate::value_objects::DiceFormula;

/// Last level at which hit dice are rolled; later levels add a fixed amount.
pub const LAST_ROLLED_LEVEL: u8 = 9;

/// HP gained when a hit die cannot be determined.
const FALLBACK_HP_GAIN: i32 = 1;

/// XP required to reach `level` (0 for level 1 and below).
pub fn xp_for_level(class: CharacterClass, level: u8) -> u32 {
    if level <= 1 {
        return 0;
    }
    class.xp_table()[usize::from(level.min(MAX_LEVEL) - 1)]
}

/// XP required for the level after `current_level`, if there is one.
pub fn xp_for_next_level(class: CharacterClass, current_level: u8) -> Option<u32> {
    (current_level < MAX_LEVEL).then(|| xp_for_level(class, current_level + 1))
}

/// Highest level whose threshold `xp` meets.
pub fn level_for_xp(class: CharacterClass, xp: u32) -> u8 {
    class
        .xp_table()
        .iter()
        .rposition(|&threshold| xp >= threshold)
        .map(|index| index as u8 + 1)
        .unwrap_or(1)
}

/// XP total after an award, limited so a single award gains at most one level.
///
/// Any excess stops one point short of the threshold after the next level.
pub fn capped_xp_award(
    class: CharacterClass,
    current_level: u8,
    current_xp: u32,
    award: u32,
) -> u32 {
    let proposed = current_xp.saturating_add(award);
    match xp_for_next_level(class, current_level.saturating_add(1)) {
        Some(limit) if proposed >= limit => {
            tracing::debug!(
                class = %class,
                award,
                limit,
                "XP award capped at one level"
            );
            limit - 1
        }
        _ => proposed,
    }
}

/// Hit points gained on reaching `level`.
///
/// Levels up to 9th roll `hit_die` (capped by race) plus the Constitution
/// modifier, with a minimum of 1. Later levels add `fixed_bonus` and ignore
/// Constitution. An unparsable hit die yields 1.
pub fn hit_point_gain(
    hit_die: &str,
    race: Race,
    level: u8,
    constitution_modifier: i32,
    fixed_bonus: i32,
    roll: &mut impl FnMut(u8) -> u8,
) -> i32 {
    if level > LAST_ROLLED_LEVEL {
        return fixed_bonus;
    }
    let formula = match DiceFormula::parse(hit_die) {
        Ok(formula) => formula,
        Err(err) => {
            tracing::warn!(hit_die, error = %err, "Malformed hit die, gaining 1 HP");
            return FALLBACK_HP_GAIN;
        }
    };
    let formula = match race.max_hit_die() {
        Some(max) => formula.capped_at(max),
        None => formula,
    };
    (formula.roll_with(roll).total + constitution_modifier).max(1)
}

/// Hit points gained by a class on reaching `level`.
pub fn class_hit_point_gain(
    class: CharacterClass,
    race: Race,
    level: u8,
    constitution_modifier: i32,
    roll: &mut impl FnMut(u8) -> u8,
) -> i32 {
    hit_point_gain(
        class.hit_die(),
        race,
        level,
        constitution_modifier,
        class.fixed_hp_after_ninth(),
        roll,
    )
}

/// Starting money in gold pieces: 3d6 x 10.
pub fn roll_starting_gold(roll: &mut impl FnMut(u8) -> u8) -> u64 {
    let dice: u64 = (0..3).map(|_| u64::from(roll(6).clamp(1, 6))).sum();
    dice * 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_from_xp_thresholds() {
        assert_eq!(level_for_xp(CharacterClass::Fighter, 0), 1);
        assert_eq!(level_for_xp(CharacterClass::Fighter, 1_999), 1);
        assert_eq!(level_for_xp(CharacterClass::Fighter, 2_000), 2);
        assert_eq!(level_for_xp(CharacterClass::Thief, 1_250), 2);
        assert_eq!(level_for_xp(CharacterClass::Cleric, 5_000_000), 20);
    }

    #[test]
    fn xp_for_levels() {
        assert_eq!(xp_for_level(CharacterClass::MagicUser, 1), 0);
        assert_eq!(xp_for_level(CharacterClass::MagicUser, 3), 5_000);
        assert_eq!(xp_for_next_level(CharacterClass::Cleric, 1), Some(1_500));
        assert_eq!(xp_for_next_level(CharacterClass::Cleric, 20), None);
    }

    #[test]
    fn award_never_skips_a_level() {
        // Level 1 fighter awarded enough for level 3 stops just short of it.
        assert_eq!(
            capped_xp_award(CharacterClass::Fighter, 1, 0, 10_000),
            3_999
        );
        assert_eq!(capped_xp_award(CharacterClass::Fighter, 1, 0, 2_500), 2_500);
        // Near the top of the tables the cap disappears.
        assert_eq!(
            capped_xp_award(CharacterClass::Fighter, 19, 1_440_000, 500_000),
            1_940_000
        );
    }

    #[test]
    fn rolled_hit_points_add_constitution() {
        let mut roll = |_: u8| 5;
        assert_eq!(
            class_hit_point_gain(CharacterClass::Fighter, Race::Human, 1, 1, &mut roll),
            6
        );
    }

    #[test]
    fn rolled_hit_points_are_at_least_one() {
        let mut roll = |_: u8| 1;
        assert_eq!(
            class_hit_point_gain(CharacterClass::MagicUser, Race::Human, 2, -3, &mut roll),
            1
        );
    }

    #[test]
    fn halflings_roll_at_most_d6() {
        let mut sides_seen = Vec::new();
        let mut roll = |sides: u8| {
            sides_seen.push(sides);
            sides
        };
        let gain = hit_point_gain("1d8", Race::Halfling, 1, 0, 2, &mut roll);
        assert_eq!(gain, 6);
        assert_eq!(sides_seen, vec![6]);
    }

    #[test]
    fn fixed_hit_points_after_ninth() {
        let mut roll = |_: u8| -> u8 { panic!("no roll after 9th level") };
        assert_eq!(
            class_hit_point_gain(CharacterClass::Fighter, Race::Human, 10, 3, &mut roll),
            2
        );
        assert_eq!(
            class_hit_point_gain(CharacterClass::Cleric, Race::Human, 12, 3, &mut roll),
            1
        );
    }

    #[test]
    fn malformed_hit_die_gains_one() {
        let mut roll = |_: u8| 4;
        assert_eq!(hit_point_gain("d", Race::Human, 3, 2, 2, &mut roll), 1);
        assert_eq!(hit_point_gain("", Race::Human, 3, 2, 2, &mut roll), 1);
    }

    #[test]
    fn starting_gold_is_three_d6_times_ten() {
        let mut faces = [3u8, 4, 5].into_iter();
        assert_eq!(roll_starting_gold(&mut |_| faces.next().unwrap_or(1)), 120);
    }
}
