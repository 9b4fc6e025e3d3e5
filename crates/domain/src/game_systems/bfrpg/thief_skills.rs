//! Thief skill percentages by level.

use serde::{Deserialize, Serialize};

use super::classes::table_level;

/// Percent chances (open locks, remove traps, pick pockets, move silently,
/// climb walls, hide, listen) per level.
const THIEF_SKILL_TABLE: [[u8; 7]; 20] = [
    [25, 20, 30, 25, 80, 10, 30],
    [30, 25, 35, 30, 81, 15, 34],
    [35, 30, 40, 35, 82, 20, 38],
    [40, 35, 45, 40, 83, 25, 42],
    [45, 40, 50, 45, 84, 30, 46],
    [50, 45, 55, 50, 85, 35, 50],
    [55, 50, 60, 55, 86, 40, 54],
    [60, 55, 65, 60, 87, 45, 58],
    [65, 60, 70, 65, 88, 50, 62],
    [68, 63, 74, 68, 89, 53, 65],
    [71, 66, 78, 71, 90, 56, 68],
    [74, 69, 82, 74, 91, 59, 71],
    [77, 72, 86, 77, 92, 62, 74],
    [80, 75, 90, 80, 93, 65, 77],
    [83, 78, 94, 83, 94, 68, 80],
    [84, 79, 95, 85, 95, 69, 83],
    [85, 80, 96, 87, 96, 70, 86],
    [86, 81, 97, 89, 97, 71, 89],
    [87, 82, 98, 91, 98, 72, 92],
    [88, 83, 99, 93, 99, 73, 95],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThiefSkills {
    pub open_locks: u8,
    pub remove_traps: u8,
    pub pick_pockets: u8,
    pub move_silently: u8,
    pub climb_walls: u8,
    pub hide: u8,
    pub listen: u8,
}

/// Thief skill chances at a level (clamped to 1-20).
pub fn thief_skills(level: u8) -> ThiefSkills {
    let [open_locks, remove_traps, pick_pockets, move_silently, climb_walls, hide, listen] =
        THIEF_SKILL_TABLE[usize::from(table_level(level) - 1)];
    ThiefSkills {
        open_locks,
        remove_traps,
        pick_pockets,
        move_silently,
        climb_walls,
        hide,
        listen,
    }
}
