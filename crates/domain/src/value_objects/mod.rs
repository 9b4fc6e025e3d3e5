//! Value objects - Immutable objects defined by their attributes

mod ability;
mod currency;
mod dice;
mod names;
mod quantity;

pub use ability::{modifier_for, roll_ability_scores, Ability, AbilityScore, AbilityScores};
pub use currency::{
    calculate_coin_weight, calculate_total_coin_count, calculate_total_gold_value, convert_currency,
    Coin, CurrencyPurse, PurseAmounts, COINS_PER_POUND, MAX_COINS_PER_DENOMINATION,
};
pub use dice::{DiceFormula, DiceParseError, DiceRollResult};
pub use names::{CharacterName, ItemName};
pub use quantity::AmountChange;
