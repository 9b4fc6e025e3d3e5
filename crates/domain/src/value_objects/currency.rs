//! Coin denominations, conversion, and the character's coin purse.
//!
//! Every rate is expressed in copper pieces, the smallest coin:
//! 1 pp = 5 gp = 50 sp = 500 cp, 1 ep = 5 sp = 50 cp, 1 gp = 10 sp = 100 cp.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Coins per pound of carried weight.
pub const COINS_PER_POUND: f64 = 20.0;

/// Most coins of one denomination a purse may hold.
pub const MAX_COINS_PER_DENOMINATION: u64 = 1_000_000_000_000;

/// Tolerance used when deciding whether a float amount is a whole coin.
const WHOLE_COIN_EPSILON: f64 = 1e-9;

// ============================================================================
// Coin
// ============================================================================

/// A coin denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coin {
    Platinum,
    Gold,
    Electrum,
    Silver,
    Copper,
}

impl Coin {
    /// All denominations, largest first.
    pub const ALL: [Coin; 5] = [
        Coin::Platinum,
        Coin::Gold,
        Coin::Electrum,
        Coin::Silver,
        Coin::Copper,
    ];

    /// Value of one coin in copper pieces.
    pub const fn copper_rate(self) -> u64 {
        match self {
            Coin::Platinum => 500,
            Coin::Gold => 100,
            Coin::Electrum => 50,
            Coin::Silver => 10,
            Coin::Copper => 1,
        }
    }

    /// Two-letter abbreviation used on character sheets (e.g., "gp").
    pub fn abbreviation(self) -> &'static str {
        match self {
            Coin::Platinum => "pp",
            Coin::Gold => "gp",
            Coin::Electrum => "ep",
            Coin::Silver => "sp",
            Coin::Copper => "cp",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Coin::Platinum => "platinum",
            Coin::Gold => "gold",
            Coin::Electrum => "electrum",
            Coin::Silver => "silver",
            Coin::Copper => "copper",
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Coin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "platinum" | "pp" => Ok(Coin::Platinum),
            "gold" | "gp" => Ok(Coin::Gold),
            "electrum" | "ep" => Ok(Coin::Electrum),
            "silver" | "sp" => Ok(Coin::Silver),
            "copper" | "cp" => Ok(Coin::Copper),
            other => Err(DomainError::parse(format!("Unknown coin: {}", other))),
        }
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert an amount of one coin into the equivalent amount of another.
///
/// Fractional results are preserved; use [`CurrencyPurse::normalize`] to turn
/// them back into whole coins.
///
/// # Errors
///
/// Returns `DomainError::NegativeAmount` naming `from` when `amount < 0`.
pub fn convert_currency(amount: f64, from: Coin, to: Coin) -> Result<f64, DomainError> {
    if amount < 0.0 || amount.is_nan() {
        return Err(DomainError::negative_amount(from));
    }
    Ok(amount * from.copper_rate() as f64 / to.copper_rate() as f64)
}

/// Gold-equivalent value of every coin in the purse.
pub fn calculate_total_gold_value(purse: &CurrencyPurse) -> f64 {
    Coin::ALL
        .iter()
        .map(|&coin| purse.get(coin) as f64 * coin.copper_rate() as f64)
        .sum::<f64>()
        / Coin::Gold.copper_rate() as f64
}

/// Number of physical coins in the purse, regardless of denomination.
pub fn calculate_total_coin_count(purse: &CurrencyPurse) -> u64 {
    Coin::ALL
        .iter()
        .fold(0_u64, |count, &coin| count.saturating_add(purse.get(coin)))
}

/// Weight in pounds of a number of coins.
pub fn calculate_coin_weight(coin_count: u64) -> f64 {
    coin_count as f64 / COINS_PER_POUND
}

// ============================================================================
// Raw (possibly fractional) amounts
// ============================================================================

/// Coin amounts as entered or imported, which may be fractional.
///
/// Missing denominations default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurseAmounts {
    pub platinum: f64,
    pub gold: f64,
    pub electrum: f64,
    pub silver: f64,
    pub copper: f64,
}

impl PurseAmounts {
    pub fn get(&self, coin: Coin) -> f64 {
        match coin {
            Coin::Platinum => self.platinum,
            Coin::Gold => self.gold,
            Coin::Electrum => self.electrum,
            Coin::Silver => self.silver,
            Coin::Copper => self.copper,
        }
    }
}

// ============================================================================
// CurrencyPurse
// ============================================================================

/// A character's coins, always held as whole, non-negative counts.
///
/// Deserialization accepts fractional amounts and normalizes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PurseAmounts")]
pub struct CurrencyPurse {
    pub platinum: u64,
    pub gold: u64,
    pub electrum: u64,
    pub silver: u64,
    pub copper: u64,
}

impl CurrencyPurse {
    /// Create a purse holding only gold pieces.
    pub fn with_gold(gold: u64) -> Self {
        Self {
            gold,
            ..Self::default()
        }
    }

    pub fn get(&self, coin: Coin) -> u64 {
        match coin {
            Coin::Platinum => self.platinum,
            Coin::Gold => self.gold,
            Coin::Electrum => self.electrum,
            Coin::Silver => self.silver,
            Coin::Copper => self.copper,
        }
    }

    fn slot_mut(&mut self, coin: Coin) -> &mut u64 {
        match coin {
            Coin::Platinum => &mut self.platinum,
            Coin::Gold => &mut self.gold,
            Coin::Electrum => &mut self.electrum,
            Coin::Silver => &mut self.silver,
            Coin::Copper => &mut self.copper,
        }
    }

    /// Collapse fractional amounts into whole coins.
    ///
    /// Walks the denominations from platinum down to copper. Each one keeps its
    /// whole coins and hands the fractional remainder, valued in copper, to the
    /// next smaller coin. Whatever fraction of a copper piece is left at the end
    /// is rounded to the nearest coin.
    ///
    /// # Errors
    ///
    /// - `NegativeAmount` for the first negative denomination
    /// - `Validation` when a denomination holds more than
    ///   [`MAX_COINS_PER_DENOMINATION`]
    pub fn normalize(raw: &PurseAmounts) -> Result<Self, DomainError> {
        if let Some(&coin) = Coin::ALL
            .iter()
            .find(|&&coin| raw.get(coin) < 0.0 || raw.get(coin).is_nan())
        {
            return Err(DomainError::negative_amount(coin));
        }
        if let Some(&coin) = Coin::ALL
            .iter()
            .find(|&&coin| raw.get(coin) > MAX_COINS_PER_DENOMINATION as f64)
        {
            return Err(DomainError::validation(format!(
                "{} {} exceeds the limit of {} coins",
                raw.get(coin),
                coin,
                MAX_COINS_PER_DENOMINATION
            )));
        }

        let (mut purse, carry_cp) = Coin::ALL.iter().fold(
            (Self::default(), 0.0_f64),
            |(mut purse, carry_cp), &coin| {
                let rate = coin.copper_rate() as f64;
                let total = raw.get(coin) + carry_cp / rate;
                let whole = (total + WHOLE_COIN_EPSILON).floor();
                *purse.slot_mut(coin) = whole as u64;
                (purse, (total - whole).max(0.0) * rate)
            },
        );
        purse.copper = purse.copper.saturating_add(carry_cp.round() as u64);
        Ok(purse)
    }

    /// Total value of the purse in copper pieces.
    pub fn total_copper(&self) -> u64 {
        Coin::ALL
            .iter()
            .fold(0_u64, |total, &coin| {
                total.saturating_add(self.get(coin).saturating_mul(coin.copper_rate()))
            })
    }

    pub fn total_gold_value(&self) -> f64 {
        calculate_total_gold_value(self)
    }

    pub fn coin_count(&self) -> u64 {
        calculate_total_coin_count(self)
    }

    pub fn coin_weight(&self) -> f64 {
        calculate_coin_weight(self.coin_count())
    }

    /// Add coins; a fractional amount is broken into smaller coins.
    pub fn add(&mut self, amount: f64, coin: Coin) -> Result<(), DomainError> {
        if amount < 0.0 || amount.is_nan() {
            return Err(DomainError::negative_amount(coin));
        }
        let mut raw = PurseAmounts {
            platinum: self.platinum as f64,
            gold: self.gold as f64,
            electrum: self.electrum as f64,
            silver: self.silver as f64,
            copper: self.copper as f64,
        };
        match coin {
            Coin::Platinum => raw.platinum += amount,
            Coin::Gold => raw.gold += amount,
            Coin::Electrum => raw.electrum += amount,
            Coin::Silver => raw.silver += amount,
            Coin::Copper => raw.copper += amount,
        }
        *self = Self::normalize(&raw)?;
        Ok(())
    }

    /// Pay `amount` of `coin` out of the purse.
    ///
    /// Smallest coins are spent first. When no exact combination remains, the
    /// smallest coin worth more than the outstanding balance is broken and the
    /// change comes back as gold, silver, and copper.
    ///
    /// # Errors
    ///
    /// - `NegativeAmount` when `amount < 0`
    /// - `InsufficientFunds` when the purse is worth less than the cost
    pub fn spend(&mut self, amount: f64, coin: Coin) -> Result<(), DomainError> {
        let cost_cp = convert_currency(amount, coin, Coin::Copper)?.round() as u64;
        let available_cp = self.total_copper();
        if cost_cp > available_cp {
            return Err(DomainError::insufficient_funds(cost_cp, available_cp));
        }

        let mut remaining = cost_cp;
        for &coin in Coin::ALL.iter().rev() {
            let rate = coin.copper_rate();
            let slot = self.slot_mut(coin);
            let take = (*slot).min(remaining / rate);
            *slot -= take;
            remaining -= take * rate;
        }

        if remaining > 0 {
            // Every coin still held is now worth more than `remaining`.
            let breaker = Coin::ALL
                .iter()
                .rev()
                .copied()
                .find(|&coin| self.get(coin) > 0)
                .ok_or_else(|| DomainError::insufficient_funds(cost_cp, available_cp))?;
            *self.slot_mut(breaker) -= 1;
            self.give_change(breaker.copper_rate() - remaining);
        }
        Ok(())
    }

    /// Receive a copper value paid out as gold, silver, and copper coins.
    pub fn receive_copper(&mut self, amount_cp: u64) {
        self.give_change(amount_cp);
    }

    fn give_change(&mut self, mut change_cp: u64) {
        for coin in [Coin::Gold, Coin::Silver, Coin::Copper] {
            let rate = coin.copper_rate();
            let slot = self.slot_mut(coin);
            *slot = slot.saturating_add(change_cp / rate);
            change_cp %= rate;
        }
    }
}

impl TryFrom<PurseAmounts> for CurrencyPurse {
    type Error = DomainError;

    fn try_from(raw: PurseAmounts) -> Result<Self, Self::Error> {
        Self::normalize(&raw)
    }
}

impl fmt::Display for CurrencyPurse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Coin::ALL
            .iter()
            .filter(|&&coin| self.get(coin) > 0)
            .map(|&coin| format!("{} {}", self.get(coin), coin.abbreviation()))
            .collect();
        if parts.is_empty() {
            write!(f, "0 cp")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}
