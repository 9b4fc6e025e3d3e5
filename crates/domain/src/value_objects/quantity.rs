//! Amount changes for stacked equipment

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Result of taking some units out of an inventory stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountChange {
    /// Units left in the stack
    Remaining(u32),
    /// The stack is used up and should be removed
    Depleted,
}

impl AmountChange {
    /// Take `amount` units out of a stack of `current`.
    ///
    /// # Errors
    ///
    /// - `Validation` when `amount` is zero
    /// - `Constraint` when the stack holds fewer than `amount` units
    pub fn take(current: u32, amount: u32) -> Result<Self, DomainError> {
        if amount == 0 {
            return Err(DomainError::validation("Amount must be at least 1"));
        }
        match current.checked_sub(amount) {
            None => Err(DomainError::constraint(format!(
                "Cannot take {amount}, only {current} held"
            ))),
            Some(0) => Ok(Self::Depleted),
            Some(left) => Ok(Self::Remaining(left)),
        }
    }

    pub fn should_remove(&self) -> bool {
        matches!(self, Self::Depleted)
    }

    /// Units left after the change (zero when depleted).
    pub fn remaining(&self) -> u32 {
        match self {
            Self::Remaining(left) => *left,
            Self::Depleted => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_partial() {
        assert_eq!(AmountChange::take(5, 3), Ok(AmountChange::Remaining(2)));
    }

    #[test]
    fn take_everything() {
        let change = AmountChange::take(5, 5).expect("enough held");
        assert!(change.should_remove());
        assert_eq!(change.remaining(), 0);
    }

    #[test]
    fn take_more_than_held() {
        assert!(matches!(
            AmountChange::take(2, 7),
            Err(DomainError::Constraint(_))
        ));
    }

    #[test]
    fn take_nothing() {
        assert!(matches!(
            AmountChange::take(2, 0),
            Err(DomainError::Validation(_))
        ));
    }
}
