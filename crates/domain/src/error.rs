//! Unified error types for the domain layer
//!
//! Provides a common error type for every rules operation that can reject its
//! input, so callers never have to fall back to `String` errors.

use thiserror::Error;

use crate::value_objects::{Coin, DiceParseError};

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A currency amount below zero was supplied
    #[error("Amount of {unit} cannot be negative")]
    NegativeAmount { unit: Coin },

    /// The purse does not hold enough coin to cover a cost
    #[error("Insufficient funds: need {needed_cp} cp, have {available_cp} cp")]
    InsufficientFunds { needed_cp: u64, available_cp: u64 },

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Container is at capacity
    #[error("Container full: {current}/{max} items")]
    ContainerFull { current: u32, max: u32 },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when domain invariants or constraints are violated:
    /// - Required fields are empty or missing
    /// - Values are outside allowed ranges
    /// - A race or class requirement is not met
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Character name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a negative amount error naming the offending unit
    pub fn negative_amount(unit: Coin) -> Self {
        Self::NegativeAmount { unit }
    }

    /// Create an insufficient funds error
    pub fn insufficient_funds(needed_cp: u64, available_cp: u64) -> Self {
        Self::InsufficientFunds {
            needed_cp,
            available_cp,
        }
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant or format.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for Race {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "dwarf" => Ok(Self::Dwarf),
    ///             _ => Err(DomainError::parse(format!("Unknown race: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a container full error
    pub fn container_full(current: u32, max: u32) -> Self {
        Self::ContainerFull { current, max }
    }
}

impl From<DiceParseError> for DomainError {
    fn from(err: DiceParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("name cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: name cannot be empty");
    }

    #[test]
    fn test_negative_amount_names_unit() {
        let err = DomainError::negative_amount(Coin::Electrum);
        assert_eq!(err.to_string(), "Amount of electrum cannot be negative");
    }

    #[test]
    fn test_insufficient_funds_error() {
        let err = DomainError::insufficient_funds(250, 40);
        assert_eq!(
            err.to_string(),
            "Insufficient funds: need 250 cp, have 40 cp"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Item", "123e4567-e89b-12d3-a456-426614174000");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Item"));
        assert!(err.to_string().contains("123e4567"));
    }

    #[test]
    fn test_constraint_error() {
        let err = DomainError::constraint("only armor and shields can be worn");
        assert!(matches!(err, DomainError::Constraint(_)));
        assert_eq!(
            err.to_string(),
            "Constraint violation: only armor and shields can be worn"
        );
    }

    #[test]
    fn test_from_dice_parse_error() {
        let dice_err = DiceParseError::Empty;
        let domain_err: DomainError = dice_err.into();
        assert!(matches!(domain_err, DomainError::Parse(_)));
        assert!(domain_err.to_string().contains("Empty dice formula"));
    }

    #[test]
    fn test_container_full_error() {
        let err = DomainError::container_full(2, 2);
        assert!(matches!(err, DomainError::ContainerFull { .. }));
        assert_eq!(err.to_string(), "Container full: 2/2 items");
    }
}
