//! Validated name newtypes
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for name fields
const MAX_NAME_LENGTH: usize = 200;

/// Trim and check a name, labelling errors with `kind`.
fn validated_name(kind: &str, name: String) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{kind} name cannot be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "{kind} name cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// CharacterName
// ============================================================================

/// A validated character name (non-empty, <=200 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    /// Create a new validated character name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name exceeds 200 characters after trimming
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        validated_name("Character", name.into()).map(Self)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CharacterName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CharacterName> for String {
    fn from(name: CharacterName) -> String {
        name.0
    }
}

// ============================================================================
// ItemName
// ============================================================================

/// A validated equipment or spell name (non-empty, <=200 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Create a new validated item name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the trimmed name is empty or too long.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        validated_name("Item", name.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, used when merging inventory stacks.
    pub fn matches(&self, other: &ItemName) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ItemName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> String {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_name_is_trimmed() {
        let name = CharacterName::new("  Brannoc  ").expect("valid name");
        assert_eq!(name.as_str(), "Brannoc");
        assert_eq!(name.to_string(), "Brannoc");
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(matches!(
            CharacterName::new("   "),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(ItemName::new(""), Err(DomainError::Validation(_))));
    }

    #[test]
    fn overlong_names_are_rejected() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        let err = CharacterName::new(long).expect_err("too long");
        assert!(err.to_string().contains("200"));
        assert!(ItemName::new("x".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn item_names_match_ignoring_case() {
        let a = ItemName::new("Torch").expect("valid");
        let b = ItemName::new("torch").expect("valid");
        assert!(a.matches(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn serde_round_trip_validates() {
        let name: CharacterName = serde_json::from_str("\"Mira\"").expect("valid json");
        assert_eq!(name.as_str(), "Mira");
        assert!(serde_json::from_str::<CharacterName>("\"  \"").is_err());
        assert_eq!(serde_json::to_string(&name).expect("serialize"), "\"Mira\"");
    }
}
