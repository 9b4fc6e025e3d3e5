//! Character export files
//!
//! A character file is a JSON envelope around the character's wire format:
//!
//! ```json
//! { "formatVersion": 1, "exportedAt": "2024-01-01T00:00:00Z", "character": { ... } }
//! ```
//!
//! A bare character object without the envelope is also accepted on import.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bfrpg_domain::Character;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current version of the export envelope.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// A character together with export metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterExport {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    pub character: Character,
}

impl CharacterExport {
    pub fn new(character: Character, now: DateTime<Utc>) -> Self {
        Self {
            format_version: EXPORT_FORMAT_VERSION,
            exported_at: now,
            character,
        }
    }

    /// Parse an export envelope or a bare character.
    ///
    /// Ability modifiers are recomputed and the purse normalized as part of
    /// reading the character.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).context("character file is not valid JSON")?;

        if value.get("character").is_none() {
            tracing::debug!("No export envelope, reading a bare character");
            let character: Character =
                serde_json::from_value(value).context("invalid character data")?;
            return Ok(Self::new(character, Utc::now()));
        }

        let export: Self = serde_json::from_value(value).context("invalid character export")?;
        if export.format_version > EXPORT_FORMAT_VERSION {
            bail!(
                "unsupported export format version {} (newest supported is {})",
                export.format_version,
                EXPORT_FORMAT_VERSION
            );
        }
        Ok(export)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize character export")
    }
}

/// Read a character file from disk.
pub fn load_character(path: &Path) -> Result<CharacterExport> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read character file {}", path.display()))?;
    let export = CharacterExport::from_json(&json)
        .with_context(|| format!("failed to load character from {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        character = %export.character.name(),
        "Character loaded"
    );
    Ok(export)
}

/// Write a character to disk in a fresh export envelope.
pub fn save_character(path: &Path, character: &Character, now: DateTime<Utc>) -> Result<()> {
    let json = CharacterExport::new(character.clone(), now).to_json()?;
    fs::write(path, json)
        .with_context(|| format!("failed to write character file {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        character = %character.name(),
        "Character saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bfrpg_domain::{AbilityScores, CharacterClass, CharacterName, CurrencyPurse, Race};

    fn brannoc() -> Character {
        Character::create(
            CharacterName::new("Brannoc").expect("valid name"),
            Race::Human,
            CharacterClass::Fighter,
            AbilityScores::from_values([13, 12, 14, 10, 11, 9]),
            Utc::now(),
            &mut |sides| sides,
        )
        .expect("valid character")
        .with_purse(CurrencyPurse::with_gold(40))
    }

    #[test]
    fn save_then_load_keeps_the_character() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("brannoc.json");
        let character = brannoc();

        save_character(&path, &character, Utc::now()).expect("save");
        let export = load_character(&path).expect("load");

        assert_eq!(export.format_version, EXPORT_FORMAT_VERSION);
        assert_eq!(export.character, character);
    }

    #[test]
    fn envelope_uses_camel_case_keys() {
        let json = CharacterExport::new(brannoc(), Utc::now())
            .to_json()
            .expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["formatVersion"], 1);
        assert!(value.get("exportedAt").is_some());
        assert_eq!(value["character"]["name"], "Brannoc");
    }

    #[test]
    fn bare_character_is_accepted() {
        let json = serde_json::to_string(&brannoc()).expect("serialize");
        let export = CharacterExport::from_json(&json).expect("bare character");
        assert_eq!(export.character.name().as_str(), "Brannoc");
        assert_eq!(export.character.purse().gold, 40);
    }

    #[test]
    fn newer_format_versions_are_rejected() {
        let mut value = serde_json::to_value(CharacterExport::new(brannoc(), Utc::now()))
            .expect("serialize");
        value["formatVersion"] = serde_json::json!(EXPORT_FORMAT_VERSION + 1);
        let err = CharacterExport::from_json(&value.to_string()).expect_err("too new");
        assert!(err.to_string().contains("unsupported export format version"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nobody.json");
        let err = load_character(&path).expect_err("missing file");
        assert!(err.to_string().contains("nobody.json"));
    }

    #[test]
    fn garbage_is_reported_as_invalid_json() {
        let err = CharacterExport::from_json("{not json").expect_err("garbage");
        assert!(err.to_string().contains("not valid JSON"));
    }
}
