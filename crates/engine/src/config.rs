//! Engine configuration read from the environment
//!
//! Values come from process environment variables, which `main` may have
//! populated from `.env.local` / `.env`. Unset or blank variables fall back to
//! defaults; present but malformed ones are an error rather than silently
//! ignored.

use std::fmt;
use std::str::FromStr;

use bfrpg_domain::EncumbranceConfig;
use thiserror::Error;

pub const OUTPUT_FORMAT_VAR: &str = "BFRPG_OUTPUT_FORMAT";
pub const WEIGHT_ROUNDING_VAR: &str = "BFRPG_WEIGHT_ROUNDING";
pub const SALE_RATIO_VAR: &str = "BFRPG_SALE_RATIO";

const DEFAULT_WEIGHT_ROUNDING: u32 = 5;
const DEFAULT_SALE_RATIO: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Output Format
// ============================================================================

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::invalid(OUTPUT_FORMAT_VAR, s, "expected 'text' or 'json'")),
        }
    }
}

// ============================================================================
// Engine Config
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub output_format: OutputFormat,
    /// Carrying capacities round to a multiple of this many pounds
    pub weight_rounding: u32,
    /// Fraction of an item's cost refunded when it is sold
    pub sale_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            weight_rounding: DEFAULT_WEIGHT_ROUNDING,
            sale_ratio: DEFAULT_SALE_RATIO,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &str| {
            lookup(var)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let mut config = Self::default();

        if let Some(raw) = read(OUTPUT_FORMAT_VAR) {
            config.output_format = raw.parse()?;
        }

        if let Some(raw) = read(WEIGHT_ROUNDING_VAR) {
            let pounds = raw
                .parse::<u32>()
                .map_err(|e| ConfigError::invalid(WEIGHT_ROUNDING_VAR, &raw, e.to_string()))?;
            if pounds == 0 {
                return Err(ConfigError::invalid(WEIGHT_ROUNDING_VAR, &raw, "must be at least 1"));
            }
            config.weight_rounding = pounds;
        }

        if let Some(raw) = read(SALE_RATIO_VAR) {
            let ratio = raw
                .parse::<f64>()
                .map_err(|e| ConfigError::invalid(SALE_RATIO_VAR, &raw, e.to_string()))?;
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::invalid(SALE_RATIO_VAR, &raw, "must be between 0 and 1"));
            }
            config.sale_ratio = ratio;
        }

        tracing::debug!(
            output_format = %config.output_format,
            weight_rounding = config.weight_rounding,
            sale_ratio = config.sale_ratio,
            "Engine configuration loaded"
        );
        Ok(config)
    }

    /// Encumbrance tunables with this configuration's rounding unit.
    pub fn encumbrance(&self) -> EncumbranceConfig {
        EncumbranceConfig {
            rounding_unit: self.weight_rounding,
            ..EncumbranceConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = EngineConfig::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.output_format, OutputFormat::Text);
        assert_eq!(config.weight_rounding, 5);
        assert_eq!(config.sale_ratio, 0.5);
    }

    #[test]
    fn reads_every_variable() {
        let config = EngineConfig::from_lookup(lookup(&[
            (OUTPUT_FORMAT_VAR, "JSON"),
            (WEIGHT_ROUNDING_VAR, "10"),
            (SALE_RATIO_VAR, "0.25"),
        ]))
        .expect("valid config");
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.weight_rounding, 10);
        assert_eq!(config.sale_ratio, 0.25);
        assert_eq!(config.encumbrance().rounding_unit, 10);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[(OUTPUT_FORMAT_VAR, "  ")]))
            .expect("blank is unset");
        assert_eq!(config.output_format, OutputFormat::Text);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = EngineConfig::from_lookup(lookup(&[(OUTPUT_FORMAT_VAR, "yaml")]))
            .expect_err("unknown format");
        assert!(err.to_string().contains(OUTPUT_FORMAT_VAR));

        assert!(EngineConfig::from_lookup(lookup(&[(WEIGHT_ROUNDING_VAR, "0")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[(WEIGHT_ROUNDING_VAR, "five")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[(SALE_RATIO_VAR, "1.5")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[(SALE_RATIO_VAR, "-0.1")])).is_err());
    }
}
