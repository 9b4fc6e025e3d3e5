//! Basic Fantasy RPG engine - character files and rules on the command line.
//!
//! Loads and saves character exports, renders sheets, and exposes the rules
//! calculators from `bfrpg-domain` as subcommands.

pub mod cli;
pub mod config;
pub mod export;
pub mod render;

pub use cli::{create_character, run, thread_roller, Cli, Command};
pub use config::{ConfigError, EngineConfig, OutputFormat};
pub use export::{load_character, save_character, CharacterExport, EXPORT_FORMAT_VERSION};
pub use render::{render_sheet, SheetSummary};
