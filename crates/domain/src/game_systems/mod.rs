//! Game system rules.
//!
//! The rules live in `bfrpg` as typed tables and formulas. The traits in
//! `traits.rs` expose them by name for callers that hold class and race names
//! as plain strings, and the registry looks systems up by id.

pub mod bfrpg;
mod traits;

pub use bfrpg::BfrpgSystem;
pub use traits::{CalculationEngine, GameSystem, SaveTarget, SpellcastingSystem};

use std::sync::Arc;

/// Registry of available game systems.
pub struct GameSystemRegistry {
    systems: Vec<Arc<dyn GameSystem>>,
}

impl Default for GameSystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSystemRegistry {
    /// Create a new registry with all built-in game systems.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(BfrpgSystem::new()));
        registry
    }

    /// Create an empty registry without built-in systems.
    pub fn empty() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Register a game system.
    pub fn register(&mut self, system: Arc<dyn GameSystem>) {
        self.systems.push(system);
    }

    /// Get a game system by its ID.
    pub fn get(&self, system_id: &str) -> Option<Arc<dyn GameSystem>> {
        self.systems
            .iter()
            .find(|s| s.system_id() == system_id)
            .cloned()
    }

    /// List all registered system IDs.
    pub fn list_systems(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.system_id()).collect()
    }
}
