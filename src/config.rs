// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::Direction;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub strategy: StrategyConfig,
    pub appearance: AppearanceConfig,
    pub debug: DebugConfig,
}

/// Depth cutoffs for the bounded distance searches.
/// These cap per-turn latency on large boards.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub food_search_depth: usize,
    pub pursuit_search_depth: usize,
    pub opening_search_depth: usize,
}

/// How ties between equally good candidates are broken
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// First candidate in neighbor generation order wins
    Ordered,
    /// Uniform pick among tied candidates using the caller's RNG
    Random,
}

/// Decision policy constants
#[derive(Debug, Deserialize, Clone)]
pub struct StrategyConfig {
    pub pursuit_min_health: i32,
    pub avoid_hazards: bool,
    pub tie_break: TieBreak,
    pub fallback_direction: Direction,
}

/// Static identity returned from GET /
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
    pub version: String,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchConfig {
                food_search_depth: 12,
                pursuit_search_depth: 24,
                opening_search_depth: 24,
            },
            strategy: StrategyConfig {
                pursuit_min_health: 30,
                avoid_hazards: true,
                tie_break: TieBreak::Ordered,
                fallback_direction: Direction::Up,
            },
            appearance: AppearanceConfig {
                author: "strangler".to_string(),
                color: "#f7c244".to_string(),
                head: "default".to_string(),
                tail: "default".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
