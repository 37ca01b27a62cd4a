//! Game configuration.
//!
//! The engine receives its floor schedule and catalogs from here rather than
//! computing them. Built-in presets match the live game; a YAML file can
//! override any part of them.

use super::{
    event_catalog, event_substitutions, normal_catalog, Amount, EVENT_ROUNDS, MAX_PLAYS_PER_DAY,
    NORMAL_ROUNDS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("round schedule is empty")]
    EmptySchedule,
    #[error("round {0} selects no floors")]
    EmptyRound(usize),
}

/// Floor layout of one game mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Floors to select in each round, first round first.
    pub rounds: Vec<usize>,
    /// Exactly `2 * floor_count()` amounts.
    pub catalog: Vec<Amount>,
    /// Tiles swapped into the first "nothing" entries of the catalog.
    #[serde(default)]
    pub substitutions: Vec<Amount>,
}

impl GameConfig {
    pub fn normal() -> Self {
        Self {
            rounds: NORMAL_ROUNDS.to_vec(),
            catalog: normal_catalog(),
            substitutions: Vec::new(),
        }
    }

    pub fn event() -> Self {
        Self {
            rounds: EVENT_ROUNDS.to_vec(),
            catalog: event_catalog(),
            substitutions: event_substitutions(),
        }
    }

    /// Total number of floors in the tower.
    pub fn floor_count(&self) -> usize {
        self.rounds.iter().sum()
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Floors to select in `round` (1-based). Rounds past the schedule select
    /// nothing.
    pub fn floors_in_round(&self, round: usize) -> usize {
        round
            .checked_sub(1)
            .and_then(|i| self.rounds.get(i))
            .copied()
            .unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }
        if let Some(i) = self.rounds.iter().position(|r| *r == 0) {
            return Err(ConfigError::EmptyRound(i + 1));
        }
        Ok(())
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
}

/// Everything the engine and its collaborators are configured with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub normal: GameConfig,
    pub event: GameConfig,
    pub max_plays_per_day: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            normal: GameConfig::normal(),
            event: GameConfig::event(),
            max_plays_per_day: MAX_PLAYS_PER_DAY,
        }
    }
}

impl Settings {
    /// Layout for a game in the given mode.
    pub fn game(&self, event_mode: bool) -> &GameConfig {
        if event_mode {
            &self.event
        } else {
            &self.normal
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.normal.validate()?;
        settings.event.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }
}
