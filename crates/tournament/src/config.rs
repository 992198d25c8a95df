//! Tournament configuration
//!
//! Loaded from TOML (every field optional) and then overridden from the
//! command line.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use arena_core::{AgentArgs, DisplayKind};

use crate::error::{Result, TournamentError};

/// Seed handed to the engine when `fix_random_seed` is set.
pub const FIXED_SEED: u64 = 188;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Number of parallel workers
    pub workers: usize,
    /// Games played per pairing
    pub games_per_match: u32,
    /// Play the same games on every run
    pub fix_random_seed: bool,
    /// Maximum moves per game
    pub move_limit: u32,
    /// Leading games that are training episodes
    pub num_training: u32,
    /// Layout name, `RANDOM` or `RANDOM<seed>`
    pub layout: String,
    pub layouts_dir: PathBuf,
    /// Each run writes into a timestamped subdirectory of this one
    pub results_dir: PathBuf,
    pub display: DisplayKind,
    /// Keep replay files
    pub record: bool,
    /// Let the engine contain agent failures
    pub catch_exceptions: bool,
    pub agent_args: AgentArgs,
    /// Teams whose name starts with this do not count toward the minimum of two
    pub reference_prefix: String,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            games_per_match: 1,
            fix_random_seed: false,
            move_limit: 1200,
            num_training: 0,
            layout: "defaultCapture".to_string(),
            layouts_dir: PathBuf::from("layouts"),
            results_dir: PathBuf::from("results"),
            display: DisplayKind::Normal,
            record: true,
            catch_exceptions: true,
            agent_args: AgentArgs::new(),
            reference_prefix: "[git]".to_string(),
        }
    }
}

/// Available cores minus one, and at least one.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

impl TournamentConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            TournamentError::config("config_file", format!("Failed to read config file: {e}"))
        })?;

        let config: TournamentConfig = toml::from_str(&content).map_err(|e| {
            TournamentError::config("config_format", format!("Failed to parse config file: {e}"))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            TournamentError::config(
                "config_serialization",
                format!("Failed to serialize config: {e}"),
            )
        })?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(TournamentError::config("workers", "must be at least 1"));
        }
        if self.games_per_match == 0 {
            return Err(TournamentError::config("games_per_match", "must be at least 1"));
        }
        if self.move_limit == 0 {
            return Err(TournamentError::config("move_limit", "must be at least 1"));
        }
        if self.layout.trim().is_empty() {
            return Err(TournamentError::config("layout", "must not be empty"));
        }
        Ok(())
    }

    /// Games per pairing that reach the scoreboard; training games do not.
    pub fn scored_games(&self) -> u32 {
        self.games_per_match.saturating_sub(self.num_training)
    }

    /// Seed forwarded to the engine for every match.
    pub fn engine_seed(&self) -> Option<u64> {
        self.fix_random_seed.then_some(FIXED_SEED)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
