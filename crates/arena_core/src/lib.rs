pub mod console;
pub mod time_control;
pub mod types;

pub use time_control::*;
pub use types::*;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of agents each team fields in a game.
pub const AGENTS_PER_TEAM: usize = 2;

/// Number of agents taking part in a single game (two per side).
pub const AGENTS_PER_GAME: usize = 2 * AGENTS_PER_TEAM;

// =============================================================================
// Agent trait: implemented by every submitted agent
// =============================================================================

/// A single in-game agent.
///
/// Agents are created in pairs by a [`TeamFactory`] and then driven by a
/// [`GameEngine`]. They may print through [`say!`] / [`warn_out!`]; whether
/// that output is shown, logged or dropped is decided by the runner.
pub trait Agent: Send {
    /// Called once before the first move of every game.
    fn register_initial_state(&mut self, state: &GameState);

    /// Pick the next action for the given state.
    fn choose_action(&mut self, state: &GameState) -> Action;

    /// Called once after the game is over.
    fn final_state(&mut self, _state: &GameState) {}

    /// Human readable name used in logs.
    fn name(&self) -> &str {
        "agent"
    }
}

/// The agents a factory builds for one side of a pairing.
pub type Team = Vec<Box<dyn Agent>>;

/// Declared parameter shape of a team factory.
///
/// Used to explain *why* a factory failed during validation: a factory that
/// accepts fewer than three positional parameters, or demands more than
/// three without defaults, is reported differently from one that simply
/// failed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorySignature {
    /// Total number of positional parameters.
    pub positional: usize,
    /// Positional parameters without a default value.
    pub required: usize,
}

impl FactorySignature {
    /// `(first_index, second_index, is_home)`
    pub const STANDARD_ARITY: usize = 3;
}

impl Default for FactorySignature {
    fn default() -> Self {
        Self {
            positional: Self::STANDARD_ARITY,
            required: Self::STANDARD_ARITY,
        }
    }
}

/// Builds a team of agents for one side of a pairing.
///
/// `Ok(None)` means the factory returned nothing; a roster whose length is
/// not [`AGENTS_PER_TEAM`] is a malformed team. Both are disqualifying.
pub trait TeamFactory: Send + Sync {
    fn create_team(
        &self,
        first_index: usize,
        second_index: usize,
        is_home: bool,
        args: &AgentArgs,
    ) -> anyhow::Result<Option<Team>>;

    fn signature(&self) -> FactorySignature {
        FactorySignature::default()
    }
}

impl<F> TeamFactory for F
where
    F: Fn(usize, usize, bool, &AgentArgs) -> anyhow::Result<Option<Team>> + Send + Sync,
{
    fn create_team(
        &self,
        first_index: usize,
        second_index: usize,
        is_home: bool,
        args: &AgentArgs,
    ) -> anyhow::Result<Option<Team>> {
        self(first_index, second_index, is_home, args)
    }
}

// =============================================================================
// GameEngine trait: the opaque game simulation
// =============================================================================

/// Artifacts an engine writes as `<REPLAY_PREFIX>-<game>` into
/// [`MatchSetup::artifact_dir`] are kept by the runner.
pub const REPLAY_PREFIX: &str = "replay";

/// Everything an engine needs to play one pairing.
pub struct MatchSetup {
    /// One layout per game.
    pub layouts: Vec<LayoutSpec>,
    /// Interleaved `[home0, away0, home1, away1]`.
    pub agents: Vec<Box<dyn Agent>>,
    pub display: DisplayKind,
    /// Maximum number of moves per game.
    pub length: u32,
    pub num_games: u32,
    /// Write replay artifacts into `artifact_dir`.
    pub record: bool,
    /// Leading games that are training episodes: played with output
    /// suppressed, neither recorded nor returned.
    pub num_training: u32,
    pub home_name: String,
    pub away_name: String,
    pub mute_agents: bool,
    pub catch_exceptions: bool,
    /// Fixed seed for any randomness inside the engine.
    pub seed: Option<u64>,
    /// Private directory for artifacts produced by this match.
    pub artifact_dir: PathBuf,
}

/// Outcome of a single finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Final score, home minus away.
    pub score: i64,
    pub agent_crashed: bool,
    pub agent_timeout: bool,
}

impl GameRecord {
    /// A crash or a timeout happened during the game.
    pub fn is_irregular(&self) -> bool {
        self.agent_crashed || self.agent_timeout
    }
}

/// Failures an engine could not handle itself.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Expected {expected} agents, got {actual}")]
    AgentCount { expected: usize, actual: usize },

    #[error("Expected {expected} layouts, got {actual}")]
    LayoutCount { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Engine failure: {0}")]
    Other(String),
}

/// A game simulation that plays all games of a pairing in one call.
pub trait GameEngine: Send + Sync {
    /// One record per non-training game, in play order.
    fn run_games(&self, setup: MatchSetup) -> Result<Vec<GameRecord>, EngineError>;

    fn name(&self) -> &str;
}
