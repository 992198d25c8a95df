//! Random Agents
//!
//! A team of agents that pick actions uniformly at random, plus a
//! randomized reference engine to drive them. Useful for:
//! - Exercising the tournament runner end to end without a real game
//! - Baseline comparisons (any real submission should beat this)
//! - Stress testing the worker pool

mod engine;

pub use engine::*;

use arena_core::{say, Action, Agent, AgentArgs, GameState, Team, TeamFactory};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;


/// An agent that plays random legal actions.
///
/// This agent has no strategy at all - it simply picks a random action
/// from the ones offered. It's the simplest possible agent and serves as
/// a baseline for testing.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    index: usize,
    rng: StdRng,
    moves: u64,
}

impl RandomAgent {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            rng: StdRng::from_entropy(),
            moves: 0,
        }
    }

    pub fn with_seed(index: usize, seed: u64) -> Self {
        Self {
            index,
            rng: StdRng::seed_from_u64(seed),
            moves: 0,
        }
    }
}

impl Agent for RandomAgent {
    fn register_initial_state(&mut self, state: &GameState) {
        self.moves = 0;
        say!("Random agent {} ready on {}", self.index, state.layout);
    }

    fn choose_action(&mut self, state: &GameState) -> Action {
        self.moves += 1;
        state
            .legal_actions
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::Stop)
    }

    fn final_state(&mut self, state: &GameState) {
        say!(
            "Random agent {} finished after {} moves (score {})",
            self.index,
            self.moves,
            state.score
        );
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }
}

/// Factory for a team of two [`RandomAgent`]s.
///
/// Recognised agent arguments: `seed=<u64>` makes the team deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTeam;

impl RandomTeam {
    pub fn new() -> Self {
        Self
    }
}

impl TeamFactory for RandomTeam {
    fn create_team(
        &self,
        first_index: usize,
        second_index: usize,
        _is_home: bool,
        args: &AgentArgs,
    ) -> anyhow::Result<Option<Team>> {
        let seed = args.get("seed").map(str::parse::<u64>).transpose()?;
        let make = |index: usize| -> Box<dyn Agent> {
            match seed {
                Some(seed) => Box::new(RandomAgent::with_seed(index, seed ^ index as u64)),
                None => Box::new(RandomAgent::new(index)),
            }
        };
        Ok(Some(vec![make(first_index), make(second_index)]))
    }
}
