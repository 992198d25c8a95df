//! Randomized reference engine.
//!
//! Not a real game: agents take turns choosing actions and every
//! non-`Stop` action has a small chance of scoring a point for its side.
//! What it does model faithfully is the engine contract the tournament
//! runner relies on: crash and timeout detection, training episodes,
//! display muting and replay artifacts written into the match's scratch
//! directory.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use arena_core::{
    say, Action, Agent, EngineError, GameEngine, GameRecord, GameState, LayoutSpec, MatchSetup,
    MoveClock, Side, AGENTS_PER_GAME, REPLAY_PREFIX,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Chance that a moving agent scores.
const SCORE_CHANCE: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct RandomGameEngine {
    move_budget: Option<Duration>,
}

impl RandomGameEngine {
    pub fn new() -> Self {
        Self {
            move_budget: Some(Duration::from_secs(1)),
        }
    }

    pub fn with_move_budget(move_budget: Option<Duration>) -> Self {
        Self { move_budget }
    }
}

impl Default for RandomGameEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct Replay {
    layout: String,
    home: String,
    away: String,
    score: i64,
    crashed: bool,
    timed_out: bool,
    moves: Vec<ReplayMove>,
}

#[derive(Debug, Serialize)]
struct ReplayMove {
    turn: u32,
    agent: usize,
    action: Action,
}

/// Outcome of one guarded call into agent code.
enum Call<T> {
    Done(T),
    Crashed,
}

fn guarded<T>(catch_exceptions: bool, f: impl FnOnce() -> T) -> Call<T> {
    if !catch_exceptions {
        return Call::Done(f());
    }
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Call::Done(value),
        Err(_) => Call::Crashed,
    }
}

/// Score awarded when an agent forfeits: the other side wins by one.
fn forfeit_score(agent_index: usize) -> i64 {
    match Side::of_agent(agent_index) {
        Side::Home => -1,
        Side::Away => 1,
    }
}

impl GameEngine for RandomGameEngine {
    fn run_games(&self, mut setup: MatchSetup) -> Result<Vec<GameRecord>, EngineError> {
        if setup.agents.len() != AGENTS_PER_GAME {
            return Err(EngineError::AgentCount {
                expected: AGENTS_PER_GAME,
                actual: setup.agents.len(),
            });
        }
        if setup.layouts.len() != setup.num_games as usize {
            return Err(EngineError::LayoutCount {
                expected: setup.num_games as usize,
                actual: setup.layouts.len(),
            });
        }

        let mut rng = match setup.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut agents = std::mem::take(&mut setup.agents);
        // Training games are played but never reported.
        let mut records = Vec::with_capacity(setup.num_games.saturating_sub(setup.num_training) as usize);
        for game_no in 0..setup.num_games {
            let training = game_no < setup.num_training;
            let layout = &setup.layouts[game_no as usize];
            let (record, replay) = self.play_game(&mut agents, layout, &setup, &mut rng);

            if training {
                continue;
            }

            if !setup.display.is_null() {
                match record.score {
                    s if s > 0 => say!("{} wins by {} points.", setup.home_name, s),
                    s if s < 0 => say!("{} wins by {} points.", setup.away_name, -s),
                    _ => say!("Tie game!"),
                }
            }

            if setup.record {
                let path = setup
                    .artifact_dir
                    .join(format!("{}-{}", REPLAY_PREFIX, game_no));
                fs::write(path, serde_json::to_vec_pretty(&replay)?)?;
            }
            records.push(record);
        }
        Ok(records)
    }

    fn name(&self) -> &str {
        "random"
    }
}

impl RandomGameEngine {
    fn play_game(
        &self,
        agents: &mut [Box<dyn Agent>],
        layout: &LayoutSpec,
        setup: &MatchSetup,
        rng: &mut StdRng,
    ) -> (GameRecord, Replay) {
        let layout_name = layout.name();
        let state_for = |agent_index: usize, turn: u32, score: i64| GameState {
            agent_index,
            turn,
            moves_left: setup.length.saturating_sub(turn),
            score,
            legal_actions: Action::ALL.to_vec(),
            layout: layout_name.clone(),
        };

        let mut score = 0i64;
        let mut crashed = false;
        let mut timed_out = false;
        let mut moves = Vec::new();

        for (index, agent) in agents.iter_mut().enumerate() {
            let state = state_for(index, 0, 0);
            if let Call::Crashed = guarded(setup.catch_exceptions, || {
                agent.register_initial_state(&state)
            }) {
                crashed = true;
                score = forfeit_score(index);
                break;
            }
        }

        let mut clock = MoveClock::new(self.move_budget);
        let mut turn = 0;
        while !crashed && turn < setup.length {
            let index = turn as usize % agents.len();
            let state = state_for(index, turn, score);

            clock.start();
            let action = match guarded(setup.catch_exceptions, || {
                agents[index].choose_action(&state)
            }) {
                Call::Done(action) => action,
                Call::Crashed => {
                    crashed = true;
                    score = forfeit_score(index);
                    break;
                }
            };
            if clock.exceeded() {
                timed_out = true;
                score = forfeit_score(index);
                break;
            }

            if action != Action::Stop && rng.gen_bool(SCORE_CHANCE) {
                score += match Side::of_agent(index) {
                    Side::Home => 1,
                    Side::Away => -1,
                };
            }
            moves.push(ReplayMove {
                turn,
                agent: index,
                action,
            });
            turn += 1;
        }

        for (index, agent) in agents.iter_mut().enumerate() {
            let state = state_for(index, turn, score);
            // A crash in the final hook no longer changes the outcome.
            let _ = guarded(setup.catch_exceptions, || agent.final_state(&state));
        }

        let record = GameRecord {
            score,
            agent_crashed: crashed,
            agent_timeout: timed_out,
        };
        let replay = Replay {
            layout: layout_name.clone(),
            home: setup.home_name.clone(),
            away: setup.away_name.clone(),
            score,
            crashed,
            timed_out,
            moves,
        };
        (record, replay)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
