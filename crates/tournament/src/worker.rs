//! Match worker
//!
//! A worker repeatedly takes a pairing off the shared queue, builds both
//! teams, has the engine play all games of the pairing and streams one
//! [`GameOutcome`] per game to the coordinator. When the queue runs dry it
//! signals completion and stops.
//!
//! Team construction failures are recovered here. Engine failures are not:
//! they end the worker with an error that aborts the run.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arena_core::{
    console, Action, Agent, GameEngine, GameState, MatchSetup, Team, AGENTS_PER_TEAM,
};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

use crate::artifacts;
use crate::config::TournamentConfig;
use crate::error::{Result, TournamentError};
use crate::layout::LayoutPlan;
use crate::result::ResultCode;
use crate::scheduler::{Pairing, PairingQueue};
use crate::validator::{build_team, Participant};

/// How long a worker waits on the queue before concluding it is empty.
pub const DEQUEUE_TIMEOUT: Duration = Duration::from_secs(1);

/// Classified result of one game, from the home side's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub home: String,
    pub away: String,
    /// Home score minus away score
    pub points: i64,
    pub home_result: ResultCode,
    pub away_result: ResultCode,
}

/// Wraps an agent so it cannot print while setting up or choosing actions.
pub struct MutedAgent {
    inner: Box<dyn Agent>,
}

impl MutedAgent {
    pub fn new(inner: Box<dyn Agent>) -> Self {
        Self { inner }
    }
}

impl Agent for MutedAgent {
    fn register_initial_state(&mut self, state: &GameState) {
        let _mute = console::mute();
        self.inner.register_initial_state(state);
    }

    fn choose_action(&mut self, state: &GameState) -> Action {
        let _mute = console::mute();
        self.inner.choose_action(state)
    }

    fn final_state(&mut self, state: &GameState) {
        self.inner.final_state(state);
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

pub fn mute_team(team: Team) -> Team {
    team.into_iter()
        .map(|agent| Box::new(MutedAgent::new(agent)) as Box<dyn Agent>)
        .collect()
}

/// Sends the worker id on the completion channel when dropped, so the
/// coordinator hears about workers that fail or panic too.
struct CompletionSignal {
    worker: usize,
    done: Sender<usize>,
}

impl Drop for CompletionSignal {
    fn drop(&mut self) {
        // The coordinator may already be gone after a fatal error.
        let _ = self.done.send(self.worker);
    }
}

pub struct Worker {
    pub id: usize,
    pub config: Arc<TournamentConfig>,
    pub layouts: Arc<LayoutPlan>,
    pub engine: Arc<dyn GameEngine>,
    pub output_dir: PathBuf,
    pub queue: PairingQueue,
    pub results: Sender<GameOutcome>,
    pub done: Sender<usize>,
}

impl Worker {
    /// Work through the queue, then signal completion.
    pub fn run(self) -> Result<()> {
        let _signal = CompletionSignal {
            worker: self.id,
            done: self.done.clone(),
        };
        while let Some(pairing) = self.queue.next(DEQUEUE_TIMEOUT) {
            self.play(&pairing)?;
        }
        tracing::debug!(worker = self.id, "Pairing queue exhausted");
        Ok(())
    }

    fn play(&self, pairing: &Pairing) -> Result<()> {
        let (home, away) = (&pairing.home.name, &pairing.away.name);
        tracing::info!(worker = self.id, "Playing match {}: {} vs {}", pairing.match_no, home, away);

        let home_team = self.construct(&pairing.home, 0, 2, true);
        let away_team = self.construct(&pairing.away, 1, 3, false);

        match (home_team, away_team) {
            (Ok(home_team), Ok(away_team)) => self.play_games(pairing, home_team, away_team),
            (home_team, away_team) => {
                let home_result = side_default(pairing, home, home_team.err());
                let away_result = side_default(pairing, away, away_team.err());
                tracing::info!(
                    "{} vs {} ended in {}-{} with {} pts",
                    home,
                    away,
                    home_result,
                    away_result,
                    0
                );
                for _ in 0..self.config.scored_games() {
                    self.emit(pairing, 0, home_result, away_result)?;
                }
                Ok(())
            }
        }
    }

    /// Build one side's team, muted, or explain why that failed.
    fn construct(
        &self,
        participant: &Participant,
        first_index: usize,
        second_index: usize,
        is_home: bool,
    ) -> std::result::Result<Team, String> {
        let _mute = console::mute();
        let team = build_team(
            participant.factory.as_ref(),
            first_index,
            second_index,
            is_home,
            &self.config.agent_args,
        )?;
        match team {
            Some(team) if team.len() == AGENTS_PER_TEAM => Ok(mute_team(team)),
            Some(team) => Err(format!("expected {AGENTS_PER_TEAM} agents, got {}", team.len())),
            None => Err("factory returned no team".to_string()),
        }
    }

    fn play_games(&self, pairing: &Pairing, home_team: Team, away_team: Team) -> Result<()> {
        let (home, away) = (&pairing.home.name, &pairing.away.name);
        let scratch = artifacts::scratch_dir(pairing.match_no, home, away)?;

        let agents: Vec<Box<dyn Agent>> = home_team
            .into_iter()
            .zip(away_team)
            .flat_map(|(h, a)| [h, a])
            .collect();
        let setup = MatchSetup {
            layouts: self.layouts.layouts_for(self.config.games_per_match),
            agents,
            display: self.config.display,
            length: self.config.move_limit,
            num_games: self.config.games_per_match,
            record: self.config.record,
            num_training: self.config.num_training,
            home_name: home.clone(),
            away_name: away.clone(),
            mute_agents: self.config.display.mutes_agents(),
            catch_exceptions: self.config.catch_exceptions,
            seed: self.config.engine_seed(),
            artifact_dir: scratch.path().to_path_buf(),
        };

        let games = {
            let _log = console::log_with_prefix(format!("{pairing}: "));
            self.engine.run_games(setup)
        }
        .map_err(|source| TournamentError::Engine {
            match_no: pairing.match_no,
            home: home.clone(),
            away: away.clone(),
            source,
        })?;

        for game in &games {
            let (home_result, away_result) =
                ResultCode::from_points(game.score, game.is_irregular());
            tracing::info!(
                "{} vs {} ended in {}-{} with {} pts",
                home,
                away,
                home_result,
                away_result,
                game.score
            );
            self.emit(pairing, game.score, home_result, away_result)?;
        }

        let moved = artifacts::relocate_replays(scratch.path(), &self.output_dir, home, away)?;
        tracing::debug!(match_no = pairing.match_no, replays = moved.len(), "Replays relocated");
        scratch.close()?;
        Ok(())
    }

    fn emit(
        &self,
        pairing: &Pairing,
        points: i64,
        home_result: ResultCode,
        away_result: ResultCode,
    ) -> Result<()> {
        self.results
            .send(GameOutcome {
                home: pairing.home.name.clone(),
                away: pairing.away.name.clone(),
                points,
                home_result,
                away_result,
            })
            .map_err(|_| TournamentError::WorkerDisconnected)
    }
}

/// `Error` for a side whose team could not be built, `Win` otherwise.
fn side_default(pairing: &Pairing, team: &str, failure: Option<String>) -> ResultCode {
    match failure {
        Some(reason) => {
            tracing::error!(
                "Match {}: An error occurred during {}'s team construction: {}",
                pairing.match_no,
                team,
                reason
            );
            ResultCode::Error
        }
        None => ResultCode::Win,
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
