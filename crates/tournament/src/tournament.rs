//! Tournament orchestration
//!
//! Validation, scheduling, the worker pool and the scoreboard wired together:
//! submissions go in, a filled scoreboard comes out.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use arena_core::GameEngine;
use chrono::{DateTime, Local};

use crate::artifacts;
use crate::config::TournamentConfig;
use crate::error::Result;
use crate::layout::LayoutPlan;
use crate::pool::WorkerPool;
use crate::report::TournamentReport;
use crate::scheduler::make_pairings;
use crate::scoreboard::Scoreboard;
use crate::validator::{validate_submissions, Submission};

/// Everything a finished run leaves behind for reporting.
#[derive(Debug)]
pub struct TournamentRun {
    pub scoreboard: Scoreboard,
    /// Union of contact addresses across all submissions
    pub contacts: BTreeSet<String>,
    /// `None` when the run was skipped
    pub run_dir: Option<PathBuf>,
    pub layout: Option<String>,
    pub matches: usize,
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
}

impl TournamentRun {
    /// Whether any matches were scheduled.
    pub fn played(&self) -> bool {
        self.run_dir.is_some()
    }

    pub fn report(&self, games_per_match: u32) -> TournamentReport {
        TournamentReport::from_snapshot(
            self.scoreboard.snapshot(),
            self.layout.clone().unwrap_or_default(),
            games_per_match,
            self.started,
            self.finished,
        )
    }
}

pub struct Tournament {
    config: Arc<TournamentConfig>,
    engine: Arc<dyn GameEngine>,
}

impl Tournament {
    pub fn new(config: TournamentConfig, engine: Arc<dyn GameEngine>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            engine,
        })
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Validate `submissions` and play every pairing of the qualified teams.
    ///
    /// Disqualifications and construction failures end up on the
    /// scoreboard. An `Err` means the run was aborted and its results are
    /// incomplete.
    pub fn run(&self, submissions: impl IntoIterator<Item = Submission>) -> Result<TournamentRun> {
        let started = Local::now();
        tracing::info!(engine = self.engine.name(), "Tournament started");

        let validation = validate_submissions(submissions);
        let scoreboard = Scoreboard::new();
        scoreboard.disqualify(validation.disqualified);
        scoreboard.register_participants(validation.qualified.keys().cloned());

        for (team, reason) in scoreboard.disqualified() {
            tracing::info!("Disqualified: {team} ({reason})");
        }
        tracing::info!(
            "Qualified teams: {}",
            scoreboard.participants().join(", ")
        );

        let mut run = TournamentRun {
            scoreboard,
            contacts: validation.contacts,
            run_dir: None,
            layout: None,
            matches: 0,
            started,
            finished: started,
        };

        let competing = run
            .scoreboard
            .competing_participants(&self.config.reference_prefix);
        if competing.len() < 2 {
            tracing::info!(
                competing = competing.len(),
                "Too few participants, not running the tournament"
            );
            run.finished = Local::now();
            return Ok(run);
        }

        let mut rng = rand::thread_rng();
        let layouts =
            LayoutPlan::resolve(&self.config.layout, &self.config.layouts_dir, &mut rng)?;
        let run_dir = artifacts::run_directory(&self.config.results_dir, &started)?;
        let queue = make_pairings(&validation.qualified, &mut rng);
        tracing::info!(
            layout = %layouts.name(),
            run_dir = %run_dir.display(),
            "Running {} matches",
            queue.total()
        );

        run.layout = Some(layouts.name());
        run.matches = queue.total();
        run.run_dir = Some(run_dir.clone());

        let pool = WorkerPool::spawn(
            self.config.workers,
            Arc::clone(&self.config),
            Arc::new(layouts),
            Arc::clone(&self.engine),
            run_dir,
            queue,
        )?;
        pool.drain_into(&run.scoreboard)?;

        run.finished = Local::now();
        tracing::info!("Tournament finished");
        Ok(run)
    }
}

/// Run one tournament with a fresh [`Tournament`].
pub fn run_tournament(
    config: TournamentConfig,
    engine: Arc<dyn GameEngine>,
    submissions: impl IntoIterator<Item = Submission>,
) -> Result<TournamentRun> {
    Tournament::new(config, engine)?.run(submissions)
}

#[cfg(test)]
#[path = "tournament_tests.rs"]
mod tournament_tests;
