//! Tournament CLI
//!
//! Runs a round-robin tournament between teams and writes the scoreboard
//! next to the replays of the run.

use anyhow::{Context, Result};
use arena_core::{AgentArgs, DisplayKind};
use clap::Parser;
use random_engine::{RandomGameEngine, RandomTeam};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tournament::{logging, report, Submission, Tournament, TournamentConfig};

#[derive(Parser)]
#[command(name = "tournament")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Round-robin tournament runner for arena agents", long_about = None)]
struct Cli {
    /// TOML configuration file; flags below override it
    #[arg(long, env = "TOURNAMENT_CONFIG")]
    config: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'T', long = "threads")]
    workers: Option<usize>,

    /// Games per pairing
    #[arg(short = 'n', long = "num-games")]
    games_per_match: Option<u32>,

    /// Use a fixed random seed for every match
    #[arg(short = 'f', long = "fix-random-seed")]
    fix_random_seed: bool,

    /// Move limit per game
    #[arg(short = 'i', long = "time")]
    move_limit: Option<u32>,

    /// Leading training games with suppressed output
    #[arg(short = 'x', long = "num-training")]
    num_training: Option<u32>,

    /// Layout name under --layouts-dir, RANDOM, or RANDOM<seed>
    #[arg(short = 'l', long)]
    layout: Option<String>,

    #[arg(long)]
    layouts_dir: Option<PathBuf>,

    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Agent arguments, e.g. "seed=3,verbose"
    #[arg(short = 'A', long = "agent-args")]
    agent_args: Option<String>,

    /// Quiet display
    #[arg(short = 'q', long, conflicts_with = "super_quiet")]
    quiet: bool,

    /// Super quiet display; also mutes agents
    #[arg(short = 'Q', long)]
    super_quiet: bool,

    /// Do not keep replays
    #[arg(long)]
    no_record: bool,

    /// Let agent failures reach the engine
    #[arg(long)]
    no_catch_exceptions: bool,

    /// Log file, truncated on start
    #[arg(long, default_value = "log.txt")]
    log_file: PathBuf,

    /// Log to stderr instead of a file
    #[arg(long, conflicts_with = "log_file")]
    log_stderr: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    log_json: bool,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Number of random demo teams to enter
    #[arg(long, default_value_t = 4)]
    demo_teams: usize,
}

impl Cli {
    fn build_config(&self) -> Result<TournamentConfig> {
        let mut config = match &self.config {
            Some(path) => TournamentConfig::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => TournamentConfig::default(),
        };

        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(games) = self.games_per_match {
            config.games_per_match = games;
        }
        if self.fix_random_seed {
            config.fix_random_seed = true;
        }
        if let Some(move_limit) = self.move_limit {
            config.move_limit = move_limit;
        }
        if let Some(num_training) = self.num_training {
            config.num_training = num_training;
        }
        if let Some(layout) = &self.layout {
            config.layout = layout.clone();
        }
        if let Some(dir) = &self.layouts_dir {
            config.layouts_dir = dir.clone();
        }
        if let Some(dir) = &self.results_dir {
            config.results_dir = dir.clone();
        }
        if let Some(args) = &self.agent_args {
            config.agent_args = AgentArgs::parse(args);
        }
        if self.super_quiet {
            config.display = DisplayKind::SuperQuiet;
        } else if self.quiet {
            config.display = DisplayKind::Quiet;
        }
        if self.no_record {
            config.record = false;
        }
        if self.no_catch_exceptions {
            config.catch_exceptions = false;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Random teams plus one reference team that does not count toward the
/// minimum field size.
fn demo_roster(teams: usize, reference_prefix: &str) -> Vec<Submission> {
    let mut roster: Vec<Submission> = (1..=teams)
        .map(|n| Submission::new(format!("random-{n}")).with_factory(RandomTeam::new()))
        .collect();
    roster.push(Submission::new(format!("{reference_prefix}baseline")).with_factory(RandomTeam::new()));
    roster
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.build_config()?;
    let submissions = demo_roster(cli.demo_teams, &config.reference_prefix);
    let games_per_match = config.games_per_match;

    let tournament = Tournament::new(config, Arc::new(RandomGameEngine::new()))?;
    let finished = tournament.run(submissions).context("Tournament aborted")?;

    let summary = finished.report(games_per_match);
    if !finished.played() {
        println!("Too few teams qualified; no matches were played.");
    } else if let Some(run_dir) = &finished.run_dir {
        report::write_scoreboard_json(run_dir, &summary)?;
    }
    summary.print();
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_file = (!cli.log_stderr).then_some(cli.log_file.as_path());
    if let Err(e) = logging::init_tracing(cli.log_json, logging::parse_level(&cli.log_level), log_file) {
        eprintln!("Failed to open log file {}: {}", cli.log_file.display(), e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
