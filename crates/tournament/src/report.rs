//! Tournament results storage and reporting
//!
//! The finished scoreboard is handed off as `scoreboard.json` in the run
//! directory, next to the relocated replays. A plain text ranking table is
//! printed at the end of a run.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::result::{Record, ResultCode};
use crate::scoreboard::{Records, ScoreboardSnapshot};
use crate::validator::Disqualification;

/// File name of the scoreboard hand-off inside the run directory.
pub const SCOREBOARD_FILE: &str = "scoreboard.json";

/// One line of the ranking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub team: String,
    pub score: i64,
    pub record: Record,
}

/// Complete tournament results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentReport {
    /// Layout name the run was played on
    pub layout: String,
    pub games_per_match: u32,
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
    /// Qualified teams, alphabetical
    pub participants: BTreeSet<String>,
    pub disqualified: BTreeMap<String, Disqualification>,
    /// Best team first
    pub ranking: Vec<RankingEntry>,
    /// team -> opponent -> record
    pub records: Records,
}

impl TournamentReport {
    pub fn from_snapshot(
        snapshot: ScoreboardSnapshot,
        layout: impl Into<String>,
        games_per_match: u32,
        started: DateTime<Local>,
        finished: DateTime<Local>,
    ) -> Self {
        let ranking = snapshot
            .ranking()
            .into_iter()
            .map(|(team, record)| RankingEntry {
                team,
                score: record.score(),
                record,
            })
            .collect();
        Self {
            layout: layout.into(),
            games_per_match,
            started,
            finished,
            participants: snapshot.participants,
            disqualified: snapshot.disqualified,
            ranking,
            records: snapshot.records,
        }
    }

    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Generate a text report
    pub fn render_text(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Tournament on {} ===\n\n", self.layout));
        report.push_str(&format!(
            "Participants: {}\n",
            self.participants.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
        report.push_str(&format!(
            "{} games per match, {} to {}\n\n",
            self.games_per_match,
            self.started.format("%Y-%m-%d %H:%M:%S"),
            self.finished.format("%Y-%m-%d %H:%M:%S")
        ));

        report.push_str(&format!(
            "{:<4} {:<24} {:>7} {:>5} {:>5} {:>5} {:>5} {:>8}\n",
            "#", "Team", "Score", "W", "T", "L", "E", "Points"
        ));
        report.push_str(&"-".repeat(70));
        report.push('\n');
        for (position, entry) in self.ranking.iter().enumerate() {
            let record = &entry.record;
            report.push_str(&format!(
                "{:<4} {:<24} {:>7} {:>5} {:>5} {:>5} {:>5} {:>8}\n",
                position + 1,
                entry.team,
                entry.score,
                record.count(ResultCode::Win),
                record.count(ResultCode::Tie),
                record.count(ResultCode::Lost),
                record.count(ResultCode::Error),
                record.points
            ));
        }

        if !self.disqualified.is_empty() {
            report.push_str("\nDisqualified:\n");
            for (team, reason) in &self.disqualified {
                report.push_str(&format!("  {team}: {reason}\n"));
            }
        }

        report
    }

    /// Print report to stdout
    pub fn print(&self) {
        println!("{}", self.render_text());
    }
}

/// Write `report` as [`SCOREBOARD_FILE`] into `run_dir`.
pub fn write_scoreboard_json(run_dir: &Path, report: &TournamentReport) -> Result<PathBuf> {
    let path = run_dir.join(SCOREBOARD_FILE);
    report.save(&path)?;
    tracing::info!(path = %path.display(), "Scoreboard written");
    Ok(path)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
