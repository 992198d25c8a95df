//! The shared scoreboard
//!
//! All state sits behind one mutex. `add_result` updates both directions of
//! a pairing in the same critical section, so for any two teams
//! `records[a][b].points == -records[b][a].points` holds at every point a
//! reader can observe.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::result::{Record, ResultCode};
use crate::validator::Disqualification;
use crate::worker::GameOutcome;

/// team -> opponent -> record
pub type Records = BTreeMap<String, BTreeMap<String, Record>>;

/// Consistent copy of the scoreboard, taken under the lock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardSnapshot {
    pub records: Records,
    pub disqualified: BTreeMap<String, Disqualification>,
    pub participants: BTreeSet<String>,
}

impl ScoreboardSnapshot {
    /// Teams with their summed record, best first.
    ///
    /// Ordered by competition score; raw points only decide between teams
    /// whose scores are exactly equal. Remaining ties keep alphabetical order.
    pub fn ranking(&self) -> Vec<(String, Record)> {
        let mut totals: Vec<(String, Record)> = self
            .records
            .iter()
            .map(|(team, opponents)| (team.clone(), opponents.values().sum()))
            .collect();
        totals.sort_by(|a, b| b.1.competition_cmp(&a.1));
        totals
    }
}

#[derive(Debug, Default)]
pub struct Scoreboard {
    state: Mutex<ScoreboardSnapshot>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ScoreboardSnapshot> {
        // Every update completes before the guard is released, so a poisoned
        // lock still protects consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register teams disqualified during validation.
    pub fn disqualify(&self, teams: impl IntoIterator<Item = (String, Disqualification)>) {
        self.state().disqualified.extend(teams);
    }

    pub fn register_participants(&self, teams: impl IntoIterator<Item = String>) {
        self.state().participants.extend(teams);
    }

    /// Record one game between `team_a` and `team_b`.
    ///
    /// `points` is from `team_a`'s perspective; `team_b` is credited with
    /// `-points`.
    pub fn add_result(
        &self,
        team_a: &str,
        team_b: &str,
        points: i64,
        result_a: ResultCode,
        result_b: ResultCode,
    ) {
        let mut state = self.state();
        state
            .records
            .entry(team_a.to_string())
            .or_default()
            .entry(team_b.to_string())
            .or_default()
            .update(points, Some(result_a));
        state
            .records
            .entry(team_b.to_string())
            .or_default()
            .entry(team_a.to_string())
            .or_default()
            .update(-points, Some(result_b));
    }

    pub fn add_outcome(&self, outcome: &GameOutcome) {
        self.add_result(
            &outcome.home,
            &outcome.away,
            outcome.points,
            outcome.home_result,
            outcome.away_result,
        );
    }

    pub fn record(&self, team: &str, opponent: &str) -> Option<Record> {
        self.state()
            .records
            .get(team)
            .and_then(|opponents| opponents.get(opponent))
            .copied()
    }

    pub fn ranking(&self) -> Vec<(String, Record)> {
        self.state().ranking()
    }

    /// Alphabetically sorted team names.
    pub fn participants(&self) -> Vec<String> {
        self.state().participants.iter().cloned().collect()
    }

    /// Participants that count toward the minimum field size, i.e. those
    /// whose name does not start with `reference_prefix`.
    pub fn competing_participants(&self, reference_prefix: &str) -> Vec<String> {
        let prefix = reference_prefix.to_lowercase();
        self.state()
            .participants
            .iter()
            .filter(|name| prefix.is_empty() || !name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect()
    }

    pub fn disqualified(&self) -> BTreeMap<String, Disqualification> {
        self.state().disqualified.clone()
    }

    pub fn snapshot(&self) -> ScoreboardSnapshot {
        self.state().clone()
    }
}

#[cfg(test)]
#[path = "scoreboard_tests.rs"]
mod scoreboard_tests;
