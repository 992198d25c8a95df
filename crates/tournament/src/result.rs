//! Game classification and per-opponent records

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Classification of one game from one side's point of view.
///
/// The numeric [`value`](ResultCode::value) doubles as the scoring
/// multiplier used by [`Record::score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultCode {
    Win,
    Tie,
    Lost,
    Error,
}

impl ResultCode {
    pub const ALL: [ResultCode; 4] = [
        ResultCode::Win,
        ResultCode::Tie,
        ResultCode::Lost,
        ResultCode::Error,
    ];

    pub fn value(self) -> i64 {
        match self {
            ResultCode::Win => 5,
            ResultCode::Tie => 3,
            ResultCode::Lost => 1,
            ResultCode::Error => -6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResultCode::Win => "WIN",
            ResultCode::Tie => "TIE",
            ResultCode::Lost => "LOST",
            ResultCode::Error => "ERROR",
        }
    }

    /// Classify a finished game as `(home, away)`.
    ///
    /// `points` is home minus away. On an irregular game (crash or timeout)
    /// every side that did not win is marked `Error`; a winner keeps `Win`.
    pub fn from_points(points: i64, irregular: bool) -> (ResultCode, ResultCode) {
        let (mut home, mut away) = match points.cmp(&0) {
            Ordering::Less => (ResultCode::Lost, ResultCode::Win),
            Ordering::Greater => (ResultCode::Win, ResultCode::Lost),
            Ordering::Equal => (ResultCode::Tie, ResultCode::Tie),
        };

        if irregular {
            if home != ResultCode::Win {
                home = ResultCode::Error;
            }
            if away != ResultCode::Win {
                away = ResultCode::Error;
            }
        }
        (home, away)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Frequencies of a team's results against one opponent (or, summed, against
/// everyone), plus the running total of point margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub win: u32,
    pub tie: u32,
    pub lost: u32,
    pub error: u32,
    pub points: i64,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, code: ResultCode) -> u32 {
        match code {
            ResultCode::Win => self.win,
            ResultCode::Tie => self.tie,
            ResultCode::Lost => self.lost,
            ResultCode::Error => self.error,
        }
    }

    fn count_mut(&mut self, code: ResultCode) -> &mut u32 {
        match code {
            ResultCode::Win => &mut self.win,
            ResultCode::Tie => &mut self.tie,
            ResultCode::Lost => &mut self.lost,
            ResultCode::Error => &mut self.error,
        }
    }

    pub fn total_games(&self) -> u32 {
        self.win + self.tie + self.lost + self.error
    }

    /// Competition score: each result's multiplier times how often it occurred.
    pub fn score(&self) -> i64 {
        ResultCode::ALL
            .iter()
            .map(|&code| code.value() * i64::from(self.count(code)))
            .sum()
    }

    /// Store one game. Without an explicit result it is derived from `points`.
    pub fn update(&mut self, points: i64, result: Option<ResultCode>) {
        let result = result.unwrap_or_else(|| ResultCode::from_points(points, false).0);
        *self.count_mut(result) += 1;
        self.points += points;
    }

    /// Ranking order: by [`score`](Record::score), and only when the scores
    /// are exactly equal, by raw points.
    pub fn competition_cmp(&self, other: &Record) -> Ordering {
        match self.score().cmp(&other.score()) {
            Ordering::Equal => self.points.cmp(&other.points),
            unequal => unequal,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Record(win={}, tie={}, lost={}, error={}, points={})",
            self.win, self.tie, self.lost, self.error, self.points
        )
    }
}

impl AddAssign for Record {
    fn add_assign(&mut self, other: Record) {
        self.win += other.win;
        self.tie += other.tie;
        self.lost += other.lost;
        self.error += other.error;
        self.points += other.points;
    }
}

impl Add for Record {
    type Output = Record;

    fn add(mut self, other: Record) -> Record {
        self += other;
        self
    }
}

impl Sum for Record {
    fn sum<I: Iterator<Item = Record>>(iter: I) -> Record {
        iter.fold(Record::new(), Add::add)
    }
}

impl<'a> Sum<&'a Record> for Record {
    fn sum<I: Iterator<Item = &'a Record>>(iter: I) -> Record {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod result_tests;
