//! Per-move time budgets for agents.
//!
//! Engines start a [`MoveClock`] before asking an agent for an action and
//! check it afterwards. Exceeding the budget does not interrupt the agent;
//! it is reported as a timeout on the finished game.

use std::time::{Duration, Instant};

/// Stopwatch for a single agent decision.
#[derive(Debug, Clone)]
pub struct MoveClock {
    /// Time allowed per move (None = infinite)
    budget: Option<Duration>,
    started: Option<Instant>,
}

impl MoveClock {
    pub fn new(budget: Option<Duration>) -> Self {
        Self {
            budget,
            started: None,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Start (or restart) the clock.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Time since the last `start`, zero if never started.
    pub fn elapsed(&self) -> Duration {
        self.started
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// True once the elapsed time is at or past the budget.
    pub fn exceeded(&self) -> bool {
        match (self.budget, self.started) {
            (Some(budget), Some(start)) => start.elapsed() >= budget,
            _ => false,
        }
    }

    /// Get remaining time (None if no limit).
    pub fn remaining(&self) -> Option<Duration> {
        let budget = self.budget?;
        Some(budget.saturating_sub(self.elapsed()))
    }
}

impl Default for MoveClock {
    fn default() -> Self {
        Self::unlimited()
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
