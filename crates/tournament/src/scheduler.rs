//! Round-robin pairing generation

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::validator::Participant;

/// One scheduled matchup, played `games_per_match` times.
#[derive(Debug, Clone)]
pub struct Pairing {
    /// 1-based sequence number, used in logs and scratch directory names
    pub match_no: usize,
    pub home: Participant,
    pub away: Participant,
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} vs {})", self.match_no, self.home.name, self.away.name)
    }
}

/// Pre-loaded multi-consumer queue of pairings.
///
/// The queue is closed once filled, so an empty queue is final: a dequeued
/// pairing is never handed out again, whatever happens to the worker that
/// took it.
#[derive(Debug, Clone)]
pub struct PairingQueue {
    receiver: Receiver<Pairing>,
    total: usize,
}

impl PairingQueue {
    /// Queue holding exactly `pairings`, in order.
    pub fn from_pairings(pairings: Vec<Pairing>) -> Self {
        let (sender, receiver) = unbounded();
        let total = pairings.len();
        for pairing in pairings {
            // The receiver is alive in this scope, so sending cannot fail.
            let _ = sender.send(pairing);
        }
        Self { receiver, total }
    }

    /// Take the next pairing, or `None` once the queue is exhausted.
    pub fn next(&self, timeout: Duration) -> Option<Pairing> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Pairings not yet taken.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Pairings originally scheduled.
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Every unordered pair of participants exactly once, each with a random
/// home side.
pub fn make_pairings<R: Rng + ?Sized>(
    participants: &BTreeMap<String, Participant>,
    rng: &mut R,
) -> PairingQueue {
    let teams: Vec<&Participant> = participants.values().collect();

    let mut pairings = Vec::with_capacity(teams.len() * teams.len().saturating_sub(1) / 2);
    for (i, first) in teams.iter().enumerate() {
        for second in &teams[i + 1..] {
            let mut sides = [*first, *second];
            sides.shuffle(rng);
            pairings.push(Pairing {
                match_no: pairings.len() + 1,
                home: sides[0].clone(),
                away: sides[1].clone(),
            });
        }
    }

    PairingQueue::from_pairings(pairings)
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod scheduler_tests;
