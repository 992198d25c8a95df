//! Worker pool and result collection
//!
//! The pool owns the worker threads and the receiving ends of the result
//! and completion channels. The coordinating thread calls
//! [`WorkerPool::drain_into`] to fold outcomes into the scoreboard while
//! workers are running and to retire workers as they finish.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use arena_core::GameEngine;
use crossbeam_channel::{unbounded, Receiver, TryRecvError};

use crate::config::TournamentConfig;
use crate::error::{panic_message, Result, TournamentError};
use crate::layout::LayoutPlan;
use crate::scheduler::PairingQueue;
use crate::scoreboard::Scoreboard;
use crate::worker::{GameOutcome, Worker};

/// Pause between coordinator polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct WorkerPool {
    handles: BTreeMap<usize, JoinHandle<Result<()>>>,
    results: Receiver<GameOutcome>,
    done: Receiver<usize>,
}

impl WorkerPool {
    /// Start `size` workers sharing one pairing queue.
    pub fn spawn(
        size: usize,
        config: Arc<TournamentConfig>,
        layouts: Arc<LayoutPlan>,
        engine: Arc<dyn GameEngine>,
        output_dir: PathBuf,
        queue: PairingQueue,
    ) -> Result<Self> {
        let (results_tx, results) = unbounded();
        let (done_tx, done) = unbounded();

        let mut handles = BTreeMap::new();
        for id in 0..size {
            let worker = Worker {
                id,
                config: Arc::clone(&config),
                layouts: Arc::clone(&layouts),
                engine: Arc::clone(&engine),
                output_dir: output_dir.clone(),
                queue: queue.clone(),
                results: results_tx.clone(),
                done: done_tx.clone(),
            };
            let handle = thread::Builder::new()
                .name(format!("arena-worker-{id}"))
                .spawn(move || worker.run())?;
            handles.insert(id, handle);
        }
        tracing::info!(workers = size, pairings = queue.total(), "Worker pool started");

        // Only the workers hold senders from here on, so both channels
        // disconnect once every worker is gone.
        drop(results_tx);
        drop(done_tx);

        Ok(Self {
            handles,
            results,
            done,
        })
    }

    /// Workers that have not been retired yet.
    pub fn active(&self) -> usize {
        self.handles.len()
    }

    /// Record outcomes as they arrive until every worker has finished.
    ///
    /// The first worker error or panic aborts the wait and is returned. The
    /// remaining workers are left to finish on their own.
    pub fn drain_into(mut self, scoreboard: &Scoreboard) -> Result<()> {
        while !self.handles.is_empty() {
            self.collect(scoreboard);
            loop {
                match self.done.try_recv() {
                    Ok(id) => self.retire(id)?,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        if self.handles.is_empty() {
                            break;
                        }
                        return Err(TournamentError::WorkerDisconnected);
                    }
                }
            }
            if !self.handles.is_empty() {
                thread::sleep(POLL_INTERVAL);
            }
        }
        // Outcomes sent right before a worker's completion signal.
        self.collect(scoreboard);
        Ok(())
    }

    fn collect(&self, scoreboard: &Scoreboard) {
        for outcome in self.results.try_iter() {
            scoreboard.add_outcome(&outcome);
        }
    }

    fn retire(&mut self, id: usize) -> Result<()> {
        let Some(handle) = self.handles.remove(&id) else {
            return Ok(());
        };
        match handle.join() {
            Ok(Ok(())) => {
                tracing::debug!(worker = id, remaining = self.handles.len(), "Worker finished");
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::error!(worker = id, "Worker failed: {e}");
                Err(e)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(worker = id, "Worker panicked: {message}");
                Err(TournamentError::WorkerPanicked {
                    worker: id,
                    message,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod pool_tests;
