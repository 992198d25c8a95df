//! Round-robin tournament runner for arena agents
//!
//! This crate provides infrastructure for:
//! - Validating submitted team factories
//! - Scheduling every pairing of the qualified teams
//! - Playing the pairings on a pool of worker threads
//! - Aggregating game results into a ranked scoreboard
//!
//! # Usage
//!
//! Run from the workspace root: the default layout `defaultCapture` is read
//! from `layouts/defaultCapture.lay`.
//!
//! ```bash
//! # Run the demo roster with four workers, three games per pairing
//! cargo run -p tournament -- --demo-teams 5 -T 4 -n 3
//!
//! # Same, on a generated layout and with a fixed seed
//! cargo run -p tournament -- --demo-teams 5 -l RANDOM42 -f
//! ```

pub mod artifacts;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod pool;
pub mod report;
pub mod result;
pub mod scheduler;
pub mod scoreboard;
pub mod tournament;
pub mod validator;
pub mod worker;

pub use config::*;
pub use error::{Result, TournamentError};
pub use layout::LayoutPlan;
pub use pool::WorkerPool;
pub use report::*;
pub use result::*;
pub use scheduler::*;
pub use scoreboard::*;
pub use tournament::*;
pub use validator::*;
pub use worker::*;
