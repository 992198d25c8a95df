//! Error types for the tournament runner
//!
//! Only failures that abort a run live here. Problems with submissions are
//! recorded as [`Disqualification`](crate::Disqualification)s and agent
//! construction failures as `ERROR` results; neither is ever an `Err`.

use std::any::Any;

use arena_core::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Configuration error in `{field}`: {message}")]
    Configuration { message: String, field: String },

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Match {match_no} ({home} vs {away}): {source}")]
    Engine {
        match_no: usize,
        home: String,
        away: String,
        source: EngineError,
    },

    #[error("Worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },

    #[error("Worker channels closed before every worker finished")]
    WorkerDisconnected,
}

impl TournamentError {
    pub(crate) fn config(field: &str, message: impl Into<String>) -> Self {
        TournamentError::Configuration {
            message: message.into(),
            field: field.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TournamentError>;

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
