//! Tracing initialisation for the tournament binary.
//!
//! Call [`init_tracing`] once at program start. Console output captured from
//! engines arrives under the `stdout` and `stderr` targets, so targets are
//! kept in every line.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// * `json` emits newline-delimited JSON lines.
/// * `level` is the verbosity used when `RUST_LOG` is not set.
/// * `log_file`, when given, is truncated and receives all output instead
///   of stderr.
///
/// Only the first call in a process takes effect.
pub fn init_tracing(json: bool, level: Level, log_file: Option<&Path>) -> io::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let (writer, ansi) = match log_file {
        Some(path) => (BoxMakeWriter::new(Mutex::new(File::create(path)?)), false),
        None => (BoxMakeWriter::new(io::stderr), true),
    };

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(writer).with_ansi(false).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(writer).with_ansi(ansi))
            .try_init()
            .ok();
    }
    Ok(())
}

/// Parse a `--log-level` value, falling back to `INFO`.
pub fn parse_level(level: &str) -> Level {
    level.parse().unwrap_or(Level::INFO)
}
