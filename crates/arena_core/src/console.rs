//! Thread-scoped console redirection.
//!
//! Agents and engines print through [`say!`](crate::say) and
//! [`warn_out!`](crate::warn_out) rather than `println!`. The runner decides,
//! per worker thread, where those lines go: the real stdout/stderr, nowhere,
//! or the `tracing` log with a match-identifying prefix.
//!
//! Redirections nest. Each one returns a [`ConsoleGuard`] that puts the
//! previous sink back when dropped, including during unwinding.

use std::cell::RefCell;
use std::io::Write;

/// Destination for console output on the current thread.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConsoleSink {
    #[default]
    Stdout,
    Muted,
    /// Route lines to `tracing`: stdout at DEBUG, stderr at WARN.
    Logged { prefix: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

thread_local! {
    static SINK: RefCell<ConsoleSink> = RefCell::new(ConsoleSink::Stdout);
}

/// Restores the previous sink on drop.
#[must_use = "the redirection ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ConsoleGuard {
    previous: Option<ConsoleSink>,
}

impl Drop for ConsoleGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            SINK.with(|sink| *sink.borrow_mut() = previous);
        }
    }
}

pub fn redirect(sink: ConsoleSink) -> ConsoleGuard {
    let previous = SINK.with(|current| current.replace(sink));
    ConsoleGuard {
        previous: Some(previous),
    }
}

/// Drop everything printed on this thread until the guard goes away.
pub fn mute() -> ConsoleGuard {
    redirect(ConsoleSink::Muted)
}

/// Send everything printed on this thread to the log, prefixed.
pub fn log_with_prefix(prefix: impl Into<String>) -> ConsoleGuard {
    redirect(ConsoleSink::Logged {
        prefix: prefix.into(),
    })
}

pub fn current() -> ConsoleSink {
    SINK.with(|sink| sink.borrow().clone())
}

pub fn write(stream: Stream, text: &str) {
    SINK.with(|sink| match &*sink.borrow() {
        ConsoleSink::Stdout => {
            // A closed stdout is not worth failing a game over.
            let _ = match stream {
                Stream::Out => writeln!(std::io::stdout().lock(), "{text}"),
                Stream::Err => writeln!(std::io::stderr().lock(), "{text}"),
            };
        }
        ConsoleSink::Muted => {}
        ConsoleSink::Logged { prefix } => {
            for line in text.trim_end().lines() {
                match stream {
                    Stream::Out => {
                        tracing::debug!(target: "stdout", "{}{}", prefix, line.trim_end())
                    }
                    Stream::Err => {
                        tracing::warn!(target: "stderr", "{}{}", prefix, line.trim_end())
                    }
                }
            }
        }
    });
}

/// `println!` for agents and engines.
#[macro_export]
macro_rules! say {
    ($($arg:tt)*) => {
        $crate::console::write($crate::console::Stream::Out, &format!($($arg)*))
    };
}

/// `eprintln!` for agents and engines.
#[macro_export]
macro_rules! warn_out {
    ($($arg:tt)*) => {
        $crate::console::write($crate::console::Stream::Err, &format!($($arg)*))
    };
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod console_tests;
