//! Value types exchanged between the runner, engines and agents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A move an agent can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    North,
    South,
    East,
    West,
    Stop,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::North,
        Action::South,
        Action::East,
        Action::West,
        Action::Stop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::North => "North",
            Action::South => "South",
            Action::East => "East",
            Action::West => "West",
            Action::Stop => "Stop",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of a pairing something belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    /// Side of the agent at `index` in an interleaved agent list.
    #[inline]
    pub fn of_agent(index: usize) -> Side {
        if index % 2 == 0 {
            Side::Home
        } else {
            Side::Away
        }
    }
}

/// What an agent gets to see of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Index of the agent being asked, in the interleaved agent list
    pub agent_index: usize,
    pub turn: u32,
    pub moves_left: u32,
    /// Current score, home minus away
    pub score: i64,
    pub legal_actions: Vec<Action>,
    /// Name of the layout being played
    pub layout: String,
}

impl GameState {
    pub fn side(&self) -> Side {
        Side::of_agent(self.agent_index)
    }
}

/// Extra options handed to every team factory.
///
/// Parsed from `key1=value1,key2=value2`; a bare key is stored with the
/// value `"1"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentArgs(BTreeMap<String, String>);

impl AgentArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(spec: &str) -> Self {
        let mut args = Self::new();
        for piece in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match piece.split_once('=') {
                Some((key, value)) => args.insert(key.trim(), value.trim()),
                None => args.insert(piece, "1"),
            }
        }
        args
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for AgentArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// Where the engine gets the map for a game from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutSpec {
    /// A layout loaded from disk.
    Map { name: String, rows: Vec<String> },
    /// Let the engine generate a layout, optionally from a fixed seed.
    Random { seed: Option<u64> },
}

impl LayoutSpec {
    pub fn name(&self) -> String {
        match self {
            LayoutSpec::Map { name, .. } => name.clone(),
            LayoutSpec::Random { seed: Some(seed) } => format!("RANDOM{seed}"),
            LayoutSpec::Random { seed: None } => "RANDOM".to_string(),
        }
    }
}

/// Display mode forwarded to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayKind {
    #[default]
    Normal,
    /// Minimal output, no graphics.
    Quiet,
    /// Like `Quiet`, and agent output is suppressed too.
    SuperQuiet,
}

impl DisplayKind {
    pub fn mutes_agents(self) -> bool {
        matches!(self, DisplayKind::SuperQuiet)
    }

    pub fn is_null(self) -> bool {
        !matches!(self, DisplayKind::Normal)
    }
}
