//! Layout selection
//!
//! `RANDOM<seed>` asks the engine to generate a map from that seed,
//! `RANDOM` picks one of the layout files at random, anything else names a
//! layout file (`<name>.lay` or `<name>`) in the layouts directory.

use std::fs;
use std::path::Path;

use arena_core::LayoutSpec;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, TournamentError};

const RANDOM_KEYWORD: &str = "RANDOM";
const LAYOUT_EXTENSION: &str = "lay";

/// The layout every game of the tournament is played on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    spec: LayoutSpec,
}

impl LayoutPlan {
    pub fn resolve<R: Rng + ?Sized>(layout: &str, layouts_dir: &Path, rng: &mut R) -> Result<Self> {
        if let Some(seed) = layout.strip_prefix(RANDOM_KEYWORD).filter(|s| !s.is_empty()) {
            let seed = seed.parse::<u64>().map_err(|_| {
                TournamentError::config("layout", format!("`{seed}` is not a valid random seed"))
            })?;
            return Ok(Self {
                spec: LayoutSpec::Random { seed: Some(seed) },
            });
        }

        let name = if layout == RANDOM_KEYWORD {
            pick_random_layout(layouts_dir, rng)?
        } else {
            layout.to_string()
        };
        Ok(Self {
            spec: load_layout(layouts_dir, &name)?,
        })
    }

    pub fn from_spec(spec: LayoutSpec) -> Self {
        Self { spec }
    }

    pub fn name(&self) -> String {
        self.spec.name()
    }

    /// One layout per game of a pairing.
    pub fn layouts_for(&self, num_games: u32) -> Vec<LayoutSpec> {
        vec![self.spec.clone(); num_games as usize]
    }
}

fn load_layout(layouts_dir: &Path, name: &str) -> Result<LayoutSpec> {
    let candidates = [
        layouts_dir.join(format!("{name}.{LAYOUT_EXTENSION}")),
        layouts_dir.join(name),
    ];
    let path = candidates.iter().find(|p| p.is_file()).ok_or_else(|| {
        TournamentError::Layout(format!(
            "The layout '{}' cannot be found in {}",
            name,
            layouts_dir.display()
        ))
    })?;

    let rows = fs::read_to_string(path)?
        .lines()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    Ok(LayoutSpec::Map {
        name: name.to_string(),
        rows,
    })
}

fn pick_random_layout<R: Rng + ?Sized>(layouts_dir: &Path, rng: &mut R) -> Result<String> {
    let mut names = Vec::new();
    for entry in fs::read_dir(layouts_dir)? {
        let file_name = entry?.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if file_name.starts_with('.') {
            continue;
        }
        let name = file_name
            .strip_suffix(&format!(".{LAYOUT_EXTENSION}"))
            .unwrap_or(file_name);
        names.push(name.to_string());
    }
    names.sort();

    names.choose(rng).cloned().ok_or_else(|| {
        TournamentError::Layout(format!("No layouts found in {}", layouts_dir.display()))
    })
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod layout_tests;
