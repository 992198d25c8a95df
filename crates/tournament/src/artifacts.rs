//! Run directories, per-match scratch directories and replay relocation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use arena_core::REPLAY_PREFIX;
use chrono::{DateTime, Local};
use tempfile::TempDir;

/// Directory name format of a run inside the results directory.
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d.%H-%M-%S";

/// Create (or reuse) `<results_root>/<timestamp>`.
pub fn run_directory(results_root: &Path, started: &DateTime<Local>) -> io::Result<PathBuf> {
    let dir = results_root.join(started.format(TIMESTAMP_FMT).to_string());
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Team names end up in file names; keep them to one path component.
pub fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// Fresh, uniquely named directory for one match's engine artifacts.
pub fn scratch_dir(match_no: usize, home: &str, away: &str) -> io::Result<TempDir> {
    tempfile::Builder::new()
        .prefix(&format!(
            "arena-{}-{}-{}-",
            match_no,
            file_safe(home),
            file_safe(away)
        ))
        .tempdir()
}

/// Move `replay-*` files out of `scratch` into `output_dir`, renamed to
/// `<home>-<away>-<suffix>`. Returns the new paths.
pub fn relocate_replays(
    scratch: &Path,
    output_dir: &Path,
    home: &str,
    away: &str,
) -> io::Result<Vec<PathBuf>> {
    let match_name = format!("{}-{}", file_safe(home), file_safe(away));
    let prefix = format!("{REPLAY_PREFIX}-");

    let mut moved = Vec::new();
    for entry in fs::read_dir(scratch)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(suffix) = file_name
            .to_str()
            .and_then(|name| name.strip_prefix(&prefix))
        else {
            continue;
        };
        let target = output_dir.join(format!("{match_name}-{suffix}"));
        move_file(&entry.path(), &target)?;
        moved.push(target);
    }
    moved.sort();
    Ok(moved)
}

/// `rename`, falling back to copy + delete across filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod artifacts_tests;
