//! Configuration file store.
//!
//! Reads and rewrites the `key = 'value'` assignments of
//! `postgresql.conf` / `postgresql.auto.conf`, and keeps a snapshot of
//! every save under the user's home directory so the last configuration
//! can be re-applied without the UI (`--last`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::catalog::{PreloadFields, FIELD_KEYS};

/// Snapshot of the last save, in the user's home directory.
pub const SNAPSHOT_FILE_NAME: &str = ".pgpreload.last";

/// Strip a trailing `#` comment and surrounding whitespace.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => line[..pos].trim(),
        None => line.trim(),
    }
}

/// Parse one `key = 'value'` assignment. Lines that do not split into
/// exactly one key and one value (comments, includes, blanks, values
/// containing `=`) are skipped.
fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    let stripped = strip_comment(line);
    let mut parts = stripped.split('=');
    let name = parts.next()?;
    let value = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((name.trim(), value.trim_matches(|c| c == ' ' || c == '\'')))
}

/// Whether a line assigns one of the three preload keys.
fn is_preload_line(line: &str) -> bool {
    let trimmed = line.trim();
    FIELD_KEYS.iter().any(|key| trimmed.starts_with(key))
}

/// Read the recognized preload assignments from `path` into `fields`.
/// Later assignments win. A missing file is not an error; unknown keys
/// and malformed values pass through untouched.
pub fn read_preload_values(path: &Path, fields: &mut PreloadFields) -> Result<()> {
    if !path.is_file() {
        return Ok(());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    for line in content.lines() {
        if let Some((key, value)) = parse_assignment(line) {
            fields.set_by_key(key, value);
        }
    }
    Ok(())
}

/// Look up a single setting in a configuration file. Used during
/// discovery for `data_directory`. Last assignment wins.
pub fn read_setting(path: &Path, key: &str) -> Result<Option<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut found = None;
    for line in content.lines() {
        if let Some((name, value)) = parse_assignment(line) {
            if name == key {
                found = Some(value.to_string());
            }
        }
    }
    Ok(found)
}

/// Rewrite `target` keeping every non-preload line verbatim and in
/// order, with the given assignment lines appended at end-of-file. Old
/// preload assignments are dropped, not updated in place.
fn rewrite_with_assignments(target: &Path, assignments: &[String]) -> Result<()> {
    let content =
        fs::read_to_string(target).with_context(|| format!("reading {}", target.display()))?;
    let mut out = String::with_capacity(content.len());
    for line in content.lines().filter(|l| !is_preload_line(l)) {
        out.push_str(line);
        out.push('\n');
    }
    for line in assignments {
        out.push_str(line);
        out.push('\n');
    }
    fs::write(target, out).with_context(|| format!("writing {}", target.display()))
}

/// Persists the three preload values into `postgresql.auto.conf` and
/// records each save in the snapshot file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    target: PathBuf,
    snapshot: PathBuf,
}

impl ConfigStore {
    pub fn new(target: PathBuf, snapshot: PathBuf) -> Self {
        Self { target, snapshot }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Default snapshot location, `~/.pgpreload.last`.
    pub fn default_snapshot_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(SNAPSHOT_FILE_NAME))
    }

    /// Write the three assignments into the target file and record the
    /// snapshot. Reports failure to the caller; the file may have been
    /// partially updated when the snapshot write fails.
    pub fn save(&self, fields: &PreloadFields) -> Result<()> {
        let assignments = fields.assignment_lines();
        rewrite_with_assignments(&self.target, &assignments)?;

        let mut snapshot = format!("{}\n", self.target.display());
        for line in &assignments {
            snapshot.push_str(line);
            snapshot.push('\n');
        }
        fs::write(&self.snapshot, snapshot)
            .with_context(|| format!("writing {}", self.snapshot.display()))
    }
}

/// Re-apply the configuration recorded by the last save: rewrite the
/// recorded target with the recorded assignment lines, echoing what was
/// applied. No UI.
pub fn replay_last(snapshot: &Path) -> Result<()> {
    let content = fs::read_to_string(snapshot)
        .with_context(|| format!("no saved configuration at {}", snapshot.display()))?;
    let mut lines = content.lines();
    let target = lines
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .with_context(|| format!("{} does not name a target file", snapshot.display()))?;
    let target = Path::new(target);

    let mut out = String::new();
    if target.is_file() {
        let current =
            fs::read_to_string(target).with_context(|| format!("reading {}", target.display()))?;
        for line in current.lines().filter(|l| !is_preload_line(l)) {
            out.push_str(line);
            out.push('\n');
        }
    }
    for line in lines {
        out.push_str(line);
        out.push('\n');
        println!("{line}");
    }
    fs::write(target, out).with_context(|| format!("writing {}", target.display()))
}
