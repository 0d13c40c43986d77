//! File-backed logging setup.
//!
//! The terminal is owned by the TUI for the whole session, so log
//! output goes to a file under the user data directory instead of
//! stderr. Level filtering follows `RUST_LOG`, defaulting to `info`.

use std::fs;

use anyhow::{Context, Result};
use env_logger::{Env, Target};

const LOG_FILE_NAME: &str = "pgpreload.log";

pub fn init() -> Result<()> {
    let data_dir = dirs::data_dir()
        .context("cannot locate the user data directory")?
        .join("pgpreload");
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    let log_file = data_dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_file)
        .with_context(|| format!("opening {} for writing", log_file.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}
