//! Tracing setup for the two front-ends.
//!
//! The terminal window owns stderr (alternate screen), so it logs to a file.
//! The one-shot `ask` command logs to stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use tracing::Level;

/// Environment variable holding the log level (`error`, `warn`, `info`, `debug`, `trace`)
pub const LOG_ENV_VAR: &str = "QUICKPROMPT_LOG";

pub fn parse_level(value: Option<&str>, default: Level) -> Level {
    value
        .and_then(|v| v.trim().parse::<Level>().ok())
        .unwrap_or(default)
}

fn level_from_env(default: Level) -> Level {
    parse_level(std::env::var(LOG_ENV_VAR).ok().as_deref(), default)
}

pub fn log_file_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?;
    Ok(data_dir.join("quickprompt").join("quickprompt.log"))
}

/// Log to stderr. Safe to call more than once; later calls are no-ops.
pub fn setup_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_from_env(Level::WARN))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Append logs to the log file, returning its path.
pub fn setup_file_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let _ = tracing_subscriber::fmt()
        .with_max_level(level_from_env(Level::INFO))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(path)
}
