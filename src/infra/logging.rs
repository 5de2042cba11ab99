use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "SWATCHBOX_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum InitLoggingError {
    #[error("failed to open log file {path}: {source}")]
    OpenFile { path: String, source: io::Error },

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

pub fn log_path(state_dir: &Path) -> PathBuf {
    state_dir.join("swatchbox.log")
}

/// Appends plain-text log lines to `<state_dir>/swatchbox.log`.
///
/// The terminal belongs to the UI, so nothing is written to stderr. The
/// filter comes from `SWATCHBOX_LOG` (e.g. `swatchbox=debug`), default `info`.
pub fn init_logging(state_dir: &Path) -> Result<PathBuf, InitLoggingError> {
    let path = log_path(state_dir);
    let open_error = |source: io::Error| InitLoggingError::OpenFile {
        path: path.display().to_string(),
        source,
    };
    fs::create_dir_all(state_dir).map_err(open_error)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(open_error)?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|error| InitLoggingError::Install(error.to_string()))?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(path)
}
