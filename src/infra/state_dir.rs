use dirs::home_dir;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STATE_DIR_ENV: &str = "SWATCHBOX_STATE_DIR";

#[derive(Debug, Error)]
pub enum ResolveStateDirError {
    #[error("home directory not found")]
    HomeDirNotFound,
}

/// Flag value first, then `SWATCHBOX_STATE_DIR`, then `~/.swatchbox`.
pub fn resolve_state_dir(flag: Option<&Path>) -> Result<PathBuf, ResolveStateDirError> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }

    if let Some(override_dir) = std::env::var_os(STATE_DIR_ENV) {
        if !override_dir.is_empty() {
            return Ok(PathBuf::from(override_dir));
        }
    }

    let Some(home) = home_dir() else {
        return Err(ResolveStateDirError::HomeDirNotFound);
    };
    Ok(home.join(".swatchbox"))
}
