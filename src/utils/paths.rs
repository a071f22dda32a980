//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Everything StudyLink writes lives under ~/.studylink/.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the StudyLink directory (~/.studylink/)
pub fn studylink_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".studylink"))
}

/// Get the config file path (~/.studylink/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(studylink_dir()?.join("config.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the StudyLink directory, creating if it doesn't exist
pub fn ensure_studylink_dir() -> AppResult<PathBuf> {
    let path = studylink_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
