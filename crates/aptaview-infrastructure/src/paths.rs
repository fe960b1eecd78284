//! Platform path resolution.

use std::path::PathBuf;

use aptaview_core::error::{AptaError, Result};

/// Resolves aptaview's on-disk locations.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/aptaview/          # Linux (platform-dependent elsewhere)
/// └── settings.toml            # Persisted user settings
/// ```
pub struct AptaviewPaths;

impl AptaviewPaths {
    /// The aptaview configuration directory for this platform.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("aptaview"))
            .ok_or_else(|| AptaError::config("cannot determine the user configuration directory"))
    }

    /// Where user settings are persisted.
    pub fn settings_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("settings.toml"))
    }
}
