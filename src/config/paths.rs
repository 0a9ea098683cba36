//! Platform-specific configuration paths.

use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV: &str = "VOXSHIFT_CONFIG";

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/voxshift/`
/// - macOS: `~/Library/Application Support/voxshift/`
/// - Windows: `%APPDATA%\voxshift\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
///
/// `VOXSHIFT_CONFIG` takes precedence over the platform location.
pub fn config_file_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(config_dir()?.join("config.toml"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_mentions_app_name() {
        let path = config_dir().unwrap();
        assert!(path.to_string_lossy().contains(APP_NAME));
    }

    #[test]
    fn test_config_file_path_is_toml() {
        let path = config_file_path().unwrap();
        assert!(path.extension().is_some_and(|ext| ext == "toml"));
    }
}
