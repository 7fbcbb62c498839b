//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use trellis::{TrellisError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for TrellisError {
    fn from(err: ConfigError) -> Self {
        TrellisError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (trellis/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// The loaded configuration is validated before it is returned.
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - A configured value is out of range
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, TrellisError> {
    let config = find_config(explicit_path)?;
    config.validate()?;
    Ok(config)
}

fn find_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, TrellisError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("trellis/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "trellis", "trellis") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, TrellisError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis::config::Orientation;

    #[test]
    fn test_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout]\norientation = \"top-to-bottom\"\nmargin = 10\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.layout().orientation(), Orientation::TopToBottom);
        assert_eq!(config.layout().margin(), 10.0);
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(dir.path().join("absent.toml")));
        match result {
            Err(TrellisError::Config(message)) => assert!(message.contains("absent.toml")),
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout]\nrank_spacing = \"wide\"\n").unwrap();

        assert!(matches!(load_config(Some(&path)), Err(TrellisError::Config(_))));
    }

    #[test]
    fn test_out_of_range_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout]\nnode_spacing = -5\n").unwrap();

        assert!(matches!(load_config(Some(&path)), Err(TrellisError::Config(_))));
    }
}
