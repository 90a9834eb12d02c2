use crate::{ResolverError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".sourcemap-resolver.toml";

/// Directory under the user config dir holding `config.toml`
pub const USER_CONFIG_DIR: &str = "sourcemap-resolver";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub resolve: ResolveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Default output format ("text" or "json")
    #[serde(default)]
    pub format: Option<String>,
    /// Show the original source line next to each resolution
    #[serde(default)]
    pub context: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ResolveConfig {
    /// Only resolve stack frames whose file contains this text
    #[serde(default)]
    pub only_file: Option<String>,
}

impl Config {
    /// Load configuration from the project root, then the user config dir
    pub fn load() -> Result<Self> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path).map_err(|e| {
            ResolverError::FileError(format!(
                "Failed to read config file {:?}: {}",
                config_path, e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            ResolverError::FileError(format!(
                "Failed to parse TOML config from {:?}: {}",
                config_path, e
            ))
        })?;

        crate::logging::log_config_loaded(&config_path.to_string_lossy());
        Ok(config)
    }

    /// Load default config if file is missing or unreadable
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Warning: Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    }

    fn locate() -> Option<PathBuf> {
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Some(local.to_path_buf());
        }
        let user = dirs::config_dir()?.join(USER_CONFIG_DIR).join("config.toml");
        user.exists().then_some(user)
    }
}
