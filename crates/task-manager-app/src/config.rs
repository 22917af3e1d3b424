//! Server configuration shared by the HTTP server and the CLI.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Configuration file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "task-manager.toml";
/// Environment variable overriding [`ServerConfig::data_directory`].
pub const ENV_DATA_DIR: &str = "TASK_MANAGER_DATA_DIR";
/// Environment variable overriding [`ServerConfig::bind_address`].
pub const ENV_BIND: &str = "TASK_MANAGER_BIND";
/// Environment variable overriding [`ServerConfig::cors_allowed_origins`] (comma-separated).
pub const ENV_CORS_ORIGINS: &str = "TASK_MANAGER_CORS_ORIGINS";

const DEFAULT_DATA_DIRECTORY: &str = "Data";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5239";

/// Server configuration loaded from `task-manager.toml` and the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Directory holding `tasks.json`.
    pub data_directory: PathBuf,
    /// Socket address the HTTP server listens on.
    pub bind_address: String,
    /// Origins allowed by CORS; `None` allows any origin.
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from(DEFAULT_DATA_DIRECTORY),
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            cors_allowed_origins: None,
        }
    }
}

impl ServerConfig {
    /// Resolve configuration from an optional file and the process environment.
    ///
    /// An explicit `path` must exist. Without one, `task-manager.toml` in the
    /// working directory is used when present.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse configuration from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns an error on malformed TOML or unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides looked up by environment variable name.
    ///
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(dir) = value(ENV_DATA_DIR) {
            self.data_directory = PathBuf::from(dir.trim());
        }
        if let Some(bind) = value(ENV_BIND) {
            bind.trim().clone_into(&mut self.bind_address);
        }
        if let Some(origins) = value(ENV_CORS_ORIGINS) {
            self.cors_allowed_origins = Some(
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_owned)
                    .collect(),
            );
        }
    }

    /// Check invariants that serde cannot express.
    ///
    /// # Errors
    /// Returns an error when the data directory or bind address is blank.
    pub fn validate(&self) -> Result<()> {
        if self.data_directory.as_os_str().is_empty()
            || self.data_directory.to_string_lossy().trim().is_empty()
        {
            bail!("data_directory must not be empty");
        }
        if self.bind_address.trim().is_empty() {
            bail!("bind_address must not be empty");
        }
        Ok(())
    }
}
