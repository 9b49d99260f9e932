//! Configuration loading for linux-user
//!
//! A missing file means defaults. A file that parses but names an empty
//! identity file path, an empty tool, or a relative login shell is rejected
//! at load time instead of failing on the first mutation.

pub mod schema;

pub use schema::Config;

use crate::error::{UserError, UserResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const APP_DIR: &str = "linux-user";

/// Locates, loads and writes the configuration file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Use the per-user default location
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Use an explicit file, e.g. from `--config`
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// `<config dir>/linux-user/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Directory holding the audit log
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Audit log location when `general.audit_log_path` is unset
    pub fn audit_log_path() -> PathBuf {
        Self::state_dir().join("audit.log")
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load and check the configuration
    pub async fn load(&self) -> UserResult<Config> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "No config at {}, using defaults",
                    self.config_path.display()
                );
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(UserError::io(
                    format!("reading config from {}", self.config_path.display()),
                    e,
                ))
            }
        };

        let config: Config = toml::from_str(&content).map_err(|e| self.invalid(e.to_string()))?;
        config.check().map_err(|reason| self.invalid(reason))?;
        Ok(config)
    }

    /// Write `config`, creating the parent directory if needed
    ///
    /// A configuration that would be rejected by [`ConfigManager::load`] is
    /// never written.
    pub async fn save(&self, config: &Config) -> UserResult<()> {
        config.check().map_err(|reason| self.invalid(reason))?;

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| UserError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            UserError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration written to {}", self.config_path.display());
        Ok(())
    }

    fn invalid(&self, reason: String) -> UserError {
        UserError::ConfigInvalid {
            path: self.config_path.clone(),
            reason,
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
