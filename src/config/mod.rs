//! Configuration management for satchel

pub mod schema;

pub use schema::{Backend, Config};

use crate::error::{SatchelError, SatchelResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
///
/// Resolves where the config file and the state directory live. Both can be
/// overridden so a whole invocation can be pointed at a scratch location.
pub struct ConfigManager {
    config_path: PathBuf,
    state_dir: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default paths
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            state_dir: Self::default_state_dir(),
        }
    }

    /// Create a config manager with a custom config path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            state_dir: Self::default_state_dir(),
        }
    }

    /// Override the state directory
    pub fn with_state_dir(mut self, dir: PathBuf) -> Self {
        self.state_dir = dir;
        self
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("satchel")
            .join("config.toml")
    }

    /// Get the default state directory path
    pub fn default_state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("satchel")
    }

    /// Get the state directory path
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Get the sessions directory path
    pub fn sessions_dir(&self) -> PathBuf {
        self.state_dir.join("sessions")
    }

    /// Get the cookie jar path
    pub fn cookie_path(&self) -> PathBuf {
        self.state_dir.join("cookie")
    }

    /// Get the audit log path
    pub fn audit_log_path(&self) -> PathBuf {
        self.state_dir.join("audit.log")
    }

    /// Load configuration, falling back to defaults if not present
    pub async fn load(&self) -> SatchelResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> SatchelResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| SatchelError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| SatchelError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> SatchelResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            SatchelError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> SatchelResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SatchelError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Ensure all state directories exist
    pub async fn ensure_state_dirs(&self) -> SatchelResult<()> {
        let dirs = [self.state_dir.clone(), self.sessions_dir()];

        for dir in &dirs {
            fs::create_dir_all(dir).await.map_err(|e| {
                SatchelError::io(format!("creating directory {}", dir.display()), e)
            })?;
        }

        // Session files may hold credentials; keep them private
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(self.sessions_dir(), perms)
                .map_err(|e| SatchelError::io("setting sessions dir permissions", e))?;
        }

        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
