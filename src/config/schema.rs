//! Configuration schema for satchel
//!
//! Configuration is stored at `~/.config/satchel/config.toml`

use crate::session::NestingPolicy;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Session store settings
    pub session: SessionConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,

    /// Record session lifecycle events in the audit log
    pub audit_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
            audit_log: true,
        }
    }
}

/// Where session maps live between requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per session under the state directory
    #[default]
    File,
    /// Process-local map, lost on exit
    Memory,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::File => "file",
            Backend::Memory => "memory",
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minutes since `session_start` after which gc closes the session
    pub max_lifetime_minutes: u32,

    /// How dotted keys are resolved for write and destroy
    pub nesting: NestingPolicy,

    /// Session transport backend
    pub backend: Backend,

    /// Run gc on every attach
    pub auto_gc: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_lifetime_minutes: 1,
            nesting: NestingPolicy::default(),
            backend: Backend::default(),
            auto_gc: false,
        }
    }
}
