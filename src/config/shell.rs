//! Shell session configuration

use super::{parse_env_bool, parse_env_var, Config, ContainerConfig, ValidationError};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Database file used when no path is configured
pub const DEFAULT_DATABASE_PATH: &str = "database.txt";

/// Configuration of an interactive or batch shell session.
///
/// # Examples
///
/// ```rust
/// use dsdb::config::{Config, ShellConfig};
///
/// let config = ShellConfig::default()
///     .with_database_path("/tmp/my.db")
///     .with_auto_save(false);
/// assert!(config.validate().is_ok());
/// assert!(!config.auto_save);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// File used by autoload/autosave and by `SAVE`/`LOAD` without an argument
    pub database_path: PathBuf,
    /// Load the database file when the session starts
    pub auto_load: bool,
    /// Save the database after every mutating command and at shutdown
    pub auto_save: bool,
    /// Prompt printed before each interactive line
    pub prompt: String,
    /// Print the greeting and the exit summary
    pub show_banner: bool,
    /// Capacities for containers created by the session
    pub containers: ContainerConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            auto_load: true,
            auto_save: true,
            prompt: "> ".to_string(),
            show_banner: true,
            containers: ContainerConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Set the database path
    pub fn with_database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = path.into();
        self
    }

    /// Enable or disable loading at startup
    pub fn with_auto_load(mut self, enabled: bool) -> Self {
        self.auto_load = enabled;
        self
    }

    /// Enable or disable saving after mutations
    pub fn with_auto_save(mut self, enabled: bool) -> Self {
        self.auto_save = enabled;
        self
    }

    /// Enable or disable the banner
    pub fn with_banner(mut self, enabled: bool) -> Self {
        self.show_banner = enabled;
        self
    }
}

impl Config for ShellConfig {
    const NAME: &'static str = "shell";

    fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ValidationError::new("database_path", "", "path must not be empty")
                .with_suggestion(DEFAULT_DATABASE_PATH)
                .into());
        }
        self.containers.validate()
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.database_path = parse_env_var(
            &format!("{}DATABASE_PATH", prefix),
            config.database_path,
        );
        config.auto_load = parse_env_bool(&format!("{}AUTO_LOAD", prefix), config.auto_load);
        config.auto_save = parse_env_bool(&format!("{}AUTO_SAVE", prefix), config.auto_save);
        config.prompt = parse_env_var(&format!("{}PROMPT", prefix), config.prompt);
        config.show_banner = parse_env_bool(&format!("{}SHOW_BANNER", prefix), config.show_banner);
        config.containers = ContainerConfig::from_env_with_prefix(prefix)?;
        config.validate()?;
        Ok(config)
    }
}
