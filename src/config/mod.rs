//! Configuration for the dsdb shell and container defaults
//!
//! The core containers, the [`Store`](crate::store::Store) and the codec never
//! read the environment; configuration is resolved once by the shell layer and
//! passed down explicitly.
//!
//! # Configuration Types
//!
//! - [`ShellConfig`]: database path, persistence policy and prompt
//! - [`ContainerConfig`]: capacity used when a container is created
//!
//! # Environment Initialization
//!
//! ```rust
//! use dsdb::config::{Config, ShellConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads DSDB_DATABASE_PATH, DSDB_AUTO_LOAD, DSDB_AUTO_SAVE, DSDB_PROMPT, ...
//! let config = ShellConfig::from_env()?;
//!
//! // Same fields with a custom prefix
//! let config = ShellConfig::from_env_with_prefix("MYSHELL_")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Files
//!
//! Every configuration round-trips through JSON with
//! [`Config::save_to_file`] and [`Config::load_from_file`].

use crate::error::{DsdbError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::env;
use std::fmt;
use std::path::Path;

pub mod container;
pub mod shell;

pub use container::ContainerConfig;
pub use shell::ShellConfig;

/// Environment prefix used by [`Config::from_env`]
pub const ENV_PREFIX: &str = "DSDB_";

/// Common configuration trait providing validation, environment
/// initialization and JSON persistence.
pub trait Config: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Short name used in error messages ("shell", "container")
    const NAME: &'static str;

    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from `DSDB_*` environment variables.
    ///
    /// Unset or unparseable variables keep their default value.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Initialize configuration from environment variables with a custom prefix.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Save configuration to a JSON file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            DsdbError::configuration(format!("Failed to serialize {} config: {}", Self::NAME, e))
        })?;
        std::fs::write(path, serialized).map_err(|e| {
            DsdbError::configuration(format!("Failed to write {} config file: {}", Self::NAME, e))
        })?;
        Ok(())
    }

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DsdbError::configuration(format!("Failed to read {} config file: {}", Self::NAME, e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            DsdbError::configuration(format!("Failed to parse {} config file: {}", Self::NAME, e))
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration validation error details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// The invalid value
    pub value: String,
    /// Description of why the value is invalid
    pub reason: String,
    /// Suggested valid values or ranges
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: &str, value: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion for valid values.
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid configuration for field '{}': value '{}' is invalid ({})",
            self.field, self.value, self.reason
        )?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". Suggested values: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for DsdbError {
    fn from(err: ValidationError) -> Self {
        DsdbError::configuration(err.to_string())
    }
}

/// Parse an environment variable, falling back to `default` when it is unset
/// or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Parse a boolean environment variable.
///
/// Accepts "true", "1", "yes", "on" (case-insensitive) as true,
/// everything else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}
