//! Capacity defaults for newly created containers

use super::{parse_env_var, Config, ValidationError};
use crate::containers::array::{DEFAULT_CAPACITY, MIN_CAPACITY};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Capacity used when the store creates an array, stack or queue.
///
/// Containers loaded from a database file are sized from the element count
/// recorded in the file instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Initial buffer capacity for `*CREATE` commands
    pub default_capacity: usize,
    /// Lower bound applied to every requested capacity
    pub min_capacity: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            default_capacity: DEFAULT_CAPACITY,
            min_capacity: MIN_CAPACITY,
        }
    }
}

impl ContainerConfig {
    /// Capacity to allocate for a requested size
    #[inline]
    pub fn capacity_for(&self, requested: usize) -> usize {
        requested.max(self.min_capacity)
    }

    /// Capacity for a freshly created container
    #[inline]
    pub fn initial_capacity(&self) -> usize {
        self.capacity_for(self.default_capacity)
    }
}

impl Config for ContainerConfig {
    const NAME: &'static str = "container";

    fn validate(&self) -> Result<()> {
        if self.min_capacity < MIN_CAPACITY {
            return Err(ValidationError::new(
                "min_capacity",
                &self.min_capacity.to_string(),
                "capacity must be at least 1 so doubling makes progress",
            )
            .with_suggestion("1..")
            .into());
        }
        if self.default_capacity < self.min_capacity {
            return Err(ValidationError::new(
                "default_capacity",
                &self.default_capacity.to_string(),
                "default_capacity must not be smaller than min_capacity",
            )
            .with_suggestion(&format!("{}..", self.min_capacity))
            .into());
        }
        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.default_capacity =
            parse_env_var(&format!("{}DEFAULT_CAPACITY", prefix), config.default_capacity);
        config.min_capacity = parse_env_var(&format!("{}MIN_CAPACITY", prefix), config.min_capacity);
        config.validate()?;
        Ok(config)
    }
}
