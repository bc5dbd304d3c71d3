use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Sizing for a [`CirculationEngine`](crate::CirculationEngine).
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```json
/// { "borrow_capacity": 20 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum pending borrow requests
    pub borrow_capacity: usize,
    /// Maximum pending returns
    pub return_capacity: usize,
    /// How many recent events the activity journal keeps
    pub journal_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { borrow_capacity: 100, return_capacity: 100, journal_capacity: 100 }
    }
}

impl EngineConfig {
    /// Load and validate a JSON config file
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - The file cannot be read
    /// - The contents are not a valid config object
    /// - A capacity is zero
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply per-field capacity overrides, then validate the result.
    ///
    /// `None` keeps the current value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if an override (or a kept value) is zero.
    pub fn with_overrides(
        mut self,
        borrow_capacity: Option<usize>,
        return_capacity: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if let Some(capacity) = borrow_capacity {
            self.borrow_capacity = capacity;
        }
        if let Some(capacity) = return_capacity {
            self.return_capacity = capacity;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the engine can run with these values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first zero capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("borrow_capacity", self.borrow_capacity),
            ("return_capacity", self.return_capacity),
            ("journal_capacity", self.journal_capacity),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid { field, reason: "must be at least 1".to_string() });
            }
        }
        Ok(())
    }
}
