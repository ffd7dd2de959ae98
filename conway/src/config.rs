// config.rs - Simulation settings loaded from TOML

use std::num::NonZeroU64;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, LifeError};
use crate::grid::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

pub const DEFAULT_INTERVAL_MS: NonZeroU64 = NonZeroU64::new(1000).unwrap();

/// Grid size and clock settings. Every field is optional in the file.
///
/// ```toml
/// height = 36
/// width = 54
/// interval_ms = 1000
/// stop_on_cycle = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifeConfig {
    pub height: usize,
    pub width: usize,
    pub interval_ms: NonZeroU64,
    /// Halt the clock once a generation repeats a recent one.
    pub stop_on_cycle: bool,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            interval_ms: DEFAULT_INTERVAL_MS,
            stop_on_cycle: false,
        }
    }
}

impl LifeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, falling back to defaults (with a warning) when
    /// it cannot be read or is invalid.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded config");
                config
            }
            Err(err) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), LifeError> {
        if self.height == 0 || self.width == 0 {
            return Err(LifeError::InvalidDimension {
                height: self.height,
                width: self.width,
            });
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.get())
    }
}
