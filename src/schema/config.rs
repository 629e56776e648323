//! Configuration types for Game of Life universes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Seed;

/// Simulation backend. Both produce bit-identical generations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Word-packed, pass-structured kernel (parallel on native targets).
    #[default]
    Kernel,
    /// Plain per-cell fallback over the packed byte buffer.
    Scalar,
}

/// Top-level universe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Simulation backend.
    #[serde(default)]
    pub backend: Backend,
    /// Initial generation.
    #[serde(default)]
    pub seed: Seed,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            backend: Backend::default(),
            seed: Seed::default(),
        }
    }
}

impl UniverseConfig {
    /// Total cell count, or `None` if `width * height` overflows.
    #[inline]
    pub fn grid_size(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.grid_size().is_none() {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Grid {width}x{height} has more cells than fit in memory")]
    GridTooLarge { width: usize, height: usize },
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}
