//! # Configuration
//!
//! Autosave configuration is managed by [`confique`], which handles layered
//! loading from TOML files, environment variables, and programmatic
//! overrides. The embedding editor decides where the file lives and merges
//! the layers; this crate only defines the schema and defaults.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `enabled` | `false` | Whether the autosave timer runs at all |
//! | `interval_ms` | `60000` | Milliseconds between autosave passes |

use crate::error::{AutosaveError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the autosave scheduler, stored under an `[autosave]`
/// table in the embedder's config file.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Whether periodic autosave is active.
    #[config(default = false)]
    pub enabled: bool,

    /// Milliseconds between autosave passes. Must be positive.
    #[config(default = 60000)]
    pub interval_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: 60_000,
        }
    }
}

impl AutosaveConfig {
    /// The configured interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Reject configurations the scheduler would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(AutosaveError::InvalidInterval);
        }
        Ok(())
    }
}
