//! NPC registry configuration
//!
//! Debug toggles and the stuck-check policy consumed by
//! [`StuckChecker`](crate::npc::stuck::StuckChecker). Values can be loaded
//! from a TOML file; any missing key falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, RuntimeError};

/// Milliseconds to seconds
pub const MILLISECONDS_TO_SECONDS: f32 = 0.001;

/// Configuration for an NPC registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    // === DEBUG ===
    /// NPCs ignore incoming damage while set
    pub npcs_immune: bool,

    /// Behavior units emit verbose decision logging while set
    pub debug_behavior: bool,

    /// Log every actor initialization at debug level
    pub enable_actor_debug: bool,

    // === STUCK CHECK ===
    /// Interval between stuck-check samples, in milliseconds
    pub stuck_check_ms: u32,

    /// How many passes through the stuck check an actor must fail
    /// before being considered stuck
    pub stuck_check_max_passes: u32,

    /// Minimum distance (world units) a moving actor must cover between
    /// two samples for the sample to count as progress
    pub stuck_min_progress: f32,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            npcs_immune: false,
            debug_behavior: false,
            enable_actor_debug: false,
            stuck_check_ms: 500,
            stuck_check_max_passes: 2,
            stuck_min_progress: 0.01,
        }
    }
}

impl NpcConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stuck-check interval in seconds
    pub fn stuck_check_seconds(&self) -> f32 {
        self.stuck_check_ms as f32 * MILLISECONDS_TO_SECONDS
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: NpcConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.stuck_check_ms == 0 {
            return Err(RuntimeError::InvalidConfig(
                "stuck_check_ms must be greater than zero".into(),
            ));
        }

        if self.stuck_check_max_passes == 0 {
            return Err(RuntimeError::InvalidConfig(
                "stuck_check_max_passes must be greater than zero".into(),
            ));
        }

        // zero would count every sample as progress
        if self.stuck_min_progress.is_nan() || self.stuck_min_progress <= 0.0 {
            return Err(RuntimeError::InvalidConfig(format!(
                "stuck_min_progress ({}) must be greater than zero",
                self.stuck_min_progress
            )));
        }

        Ok(())
    }
}
