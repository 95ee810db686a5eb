//! Renderer configuration supplied by the host as JSON.
//!
//! Every field has a default, so `{}` is a valid config. Geometry constants
//! (floor spacing, camera sensitivities, height bounds) are fixed in
//! [`crate::consts`] and are not configurable.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CELL_PX: f64 = 18.0;
pub const DEFAULT_AUTO_ROTATE_PERIOD_MS: u32 = 100;
pub const DEFAULT_AUTO_ROTATE_STEP: f64 = 0.05;
pub const DEFAULT_AUTO_ROTATE_DURATION_MS: u32 = 10_000;

/// Error returned by [`RendererConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid renderer config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid renderer config: `{field}` {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Screen pixels per grid cell before camera scaling.
    pub cell_px: f64,
    /// Auto-rotate tick period.
    pub auto_rotate_period_ms: u32,
    /// Angle added per auto-rotate tick.
    pub auto_rotate_step: f64,
    /// Auto-rotate stops itself after this long.
    pub auto_rotate_duration_ms: u32,
    /// Draw the floor/angle/height overlay.
    pub debug_overlay: bool,
    /// Show the first-use hint until the first pointer contact.
    pub show_hint: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            cell_px: DEFAULT_CELL_PX,
            auto_rotate_period_ms: DEFAULT_AUTO_ROTATE_PERIOD_MS,
            auto_rotate_step: DEFAULT_AUTO_ROTATE_STEP,
            auto_rotate_duration_ms: DEFAULT_AUTO_ROTATE_DURATION_MS,
            debug_overlay: false,
            show_hint: true,
        }
    }
}

impl RendererConfig {
    /// Parse and validate a config document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_px.is_finite() && self.cell_px > 0.0) {
            return Err(ConfigError::Invalid { field: "cell_px", reason: "must be a positive number" });
        }
        if self.auto_rotate_period_ms == 0 {
            return Err(ConfigError::Invalid { field: "auto_rotate_period_ms", reason: "must be non-zero" });
        }
        if !self.auto_rotate_step.is_finite() {
            return Err(ConfigError::Invalid { field: "auto_rotate_step", reason: "must be finite" });
        }
        Ok(())
    }
}
