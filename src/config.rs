//! Engine options as handed over by the host page.
//!
//! Options arrive as a JSON object with camelCase keys; missing keys take
//! their defaults. Parsing and validation are the only fallible operations
//! in the crate.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{DEFAULT_GRID_SIZE, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_SNAP_THRESHOLD};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid options json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid zoom range: min {min}, max {max}")]
    InvalidZoomRange { min: f64, max: f64 },
    #[error("invalid grid size: {0}")]
    InvalidGridSize(f64),
    #[error("invalid snap threshold: {0}")]
    InvalidSnapThreshold(f64),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub grid_size: f64,
    pub snap_threshold: f64,
    /// Round converted pointer positions and drag deltas to the grid.
    pub snap_to_grid: bool,
    /// Snap dragged layers to other layers' edges and centres.
    pub smart_guides: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            grid_size: DEFAULT_GRID_SIZE,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            snap_to_grid: false,
            smart_guides: true,
        }
    }
}

impl EngineOptions {
    /// Parse and validate an options object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or wrongly typed keys,
    /// or the first validation failure from [`EngineOptions::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check every value against the ranges the engine accepts.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_zoom, self.max_zoom);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::InvalidZoomRange { min, max });
        }
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        if !(self.snap_threshold.is_finite() && self.snap_threshold >= 0.0) {
            return Err(ConfigError::InvalidSnapThreshold(self.snap_threshold));
        }
        Ok(())
    }
}
