#![forbid(unsafe_code)]

//! Declarative timeline configuration.
//!
//! Collects the tunable parameters of a timeline into one [`TimelineConfig`]
//! that can be loaded from TOML or JSON at startup.
//!
//! ```toml
//! resize_handle_width = 16.0
//! drag_threshold = 4.0
//! sidebar_width = 120.0
//! grid = [
//!     { value = 60000.0, max_range_size = 3600000.0 },
//!     { value = 3600000.0 },
//! ]
//!
//! [pan]
//! activate = "CTRL | META"
//! horizontal = "SHIFT"
//! ```
//!
//! ```rust,ignore
//! let config = TimelineConfig::from_toml_file("timeline.toml")?.validated()?;
//! ```

#[cfg(feature = "config-files")]
use std::path::Path;

use serde::{Deserialize, Serialize};
use spanline_core::GridSizeDefinition;
use spanline_web::{DEFAULT_DRAG_THRESHOLD, PanModifiers};

/// Default resize handle width in pixels.
pub const DEFAULT_RESIZE_HANDLE_WIDTH: f64 = 20.0;

/// Tunable timeline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Width of the grab zone around each item edge.
    pub resize_handle_width: f64,
    /// Grid used to snap drag and resize results.
    pub grid: GridSizeDefinition,
    /// Fixed sidebar width; `None` sizes the sidebar from its rows.
    pub sidebar_width: Option<f64>,
    /// Wheel modifier chords.
    pub pan: PanModifiers,
    /// Pointer travel before a press becomes a drag.
    pub drag_threshold: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            resize_handle_width: DEFAULT_RESIZE_HANDLE_WIDTH,
            grid: GridSizeDefinition::None,
            sidebar_width: None,
            pan: PanModifiers::default(),
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

impl TimelineConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.resize_handle_width.is_finite() && self.resize_handle_width > 0.0) {
            errors.push(format!(
                "resize_handle_width must be finite and > 0, got {}",
                self.resize_handle_width
            ));
        }
        if !(self.drag_threshold.is_finite() && self.drag_threshold >= 0.0) {
            errors.push(format!(
                "drag_threshold must be finite and >= 0, got {}",
                self.drag_threshold
            ));
        }
        if let Some(width) = self.sidebar_width
            && !(width.is_finite() && width >= 0.0)
        {
            errors.push(format!("sidebar_width must be finite and >= 0, got {width}"));
        }
        if let Err(err) = self.grid.validate() {
            errors.push(format!("grid: {err}"));
        }
        if self.pan.activate.is_empty() {
            errors.push("pan.activate must name at least one modifier".into());
        }

        errors
    }

    /// `self` if it validates, otherwise every problem found.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading a timeline configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    #[cfg(feature = "config-files")]
    Json(serde_json::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
