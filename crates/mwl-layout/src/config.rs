#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! [`LayoutConfig`] carries the defaults containers apply to their children
//! and the divider geometry. It is threaded explicitly into every container
//! at construction; nothing reads it from a global.
//!
//! # Loading
//!
//! ```toml
//! # miewer-layout.toml
//! divider_size = 6
//! split_min_size = 8
//! split_default_size = "*"
//! ```
//!
//! ```rust,ignore
//! let config = LayoutConfig::from_toml_file("miewer-layout.toml")?;
//! let config = LayoutConfig::from_json_str(json)?;
//! ```
//!
//! Missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::size::SizeToken;
use crate::track::TrackDefaults;

/// Tunable engine defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Thickness of inserted dividers, in pixels.
    pub divider_size: u32,
    /// Minimum for split-container children that declare neither size nor
    /// fill.
    pub split_min_size: u32,
    /// Size for split-container children that declare neither size nor fill.
    pub split_default_size: SizeToken,
    /// Size for plain-container children that declare neither size nor fill.
    pub container_default_size: SizeToken,
    /// Minimum for plain-container children that declare none.
    pub container_min_size: u32,
    /// Hold pointer moves until the next frame during divider drags.
    pub coalesce_pointer_moves: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            divider_size: 4,
            split_min_size: TrackDefaults::SPLIT.min_size,
            split_default_size: TrackDefaults::SPLIT.size,
            container_default_size: TrackDefaults::GENERAL.size,
            container_min_size: TrackDefaults::GENERAL.min_size,
            coalesce_pointer_moves: true,
        }
    }
}

impl LayoutConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LayoutConfigError> {
        toml::from_str(s).map_err(LayoutConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LayoutConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LayoutConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, LayoutConfigError> {
        serde_json::from_str(s).map_err(LayoutConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LayoutConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LayoutConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load from a file, choosing JSON for a `.json` extension and TOML
    /// otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LayoutConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_file(path)?
        } else {
            Self::from_toml_file(path)?
        };
        tracing::debug!(target: "mwl.config", path = %path.display(), "layout config loaded");
        Ok(config)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.divider_size == 0 {
            errors.push("divider_size must be > 0".into());
        }

        for (name, size) in [
            ("split_default_size", self.split_default_size),
            ("container_default_size", self.container_default_size),
        ] {
            if matches!(size, SizeToken::Percent(pct) if pct > 100.0) {
                errors.push(format!("{name} must be at most 100%, got {size}"));
            }
        }

        errors
    }

    /// Defaults for split-container children.
    #[must_use]
    pub fn split_defaults(&self) -> TrackDefaults {
        TrackDefaults {
            size: self.split_default_size,
            min_size: self.split_min_size,
        }
    }

    /// Defaults for plain-container children.
    #[must_use]
    pub fn container_defaults(&self) -> TrackDefaults {
        TrackDefaults {
            size: self.container_default_size,
            min_size: self.container_min_size,
        }
    }
}

/// Errors that can occur when loading a layout configuration.
#[derive(Debug)]
pub enum LayoutConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
}

impl std::fmt::Display for LayoutConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for LayoutConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}
