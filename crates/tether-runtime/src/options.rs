#![forbid(unsafe_code)]

//! Per-popup options and their loading from configuration files.
//!
//! Defaults match the engine's built-in constants, so
//! `PopupOptions::default()` behaves exactly like a caller passing nothing.
//! Hosts that want app-wide defaults hand them to
//! [`PopupRegistry::with_defaults`](crate::PopupRegistry::with_defaults)
//! instead of mutating any global.
//!
//! # Loading
//!
//! With the `config` feature:
//!
//! ```toml
//! # tether.toml
//! alley_width = 4.0
//! min_anchor_offset = 12.0
//! reconcile_interval_ms = 500
//! use_inner_positioning = false
//! ```
//!
//! ```rust,ignore
//! let options = PopupOptions::from_toml_file("tether.toml")?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use std::fmt;

use tether_layout::{DEFAULT_ALLEY_WIDTH, DEFAULT_MIN_ANCHOR_OFFSET, PlacementConfig};
use web_time::Duration;

/// Default period of the re-measurement timer.
pub const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_millis(1000);

/// Caller-configurable behavior of one popup.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PopupOptions {
    /// Margin kept between the popup and the viewport edges.
    pub alley_width: f32,
    /// Minimum distance between the pointer offset and a popup corner.
    pub min_anchor_offset: f32,
    /// How often anchor and viewport are re-measured while the popup is up.
    #[cfg_attr(
        feature = "config",
        serde(rename = "reconcile_interval_ms", with = "duration_ms")
    )]
    pub reconcile_interval: Duration,
    /// Render inside the anchor instead of beside it.
    pub use_inner_positioning: bool,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            alley_width: DEFAULT_ALLEY_WIDTH,
            min_anchor_offset: DEFAULT_MIN_ANCHOR_OFFSET,
            reconcile_interval: DEFAULT_RECONCILE_INTERVAL,
            use_inner_positioning: false,
        }
    }
}

impl PopupOptions {
    #[must_use]
    pub fn alley_width(mut self, alley_width: f32) -> Self {
        self.alley_width = alley_width;
        self
    }

    #[must_use]
    pub fn min_anchor_offset(mut self, min_anchor_offset: f32) -> Self {
        self.min_anchor_offset = min_anchor_offset;
        self
    }

    #[must_use]
    pub fn reconcile_interval(mut self, interval: Duration) -> Self {
        self.reconcile_interval = interval;
        self
    }

    #[must_use]
    pub fn use_inner_positioning(mut self, inner: bool) -> Self {
        self.use_inner_positioning = inner;
        self
    }

    /// The subset the placement evaluator needs.
    pub fn placement(&self) -> PlacementConfig {
        PlacementConfig::default()
            .alley_width(self.alley_width)
            .min_anchor_offset(self.min_anchor_offset)
    }

    /// Reject values the evaluator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.alley_width.is_finite() || self.alley_width < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "alley_width must be a finite, non-negative number (got {})",
                self.alley_width
            )));
        }
        if !self.min_anchor_offset.is_finite() || self.min_anchor_offset < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_anchor_offset must be a finite, non-negative number (got {})",
                self.min_anchor_offset
            )));
        }
        if self.reconcile_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "reconcile_interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        options.validate()?;
        Ok(options)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Errors from loading or validating [`PopupOptions`].
#[derive(Debug)]
pub enum ConfigError {
    /// Reading the file failed.
    #[cfg(feature = "config")]
    Io(std::io::Error),
    /// The TOML was malformed.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// The JSON was malformed.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// A value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "config")]
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "config TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "config JSON parse error: {e}"),
            Self::Invalid(msg) => write!(f, "invalid popup options: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "config")]
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(feature = "config")]
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use web_time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
