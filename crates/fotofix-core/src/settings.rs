//! User-tunable settings.
//!
//! Settings are read from TOML. Missing keys take their defaults, and values
//! outside their supported range are clamped with a warning rather than
//! rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transform::InterpolationFilter;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings {path}: {reason}")]
    Io { path: String, reason: String },

    /// The file is not valid TOML for [`Settings`].
    #[error("Failed to parse settings: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dark_mode: bool,
    pub show_instructions: bool,
    /// Similarity threshold used by select-and-mask when none is given.
    pub transparency_threshold: f64,
    /// Fraction of the slider range moved by one nudge.
    pub slider_delta: f64,
    /// Fraction of the display size added or removed by one zoom nudge.
    pub zoom_delta: f64,
    /// Number of frames a gesture is averaged over.
    pub gesture_window: u32,
    /// Appended to the source file stem when saving.
    pub save_suffix: String,
    pub rotate_filter: InterpolationFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            show_instructions: true,
            transparency_threshold: 0.95,
            slider_delta: 0.1,
            zoom_delta: 0.07,
            gesture_window: 10,
            save_suffix: "fotofix".to_string(),
            rotate_filter: InterpolationFilter::Nearest,
        }
    }
}

impl Settings {
    pub const THRESHOLD_RANGE: (f64, f64) = (0.01, 1.0);
    pub const SLIDER_DELTA_RANGE: (f64, f64) = (0.01, 0.12);
    pub const ZOOM_DELTA_RANGE: (f64, f64) = (0.02, 0.1);
    pub const GESTURE_WINDOW_RANGE: (u32, u32) = (1, 100);

    /// Parse and sanitize settings from a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        let settings: Settings =
            toml::from_str(contents).map_err(|e| SettingsError::Parse(e.to_string()))?;
        Ok(settings.sanitize())
    }

    /// Read settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Clamp every value into its supported range.
    pub fn sanitize(mut self) -> Self {
        let defaults = Settings::default();

        self.transparency_threshold = clamp_f64(
            "transparency_threshold",
            self.transparency_threshold,
            Self::THRESHOLD_RANGE,
            defaults.transparency_threshold,
        );
        self.slider_delta = clamp_f64(
            "slider_delta",
            self.slider_delta,
            Self::SLIDER_DELTA_RANGE,
            defaults.slider_delta,
        );
        self.zoom_delta = clamp_f64(
            "zoom_delta",
            self.zoom_delta,
            Self::ZOOM_DELTA_RANGE,
            defaults.zoom_delta,
        );

        let (lo, hi) = Self::GESTURE_WINDOW_RANGE;
        if !(lo..=hi).contains(&self.gesture_window) {
            log::warn!(
                "gesture_window {} outside [{}, {}], clamping",
                self.gesture_window,
                lo,
                hi
            );
            self.gesture_window = self.gesture_window.clamp(lo, hi);
        }

        let suffix = self.save_suffix.trim();
        if suffix.is_empty() || suffix.contains(['/', '\\']) {
            log::warn!("save_suffix {:?} is not usable, using default", self.save_suffix);
            self.save_suffix = defaults.save_suffix;
        } else if suffix.len() != self.save_suffix.len() {
            self.save_suffix = suffix.to_string();
        }

        self
    }
}

fn clamp_f64(name: &str, value: f64, (lo, hi): (f64, f64), fallback: f64) -> f64 {
    if !value.is_finite() {
        log::warn!("{} is not a finite number, using {}", name, fallback);
        return fallback;
    }
    if value < lo || value > hi {
        log::warn!("{} {} outside [{}, {}], clamping", name, value, lo, hi);
        return value.clamp(lo, hi);
    }
    value
}
