//! Inbound edit commands.
//!
//! Commands arrive from the gesture loop and the voice stream as
//! `{ "command": ..., "param": ... }` objects. Mode and direction names
//! accept the spoken synonyms as well as their canonical names.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::adjustments::Enhancement;
use crate::error::EditError;
use crate::transform::CropInsets;

/// Editing modes the editor can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Mode {
    Crop,
    Sticker,
    Zoom,
    Rotate,
    Brightness,
    Contrast,
    Saturation,
    Sharpness,
    Transparent,
    Pixelate,
    Invert,
    Grayscale,
}

impl Mode {
    pub const ALL: [Mode; 12] = [
        Mode::Crop,
        Mode::Sticker,
        Mode::Zoom,
        Mode::Rotate,
        Mode::Brightness,
        Mode::Contrast,
        Mode::Saturation,
        Mode::Sharpness,
        Mode::Transparent,
        Mode::Pixelate,
        Mode::Invert,
        Mode::Grayscale,
    ];

    /// The enhancement a slider mode drives, if any.
    pub fn enhancement(self) -> Option<Enhancement> {
        match self {
            Mode::Brightness => Some(Enhancement::Brightness),
            Mode::Contrast => Some(Enhancement::Contrast),
            Mode::Saturation => Some(Enhancement::Saturation),
            Mode::Sharpness => Some(Enhancement::Sharpness),
            _ => None,
        }
    }

    /// Modes controlled by the slider.
    pub fn uses_slider(self) -> bool {
        self.enhancement().is_some() || self == Mode::Pixelate
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Crop => "crop",
            Mode::Sticker => "sticker",
            Mode::Zoom => "zoom",
            Mode::Rotate => "rotate",
            Mode::Brightness => "brightness",
            Mode::Contrast => "contrast",
            Mode::Saturation => "saturation",
            Mode::Sharpness => "sharpness",
            Mode::Transparent => "transparent",
            Mode::Pixelate => "pixelate",
            Mode::Invert => "invert",
            Mode::Grayscale => "grayscale",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let mode = match normalized.as_str() {
            "crop" | "cropping" => Mode::Crop,
            "sticker" => Mode::Sticker,
            "zoom" | "pan" => Mode::Zoom,
            "rotate" => Mode::Rotate,
            "brightness" | "darkness" => Mode::Brightness,
            "contrast" => Mode::Contrast,
            "saturation" | "saturate" => Mode::Saturation,
            "sharpness" | "sharp" => Mode::Sharpness,
            "transparent" | "transparency" => Mode::Transparent,
            "pixelate" | "pixel" | "pixelize" => Mode::Pixelate,
            "invert" | "invert color" | "invert colors" => Mode::Invert,
            "grayscale" | "gray" | "black and white" => Mode::Grayscale,
            _ => {
                return Err(EditError::invalid(
                    "mode",
                    format!("unknown mode {:?}", s),
                ))
            }
        };
        Ok(mode)
    }
}

impl TryFrom<String> for Mode {
    type Error = EditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Direction of a slider or zoom nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

impl FromStr for Direction {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "increase" | "raise" | "enhance" | "in" => Ok(Direction::Up),
            "down" | "decrease" | "lessen" | "lower" | "reduce" | "out" => Ok(Direction::Down),
            _ => Err(EditError::invalid(
                "direction",
                format!("unknown direction {:?}", s),
            )),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = EditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single edit request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "param", rename_all = "kebab-case")]
pub enum EditCommand {
    EnterMode(Mode),
    Undo,
    Redo,
    Commit,
    Adjust {
        kind: Enhancement,
        factor: f32,
    },
    Crop(CropInsets),
    Rotate {
        angle: f64,
        #[serde(default = "default_update_dims")]
        update_dims: bool,
    },
    Zoom {
        delta_w: f64,
        delta_h: f64,
    },
    SelectAndMask {
        x: f64,
        y: f64,
        /// Falls back to the configured transparency threshold.
        #[serde(default)]
        threshold: Option<f64>,
    },
    PasteSticker {
        path: PathBuf,
        x: f64,
        y: f64,
    },
    Invert,
    Grayscale,
    Pixelate {
        factor: f64,
    },
    Save,
    Nudge(Direction),
}

fn default_update_dims() -> bool {
    true
}
