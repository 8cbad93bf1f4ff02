//! Error taxonomy for document edits.
//!
//! Every variant is local to the single rejected operation: the working
//! buffer is left exactly as it was before the call.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::history::HistoryError;

/// Errors produced by editing operations on a [`Document`](crate::Document).
#[derive(Debug, Error)]
pub enum EditError {
    /// A scalar argument is outside the range the operation accepts.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A coordinate maps outside the image extent.
    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    /// A sticker would extend past the top or left edge of the canvas.
    #[error("Sticker placed at ({x}, {y}) would paste off-canvas")]
    InvalidPlacement { x: i64, y: i64 },

    /// A selection mask does not cover the image it is applied to.
    #[error("Mask covers {actual} pixels but the image has {expected}")]
    MaskMismatch { expected: usize, actual: usize },

    /// A pixelation block covers no source pixels.
    #[error("Pixelation block ({row}, {col}) covers no pixels")]
    EmptyRegion { row: u32, col: u32 },

    /// Undo or redo at a history boundary.
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Decoding a source or sticker image failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Encoding the output image failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Writing the saved image failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl EditError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EditError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// History-boundary conditions are reported as no-ops rather than failures.
    pub fn is_history_boundary(&self) -> bool {
        matches!(self, EditError::History(_))
    }
}
