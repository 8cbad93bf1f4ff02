//! Fotofix Core - raster editing engine
//!
//! This crate holds the in-memory editing model behind Fotofix: decoding,
//! tone enhancements, geometric transforms, flood-fill masking, stickers,
//! pixelation, and an undo/redo timeline. Commands from gesture and voice
//! front ends are applied through an [`Editor`], usually via a
//! [`CommandQueue`].
//!
//! Images are 8-bit straight-alpha RGBA throughout.

pub mod adjustments;
pub mod command;
pub mod composite;
pub mod decode;
pub mod document;
pub mod editor;
pub mod encode;
pub mod error;
pub mod history;
pub mod luminance;
pub mod mask;
pub mod queue;
pub mod raster;
pub mod settings;
pub mod transform;

pub use adjustments::{enhance, Enhancement};
pub use command::{Direction, EditCommand, Mode};
pub use decode::{decode_image, open_image, DecodeError};
pub use document::{saved_path, Document};
pub use editor::{Editor, Outcome, Slider};
pub use encode::{encode_png, EncodeError};
pub use error::EditError;
pub use history::{HistoryEntry, HistoryError, Timeline};
pub use mask::SelectionMask;
pub use queue::{CommandQueue, CommandSender};
pub use raster::RasterImage;
pub use settings::{Settings, SettingsError};
pub use transform::{CropInsets, DisplaySize, InterpolationFilter, ViewRect};
