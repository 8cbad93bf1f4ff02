//! Source image decoding.
//!
//! Converts encoded files (PNG, JPEG) into the RGBA8 [`RasterImage`] the
//! engine edits. JPEG inputs have their EXIF orientation applied so the
//! document starts out upright.
//!
//! [`RasterImage`]: crate::RasterImage

mod source;
mod types;

pub use source::{decode_image, open_image};
pub use types::{DecodeError, Orientation};
