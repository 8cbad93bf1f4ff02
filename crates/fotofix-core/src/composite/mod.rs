//! Compositing operations that rewrite pixels rather than geometry.
//!
//! - **Sticker**: alpha-composite an overlay centered on a point
//! - **Color**: invert and grayscale (output is opaque)
//! - **Pixelate**: block averaging on a grid derived from a factor

mod color;
mod pixelate;
mod sticker;

pub use color::{grayscale, invert};
pub use pixelate::{pixelate, BlockGrid};
pub use sticker::paste_sticker;
