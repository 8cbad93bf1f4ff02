//! Region selection by color similarity.
//!
//! ## Selection Types
//!
//! - **Flood fill** ("magic wand"): pixels 4-connected to the seed whose
//!   color is similar to it
//! - **Global**: every pixel in the image similar to the seed color
//!
//! ## Similarity
//!
//! Two colors are similar when the Euclidean distance between their RGB
//! components is at most `sqrt(3 * 255²) * (1 - threshold)`. A threshold of
//! 1 only matches the exact color; 0 matches everything. Alpha is ignored.

pub mod apply;
pub mod flood;
pub mod similar;

pub use apply::{highlight, make_transparent};
pub use flood::flood_select;
pub use similar::select_similar;

use crate::error::EditError;
use crate::raster::RasterImage;

/// Largest possible RGB distance, between black and white.
const MAX_DISTANCE: f64 = 441.672_955_930_063_7;

/// One flag per pixel, row-major. `true` = selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl SelectionMask {
    /// An empty selection covering a `width` x `height` image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Wrap existing flags. Returns `None` if the length does not match.
    pub fn from_bits(width: u32, height: u32, bits: Vec<bool>) -> Option<Self> {
        (bits.len() == width as usize * height as usize).then_some(Self { width, height, bits })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of selected pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    #[inline]
    pub fn is_selected(&self, x: u32, y: u32) -> bool {
        self.bits[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn select(&mut self, x: u32, y: u32) {
        self.bits[y as usize * self.width as usize + x as usize] = true;
    }
}

/// Compares pixels against a fixed target color.
#[derive(Debug, Clone, Copy)]
pub struct ColorMatcher {
    target: [u8; 4],
    max_delta: f64,
}

impl ColorMatcher {
    /// # Errors
    /// `EditError::InvalidParameter` if `threshold` is outside `[0, 1]`.
    pub fn new(target: [u8; 4], threshold: f64) -> Result<Self, EditError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(EditError::invalid(
                "threshold",
                format!("must be within [0, 1], got {}", threshold),
            ));
        }
        Ok(Self {
            target,
            max_delta: MAX_DISTANCE * (1.0 - threshold),
        })
    }

    /// Matcher seeded with the color at `(x, y)`.
    pub fn at(image: &RasterImage, x: u32, y: u32, threshold: f64) -> Result<Self, EditError> {
        let target = image.pixel(x, y).ok_or(EditError::OutOfBounds {
            x: x as i64,
            y: y as i64,
            width: image.width,
            height: image.height,
        })?;
        Self::new(target, threshold)
    }

    #[inline]
    pub fn matches(&self, color: [u8; 4]) -> bool {
        is_similar_color(self.target, color, self.max_delta)
    }
}

/// True when the RGB distance between `a` and `b` is at most `max_delta`.
#[inline]
pub fn is_similar_color(a: [u8; 4], b: [u8; 4], max_delta: f64) -> bool {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    let distance = ((dr * dr + dg * dg + db * db) as f64).sqrt();
    distance <= max_delta
}
