//! Cropping by view-space insets.
//!
//! A crop is expressed as distances trimmed from each edge of the displayed
//! view, not in pixels. The insets are scaled by the pixel-to-view ratio and
//! rounded half-to-even to find the pixel box. The resulting view shrinks by
//! exactly the inset amounts.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the view
//! - `right` and `bottom` are measured inward from the far edges

use serde::{Deserialize, Serialize};

use super::view::ViewRect;
use crate::error::EditError;
use crate::raster::{RasterImage, CHANNELS};

/// Distances to trim from each edge of the view, in view units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropInsets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl CropInsets {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0
    }

    fn validate(&self) -> Result<(), EditError> {
        for (edge, value) in [
            ("left", self.left),
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EditError::invalid(
                    "crop",
                    format!("{} inset must be a non-negative number, got {}", edge, value),
                ));
            }
        }
        Ok(())
    }
}

/// Pixel rectangle `[left, right) x [top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelBox {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// Crop `image` by insets measured against `view`.
///
/// Returns the cropped image and the new view size
/// `(view.width - left - right, view.height - top - bottom)`.
///
/// # Errors
///
/// `EditError::InvalidParameter` when an inset is negative or not finite,
/// the view has no area, or the insets leave an empty region.
pub fn crop_in_view(
    image: &RasterImage,
    view: &ViewRect,
    insets: CropInsets,
) -> Result<(RasterImage, (f64, f64)), EditError> {
    insets.validate()?;

    if insets.is_zero() {
        return Ok((image.clone(), view.size()));
    }

    if view.width <= 0.0 || view.height <= 0.0 {
        return Err(EditError::invalid("crop", "the view has no area to crop"));
    }

    let new_w = view.width - insets.left - insets.right;
    let new_h = view.height - insets.top - insets.bottom;
    if new_w <= 0.0 || new_h <= 0.0 {
        return Err(EditError::invalid(
            "crop",
            format!("insets {:?} leave nothing of a {}x{} view", insets, view.width, view.height),
        ));
    }

    let pixel_box = pixel_box_for(image, view, &insets);
    if pixel_box.width() == 0 || pixel_box.height() == 0 {
        return Err(EditError::invalid(
            "crop",
            format!("insets {:?} select no pixels", insets),
        ));
    }

    Ok((apply_crop(image, pixel_box), (new_w, new_h)))
}

/// Scale view insets into a pixel box, clamped to the image.
pub fn pixel_box_for(image: &RasterImage, view: &ViewRect, insets: &CropInsets) -> PixelBox {
    let w = image.width as f64;
    let h = image.height as f64;

    let to_px = |v: f64, limit: u32| v.round_ties_even().clamp(0.0, limit as f64) as u32;

    PixelBox {
        left: to_px(insets.left / view.width * w, image.width),
        top: to_px(insets.top / view.height * h, image.height),
        right: to_px(w - insets.right / view.width * w, image.width),
        bottom: to_px(h - insets.bottom / view.height * h, image.height),
    }
}

/// Copy the pixels inside `region` into a new image.
///
/// The box is clamped to the image; a full-image box returns a copy.
pub fn apply_crop(image: &RasterImage, region: PixelBox) -> RasterImage {
    let right = region.right.min(image.width);
    let bottom = region.bottom.min(image.height);
    let left = region.left.min(right);
    let top = region.top.min(bottom);

    if left == 0 && top == 0 && right == image.width && bottom == image.height {
        return image.clone();
    }

    let out_width = right - left;
    let out_height = bottom - top;
    let row_bytes = out_width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    for y in top..bottom {
        let start = image.index(left, y);
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    RasterImage::new(out_width, out_height, output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
