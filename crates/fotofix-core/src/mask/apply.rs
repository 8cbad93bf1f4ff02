//! Applying a selection to an image.
//!
//! Both operations replace selected pixels with a fixed color and leave the
//! rest untouched. The mask must cover the image exactly.

use super::SelectionMask;
use crate::error::EditError;
use crate::raster::{RasterImage, CHANNELS};

/// Transparent white, written into erased pixels.
pub const ERASED: [u8; 4] = [255, 255, 255, 0];

/// Opaque red, used to preview a selection.
pub const HIGHLIGHT: [u8; 4] = [255, 0, 0, 255];

/// Make every selected pixel fully transparent.
///
/// # Errors
/// `EditError::MaskMismatch` if the mask size differs from the image.
pub fn make_transparent(image: &RasterImage, mask: &SelectionMask) -> Result<RasterImage, EditError> {
    fill_selected(image, mask, ERASED)
}

/// Paint every selected pixel opaque red.
///
/// # Errors
/// `EditError::MaskMismatch` if the mask size differs from the image.
pub fn highlight(image: &RasterImage, mask: &SelectionMask) -> Result<RasterImage, EditError> {
    fill_selected(image, mask, HIGHLIGHT)
}

fn fill_selected(
    image: &RasterImage,
    mask: &SelectionMask,
    color: [u8; 4],
) -> Result<RasterImage, EditError> {
    if mask.width() != image.width || mask.height() != image.height {
        return Err(EditError::MaskMismatch {
            expected: image.pixel_count(),
            actual: mask.len(),
        });
    }

    let mut output = image.clone();
    for (px, &selected) in output.pixels.chunks_exact_mut(CHANNELS).zip(mask.bits()) {
        if selected {
            px.copy_from_slice(&color);
        }
    }
    Ok(output)
}
