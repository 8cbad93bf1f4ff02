//! View geometry: the on-screen rectangle an image is drawn into.
//!
//! The view is independent of the pixel dimensions. Zooming only rescales
//! the rectangle; operations that take view-space coordinates (crop insets,
//! selection seeds, sticker centers) convert them with the current ratio of
//! pixel size to view size.

use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// Size of the display area views are centered in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Position and size of the image on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewRect {
    /// A view of the given size centered in `display`. Negative sizes become 0.
    pub fn centered(width: f64, height: f64, display: DisplaySize) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        Self {
            x: ((display.width - width) / 2.0).floor(),
            y: ((display.height - height) / 2.0).floor(),
            width,
            height,
        }
    }

    /// The same size, re-centered in `display`.
    pub fn recentered(self, display: DisplaySize) -> Self {
        Self::centered(self.width, self.height, display)
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Scale both dimensions by `factor` and re-center.
    pub fn scaled(self, factor: f64, display: DisplaySize) -> Self {
        Self::centered(self.width * factor, self.height * factor, display)
    }

    /// Convert a view-space point to the pixel it lands on in an
    /// `image_width` x `image_height` image.
    ///
    /// # Errors
    /// `EditError::OutOfBounds` when the point falls outside the image.
    pub fn to_pixel(
        &self,
        x: f64,
        y: f64,
        image_width: u32,
        image_height: u32,
    ) -> Result<(u32, u32), EditError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(EditError::invalid(
                "coordinate",
                format!("({}, {}) is not a finite point", x, y),
            ));
        }

        let (px, py) = self.to_pixel_unchecked(x, y, image_width, image_height);
        if self.width <= 0.0
            || self.height <= 0.0
            || px < 0
            || py < 0
            || px >= image_width as i64
            || py >= image_height as i64
        {
            return Err(EditError::OutOfBounds {
                x: px,
                y: py,
                width: image_width,
                height: image_height,
            });
        }

        Ok((px as u32, py as u32))
    }

    fn to_pixel_unchecked(&self, x: f64, y: f64, image_width: u32, image_height: u32) -> (i64, i64) {
        if self.width <= 0.0 || self.height <= 0.0 {
            return (-1, -1);
        }
        let px = (image_width as f64 * x / self.width).floor() as i64;
        let py = (image_height as f64 * y / self.height).floor() as i64;
        (px, py)
    }
}

/// Rescale a view by pointer/voice deltas.
///
/// `ratio = min(delta_w / width, delta_h / height)` and both sides grow by
/// `1 + ratio`, so the aspect ratio is preserved. Returns the new view
/// (re-centered) and the scale factor that was applied.
///
/// # Errors
/// `EditError::InvalidParameter` for non-finite deltas or a view with no area.
pub fn zoom_view(
    view: ViewRect,
    delta_w: f64,
    delta_h: f64,
    display: DisplaySize,
) -> Result<(ViewRect, f64), EditError> {
    if !delta_w.is_finite() || !delta_h.is_finite() {
        return Err(EditError::invalid(
            "zoom",
            format!("deltas ({}, {}) must be finite", delta_w, delta_h),
        ));
    }
    if view.width <= 0.0 || view.height <= 0.0 {
        return Err(EditError::invalid("zoom", "the view has no area to scale"));
    }

    let ratio = (delta_w / view.width).min(delta_h / view.height);
    let factor = (1.0 + ratio).max(0.0);
    Ok((view.scaled(factor, display), factor))
}
