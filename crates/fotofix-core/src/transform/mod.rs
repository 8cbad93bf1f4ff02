//! Structural operations: view geometry, cropping and rotation.
//!
//! # Coordinate System
//!
//! - Crop insets, selection seeds and sticker centers are in view units
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Origin is the top-left corner

mod crop;
mod rotation;
mod view;

pub use crop::{apply_crop, crop_in_view, pixel_box_for, CropInsets, PixelBox};
pub use rotation::{apply_rotation, compute_rotated_bounds, rotated_extent, InterpolationFilter};
pub use view::{zoom_view, DisplaySize, ViewRect};
