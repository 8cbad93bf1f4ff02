//! Whole-image color operations.
//!
//! Both drop the source alpha: the output is always fully opaque.

use crate::luminance::calculate_luma_u8;
use crate::raster::{RasterImage, CHANNELS};

/// Replace every RGB channel with `255 - channel`.
pub fn invert(image: &RasterImage) -> RasterImage {
    map_opaque(image, |r, g, b| [255 - r, 255 - g, 255 - b])
}

/// Replace every pixel with its Rec.601 luma.
pub fn grayscale(image: &RasterImage) -> RasterImage {
    map_opaque(image, |r, g, b| {
        let l = calculate_luma_u8(r, g, b);
        [l, l, l]
    })
}

fn map_opaque(image: &RasterImage, f: impl Fn(u8, u8, u8) -> [u8; 3]) -> RasterImage {
    let mut output = image.clone();
    for px in output.pixels.chunks_exact_mut(CHANNELS) {
        let [r, g, b] = f(px[0], px[1], px[2]);
        px.copy_from_slice(&[r, g, b, 255]);
    }
    output
}
