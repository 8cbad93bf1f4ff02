//! Parametric enhancements
//!
//! Applies one scalar-controlled enhancement to an RGBA image.
//!
//! ## Model
//! Every enhancement interpolates between a *degenerate* version of the
//! source and the source itself:
//!
//! `output = degenerate + factor * (source - degenerate)`
//!
//! | Enhancement | Degenerate image (factor 0)          |
//! |-------------|--------------------------------------|
//! | Brightness  | black                                |
//! | Contrast    | flat gray at the mean luma           |
//! | Saturation  | per-pixel luma (grayscale)           |
//! | Sharpness   | 3x3 smoothed copy                    |
//!
//! A factor of 1 is the identity, factors above 1 extrapolate past the
//! source. Results are clipped to 0-255 and alpha is always passed through.
//!
//! These are pure functions of their input, so re-applying the same factor
//! to the same source always yields the same pixels.

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::luminance::calculate_luma_u8;
use crate::raster::{RasterImage, CHANNELS};

/// The enhancement a slider controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Enhancement {
    Brightness,
    Contrast,
    Saturation,
    Sharpness,
}

/// Smoothing kernel weights: neighbours weigh 1, the center 5.
const SMOOTH_CENTER: u32 = 5;
const SMOOTH_SCALE: u32 = 13;

/// Apply an enhancement to `image`, returning a new image.
///
/// # Errors
/// Returns `EditError::InvalidParameter` if `factor` is negative or not finite.
/// Factors above the usual range are accepted unclamped.
///
/// # Example
/// ```
/// use fotofix_core::{RasterImage, adjustments::{enhance, Enhancement}};
///
/// let img = RasterImage::filled(2, 2, [100, 150, 200, 255]);
/// let darker = enhance(&img, Enhancement::Brightness, 0.5).unwrap();
/// assert_eq!(darker.pixel(0, 0), Some([50, 75, 100, 255]));
/// ```
pub fn enhance(image: &RasterImage, kind: Enhancement, factor: f32) -> Result<RasterImage, EditError> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(EditError::invalid(
            "factor",
            format!("enhancement factor must be a finite value >= 0, got {}", factor),
        ));
    }

    if image.is_empty() {
        return Ok(image.clone());
    }

    let output = match kind {
        Enhancement::Brightness => blend_with(image, factor, |_, _| [0, 0, 0]),
        Enhancement::Contrast => {
            let mean = mean_luma(image);
            blend_with(image, factor, |_, _| [mean, mean, mean])
        }
        Enhancement::Saturation => blend_with(image, factor, |src, _| {
            let l = calculate_luma_u8(src[0], src[1], src[2]);
            [l, l, l]
        }),
        Enhancement::Sharpness => {
            let smoothed = smooth(image);
            blend_with(image, factor, |_, i| {
                [smoothed[i], smoothed[i + 1], smoothed[i + 2]]
            })
        }
    };

    Ok(output)
}

/// Blend every pixel against its degenerate value.
///
/// `degenerate` receives the source pixel and its byte offset.
fn blend_with<F>(image: &RasterImage, factor: f32, degenerate: F) -> RasterImage
where
    F: Fn(&[u8], usize) -> [u8; 3],
{
    let mut pixels = Vec::with_capacity(image.pixels.len());

    for (n, src) in image.pixels.chunks_exact(CHANNELS).enumerate() {
        let d = degenerate(src, n * CHANNELS);
        for c in 0..3 {
            pixels.push(lerp_channel(d[c], src[c], factor));
        }
        pixels.push(src[3]);
    }

    RasterImage::new(image.width, image.height, pixels)
}

#[inline]
fn lerp_channel(degenerate: u8, source: u8, factor: f32) -> u8 {
    let d = degenerate as f32;
    let v = d + factor * (source as f32 - d);
    v.clamp(0.0, 255.0) as u8
}

/// Mean luma of the image, rounded half up.
fn mean_luma(image: &RasterImage) -> u8 {
    let sum: u64 = image
        .pixels
        .chunks_exact(CHANNELS)
        .map(|px| calculate_luma_u8(px[0], px[1], px[2]) as u64)
        .sum();
    let mean = sum as f64 / image.pixel_count() as f64;
    (mean + 0.5).floor().min(255.0) as u8
}

/// 3x3 smoothing of the RGB channels.
///
/// Border pixels are copied from the source unchanged. The returned buffer
/// has the same RGBA layout as the input.
fn smooth(image: &RasterImage) -> Vec<u8> {
    let mut out = image.pixels.clone();
    let (w, h) = (image.width, image.height);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let center = image.index(x, y);
            for c in 0..3 {
                let mut sum = 0u32;
                for ny in y - 1..=y + 1 {
                    for nx in x - 1..=x + 1 {
                        let weight = if nx == x && ny == y { SMOOTH_CENTER } else { 1 };
                        sum += weight * image.pixels[image.index(nx, ny) + c] as u32;
                    }
                }
                out[center + c] = ((sum + SMOOTH_SCALE / 2) / SMOOTH_SCALE) as u8;
            }
        }
    }

    out
}


// ============================================================================
// Property-Based Tests
// ============================================================================
