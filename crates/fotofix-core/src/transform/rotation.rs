//! Image rotation about the center.
//!
//! Multiples of 90 degrees are exact pixel remaps. Other angles use inverse
//! mapping: for each output pixel we find the source position and sample it
//! with the selected filter. Output pixels with no source are transparent.
//!
//! Positive angles rotate counter-clockwise on screen. With y pointing down,
//! the inverse transform around the pixel centers is:
//! ```text
//! src_x =  dx * cos(θ) - dy * sin(θ) + src_cx
//! src_y =  dx * sin(θ) + dy * cos(θ) + src_cy
//! ```

use serde::{Deserialize, Serialize};

use crate::raster::{RasterImage, CHANNELS};

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];
const ANGLE_EPSILON: f64 = 0.001;

/// Sampling filter for non-quarter-turn rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationFilter {
    /// Nearest source pixel. Keeps hard edges.
    #[default]
    Nearest,
    /// Weighted average of the four nearest pixels.
    Bilinear,
}

/// Number of counter-clockwise quarter turns, if `angle_degrees` is one.
fn quarter_turns(angle_degrees: f64) -> Option<u8> {
    let normalized = angle_degrees.rem_euclid(360.0);
    let turns = (normalized / 90.0).round();
    if (normalized - turns * 90.0).abs() < ANGLE_EPSILON {
        Some((turns as u8) % 4)
    } else {
        None
    }
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// # Example
///
/// ```
/// use fotofix_core::transform::compute_rotated_bounds;
///
/// assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
/// assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    if let Some(turns) = quarter_turns(angle_degrees) {
        return if turns % 2 == 1 {
            (height, width)
        } else {
            (width, height)
        };
    }

    let (new_w, new_h) = rotated_extent(width as f64, height as f64, angle_degrees);
    ((new_w.round() as u32).max(1), (new_h.round() as u32).max(1))
}

/// Bounding box of a `width` x `height` rectangle rotated by `angle_degrees`.
///
/// Used for view sizes, which are not rounded.
pub fn rotated_extent(width: f64, height: f64, angle_degrees: f64) -> (f64, f64) {
    if let Some(turns) = quarter_turns(angle_degrees) {
        return if turns % 2 == 1 {
            (height, width)
        } else {
            (width, height)
        };
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();
    (width * cos + height * sin, width * sin + height * cos)
}

/// Rotate an image counter-clockwise by `angle_degrees`.
///
/// When `expand` is true the canvas grows to the rotated bounding box.
/// Otherwise the output keeps the source dimensions and corners that rotate
/// out of frame are clipped.
pub fn apply_rotation(
    image: &RasterImage,
    angle_degrees: f64,
    expand: bool,
    filter: InterpolationFilter,
) -> RasterImage {
    if let Some(turns) = quarter_turns(angle_degrees) {
        // Odd turns on a fixed non-square canvas do not map pixel-for-pixel
        let fits = expand || turns % 2 == 0 || image.width == image.height;
        if fits {
            return rotate_quarter(image, turns);
        }
    }

    let (dst_w, dst_h) = if expand {
        compute_rotated_bounds(image.width, image.height, angle_degrees)
    } else {
        (image.width, image.height)
    };

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = image.width as f64 / 2.0;
    let src_cy = image.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * CHANNELS);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            let src_x = dx * cos - dy * sin + src_cx;
            let src_y = dx * sin + dy * cos + src_cy;

            let pixel = match filter {
                InterpolationFilter::Nearest => sample_nearest(image, src_x, src_y),
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
            };
            output.extend_from_slice(&pixel);
        }
    }

    RasterImage::new(dst_w, dst_h, output)
}

fn rotate_quarter(image: &RasterImage, turns: u8) -> RasterImage {
    let (w, h) = (image.width, image.height);
    if turns == 0 {
        return image.clone();
    }

    let (dst_w, dst_h) = if turns % 2 == 1 { (h, w) } else { (w, h) };
    let mut output = vec![0u8; image.byte_size()];

    for y in 0..h {
        for x in 0..w {
            let (dx, dy) = match turns {
                1 => (y, w - 1 - x),
                2 => (w - 1 - x, h - 1 - y),
                _ => (h - 1 - y, x),
            };
            let src = image.index(x, y);
            let dst = (dy as usize * dst_w as usize + dx as usize) * CHANNELS;
            output[dst..dst + CHANNELS].copy_from_slice(&image.pixels[src..src + CHANNELS]);
        }
    }

    RasterImage::new(dst_w, dst_h, output)
}

fn sample_nearest(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    let px = x.floor();
    let py = y.floor();
    if px < 0.0 || py < 0.0 || px >= image.width as f64 || py >= image.height as f64 {
        return TRANSPARENT;
    }
    image.pixel(px as u32, py as u32).unwrap_or(TRANSPARENT)
}

/// Bilinear sample at a continuous position, where pixel `i` covers `[i, i+1)`.
fn sample_bilinear(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    if x < 0.0 || y < 0.0 || x >= image.width as f64 || y >= image.height as f64 {
        return TRANSPARENT;
    }

    // Shift to pixel-center coordinates and clamp the neighbourhood at edges
    let cx = (x - 0.5).max(0.0);
    let cy = (y - 0.5).max(0.0);
    let x0 = (cx.floor() as u32).min(image.width - 1);
    let y0 = (cy.floor() as u32).min(image.height - 1);
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);
    let fx = cx - x0 as f64;
    let fy = cy - y0 as f64;

    let p00 = image.pixel(x0, y0).unwrap_or(TRANSPARENT);
    let p10 = image.pixel(x1, y0).unwrap_or(TRANSPARENT);
    let p01 = image.pixel(x0, y1).unwrap_or(TRANSPARENT);
    let p11 = image.pixel(x1, y1).unwrap_or(TRANSPARENT);

    let mut result = [0u8; 4];
    for i in 0..CHANNELS {
        let v = p00[i] as f64 * (1.0 - fx) * (1.0 - fy)
            + p10[i] as f64 * fx * (1.0 - fy)
            + p01[i] as f64 * (1.0 - fx) * fy
            + p11[i] as f64 * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}


// ============================================================================
// Property-Based Tests
// ============================================================================
