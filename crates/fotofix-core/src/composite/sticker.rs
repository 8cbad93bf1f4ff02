//! Sticker placement with source-over alpha compositing.

use crate::error::EditError;
use crate::raster::{RasterImage, CHANNELS};

/// Composite `sticker` onto `canvas`, centered on pixel `(center_x, center_y)`.
///
/// The top-left corner is `center - size / 2` (integer division). Parts that
/// extend past the right or bottom edge are clipped.
///
/// # Errors
///
/// - `EditError::OutOfBounds` if the center is outside the canvas
/// - `EditError::InvalidPlacement` if the top-left corner would be negative
pub fn paste_sticker(
    canvas: &RasterImage,
    sticker: &RasterImage,
    center_x: u32,
    center_y: u32,
) -> Result<RasterImage, EditError> {
    if center_x >= canvas.width || center_y >= canvas.height {
        return Err(EditError::OutOfBounds {
            x: center_x as i64,
            y: center_y as i64,
            width: canvas.width,
            height: canvas.height,
        });
    }

    let left = center_x as i64 - (sticker.width / 2) as i64;
    let top = center_y as i64 - (sticker.height / 2) as i64;
    if left < 0 || top < 0 {
        return Err(EditError::InvalidPlacement { x: left, y: top });
    }
    let (left, top) = (left as u32, top as u32);

    let mut output = canvas.clone();
    let visible_w = sticker.width.min(canvas.width - left);
    let visible_h = sticker.height.min(canvas.height - top);

    for sy in 0..visible_h {
        for sx in 0..visible_w {
            let src = sticker.index(sx, sy);
            let dst = output.index(left + sx, top + sy);
            let over = source_over(
                &sticker.pixels[src..src + CHANNELS],
                &output.pixels[dst..dst + CHANNELS],
            );
            output.pixels[dst..dst + CHANNELS].copy_from_slice(&over);
        }
    }

    log::trace!(
        "Pasted {}x{} sticker at ({}, {})",
        sticker.width,
        sticker.height,
        left,
        top
    );
    Ok(output)
}

/// Porter-Duff "over" for straight (non-premultiplied) RGBA.
fn source_over(src: &[u8], dst: &[u8]) -> [u8; 4] {
    match src[3] {
        255 => return [src[0], src[1], src[2], 255],
        0 => return [dst[0], dst[1], dst[2], dst[3]],
        _ => {}
    }

    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}
