//! PNG encoding of RGBA rasters.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use crate::raster::{RasterImage, CHANNELS};

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode a raster to PNG bytes.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, EncodeError> {
    encode_rgba_png(&image.pixels, image.width, image.height)
}

/// Encode raw RGBA pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn encode_rgba_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = width as usize * height as usize * CHANNELS;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_image;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_basic() {
        let img = RasterImage::filled(10, 10, [128, 64, 32, 255]);
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_keeps_transparency() {
        let mut img = RasterImage::filled(2, 2, [200, 100, 50, 255]);
        img.pixels[3] = 0;

        let decoded = decode_image(&encode_png(&img).unwrap()).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_encode_png_invalid_pixel_data() {
        let result = encode_rgba_png(&[0u8; 15], 2, 2);
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn test_encode_png_zero_width() {
        let result = encode_rgba_png(&[], 0, 10);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_png_zero_height() {
        let result = encode_rgba_png(&[], 10, 0);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }
}
