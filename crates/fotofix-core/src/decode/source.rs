//! Decoding of source images and stickers into RGBA rasters.

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{DecodeError, Orientation};
use crate::raster::RasterImage;

/// Decode image bytes into an RGBA raster.
///
/// The format is guessed from the content. JPEG inputs are rotated/flipped
/// according to their EXIF orientation tag.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a known format.
/// Returns `DecodeError::CorruptedFile` if decoding fails part-way.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let format = reader.format().ok_or(DecodeError::InvalidFormat)?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let orientation = if format == ImageFormat::Jpeg {
        extract_orientation(bytes)
    } else {
        Orientation::Normal
    };

    let oriented = apply_orientation(img, orientation);
    Ok(RasterImage::from_rgba_image(oriented.into_rgba8()))
}

/// Read and decode an image file.
pub fn open_image(path: impl AsRef<Path>) -> Result<RasterImage, DecodeError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| DecodeError::Io(format!("{}: {}", path.display(), e)))?;
    decode_image(&bytes)
}

/// EXIF orientation of JPEG bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    fn png_bytes(img: &image::RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let pixels = vec![128u8; (width * height * 3) as usize];
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, 90)
            .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    #[test]
    fn test_decode_png_preserves_alpha() {
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(1, 1, image::Rgba([10, 20, 30, 40]));

        let decoded = decode_image(&png_bytes(&img)).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.pixel(1, 1), Some([10, 20, 30, 40]));
        assert_eq!(decoded.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_decode_jpeg_is_opaque() {
        let decoded = decode_image(&jpeg_bytes(8, 4)).unwrap();
        assert_eq!((decoded.width, decoded.height), (8, 4));
        assert!(decoded.pixels.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_decode_unknown_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(&image::RgbaImage::new(16, 16));
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_image("/definitely/not/here.png");
        assert!(matches!(result, Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_orientation_without_exif() {
        assert_eq!(extract_orientation(&jpeg_bytes(2, 2)), Orientation::Normal);
        assert_eq!(extract_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90() {
        let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgba8(img), Orientation::Rotate90CW);
        assert_eq!(result.into_rgba8().dimensions(), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgba8(img), Orientation::FlipHorizontal)
            .into_rgba8();
        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }
}
