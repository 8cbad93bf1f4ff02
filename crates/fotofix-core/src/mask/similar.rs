//! Global similarity selection.

use super::{ColorMatcher, SelectionMask};
use crate::error::EditError;
use crate::raster::{RasterImage, CHANNELS};

/// Select every pixel similar to the color at `(seed_x, seed_y)`,
/// regardless of connectivity.
///
/// # Errors
///
/// Same conditions as [`flood_select`](super::flood_select).
pub fn select_similar(
    image: &RasterImage,
    seed_x: u32,
    seed_y: u32,
    threshold: f64,
) -> Result<SelectionMask, EditError> {
    let matcher = ColorMatcher::at(image, seed_x, seed_y, threshold)?;

    let bits = image
        .pixels
        .chunks_exact(CHANNELS)
        .map(|px| matcher.matches([px[0], px[1], px[2], px[3]]))
        .collect();

    SelectionMask::from_bits(image.width, image.height, bits).ok_or(EditError::MaskMismatch {
        expected: image.pixel_count(),
        actual: image.pixels.len() / CHANNELS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::flood_select;

    #[test]
    fn test_selects_disconnected_matches() {
        // Red at both ends, blue between
        let img = RasterImage::new(
            3,
            1,
            vec![255, 0, 0, 255, 0, 0, 255, 255, 255, 0, 0, 255],
        );
        let global = select_similar(&img, 0, 0, 1.0).unwrap();
        assert_eq!(global.bits(), &[true, false, true]);

        let flood = flood_select(&img, 0, 0, 1.0).unwrap();
        assert_eq!(flood.bits(), &[true, false, false]);
    }

    #[test]
    fn test_threshold_widens_selection() {
        let img = RasterImage::new(2, 1, vec![100, 100, 100, 255, 110, 100, 100, 255]);
        assert_eq!(select_similar(&img, 0, 0, 1.0).unwrap().count(), 1);
        assert_eq!(select_similar(&img, 0, 0, 0.9).unwrap().count(), 2);
    }

    #[test]
    fn test_seed_out_of_bounds() {
        let img = RasterImage::filled(2, 2, [0, 0, 0, 255]);
        assert!(matches!(
            select_similar(&img, 0, 2, 0.5),
            Err(EditError::OutOfBounds { .. })
        ));
    }
}
