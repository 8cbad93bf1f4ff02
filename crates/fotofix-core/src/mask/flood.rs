//! Scanline flood fill.
//!
//! Work items are horizontal row segments `(left, right, y)` held on an
//! explicit stack. Each popped segment probes the rows directly above and
//! below; every matching, unselected probe grows a new segment by scanning
//! left and right from that point. Segments already processed are skipped.
//! Connectivity is 4-directional.

use std::collections::HashSet;

use super::{ColorMatcher, SelectionMask};
use crate::error::EditError;
use crate::raster::RasterImage;

type Segment = (u32, u32, u32);

/// Select the 4-connected region around `(seed_x, seed_y)` whose colors are
/// similar to the seed pixel's color.
///
/// # Errors
///
/// - `EditError::OutOfBounds` if the seed is outside the image
/// - `EditError::InvalidParameter` if `threshold` is outside `[0, 1]`
pub fn flood_select(
    image: &RasterImage,
    seed_x: u32,
    seed_y: u32,
    threshold: f64,
) -> Result<SelectionMask, EditError> {
    let matcher = ColorMatcher::at(image, seed_x, seed_y, threshold)?;
    let mut mask = SelectionMask::new(image.width, image.height);

    let seed_row = grow_row(image, &matcher, &mut mask, seed_x, seed_y);
    let mut stack: Vec<Segment> = vec![seed_row];
    let mut done: HashSet<Segment> = HashSet::new();

    while let Some(segment) = stack.pop() {
        if !done.insert(segment) {
            continue;
        }

        let (left, right, y) = segment;
        let neighbours = [y.checked_sub(1), y.checked_add(1).filter(|&b| b < image.height)];

        for x in left..=right {
            for ny in neighbours.into_iter().flatten() {
                if mask.is_selected(x, ny) {
                    continue;
                }
                let matches = image.pixel(x, ny).is_some_and(|c| matcher.matches(c));
                if matches {
                    let grown = grow_row(image, &matcher, &mut mask, x, ny);
                    if !done.contains(&grown) {
                        stack.push(grown);
                    }
                }
            }
        }
    }

    log::trace!(
        "Flood fill from ({}, {}) selected {} pixels",
        seed_x,
        seed_y,
        mask.count()
    );
    Ok(mask)
}

/// Mark the matching run through `(x, y)` and return its bounds.
///
/// `(x, y)` itself must match.
fn grow_row(
    image: &RasterImage,
    matcher: &ColorMatcher,
    mask: &mut SelectionMask,
    x: u32,
    y: u32,
) -> Segment {
    let is_match = |px: u32| image.pixel(px, y).is_some_and(|c| matcher.matches(c));

    let mut left = x;
    while left > 0 && is_match(left - 1) {
        left -= 1;
    }
    let mut right = x;
    while right + 1 < image.width && is_match(right + 1) {
        right += 1;
    }

    for px in left..=right {
        mask.select(px, y);
    }
    (left, right, y)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
