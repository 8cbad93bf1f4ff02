//! Block pixelation.
//!
//! The user factor in `[0, 1]` is rescaled into `[0.3, 0.7]`, so 0 still
//! produces small blocks and 1 never collapses the image into a single
//! block. The grid is computed independently for each axis:
//!
//! ```text
//! count = max(round((1 - scaled) * len), 1)
//! size  = round(len / count)
//! ```
//!
//! Rounding is half-to-even. When `count * size` falls short of `len` one
//! extra block is added; anything still past the last block is left as it
//! was. When `size` rounds up, trailing blocks can start past the edge;
//! those are skipped.

use crate::error::EditError;
use crate::raster::{RasterImage, CHANNELS};

const MIN_SCALE: f64 = 0.3;
const MAX_SCALE: f64 = 0.7;

/// Block layout for one pixelation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGrid {
    pub cols: u32,
    pub rows: u32,
    pub block_width: u32,
    pub block_height: u32,
}

impl BlockGrid {
    /// Grid for a `width` x `height` image at user `factor`.
    pub fn new(width: u32, height: u32, factor: f64) -> Self {
        let scaled = factor * (MAX_SCALE - MIN_SCALE) + MIN_SCALE;
        let (cols, block_width) = axis(width, scaled);
        let (rows, block_height) = axis(height, scaled);
        Self {
            cols,
            rows,
            block_width,
            block_height,
        }
    }
}

fn axis(len: u32, scaled: f64) -> (u32, u32) {
    let mut count = ((1.0 - scaled) * len as f64).round_ties_even().max(1.0) as u32;
    let size = (len as f64 / count as f64).round_ties_even().max(1.0) as u32;
    if size * count < len {
        count += 1;
    }
    (count, size)
}

/// Pixelate `source` at `factor`.
///
/// Each block is filled with the integer-floor mean of its RGB values.
/// Every pixel keeps its own alpha. `factor == 0` returns an unchanged copy.
///
/// # Errors
/// `EditError::InvalidParameter` if `factor` is outside `[0, 1]`.
pub fn pixelate(source: &RasterImage, factor: f64) -> Result<RasterImage, EditError> {
    if !(0.0..=1.0).contains(&factor) {
        return Err(EditError::invalid(
            "factor",
            format!("pixelation factor must be within [0, 1], got {}", factor),
        ));
    }
    if factor == 0.0 {
        return Ok(source.clone());
    }

    let grid = BlockGrid::new(source.width, source.height, factor);
    let mut output = source.clone();

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            if let Err(e) = fill_block(source, &mut output, &grid, row, col) {
                // Block left as it was
                log::trace!("{}", e);
            }
        }
    }

    log::debug!(
        "Pixelated {}x{} into {}x{} blocks of {}x{}",
        source.width,
        source.height,
        grid.cols,
        grid.rows,
        grid.block_width,
        grid.block_height
    );
    Ok(output)
}

fn fill_block(
    source: &RasterImage,
    output: &mut RasterImage,
    grid: &BlockGrid,
    row: u32,
    col: u32,
) -> Result<(), EditError> {
    let x0 = col.saturating_mul(grid.block_width).min(source.width);
    let x1 = (col + 1).saturating_mul(grid.block_width).min(source.width);
    let y0 = row.saturating_mul(grid.block_height).min(source.height);
    let y1 = (row + 1).saturating_mul(grid.block_height).min(source.height);

    if x0 >= x1 || y0 >= y1 {
        return Err(EditError::EmptyRegion { row, col });
    }

    let mut sum = [0u64; 3];
    for y in y0..y1 {
        let start = source.index(x0, y);
        let end = source.index(x1 - 1, y) + CHANNELS;
        for px in source.pixels[start..end].chunks_exact(CHANNELS) {
            sum[0] += px[0] as u64;
            sum[1] += px[1] as u64;
            sum[2] += px[2] as u64;
        }
    }

    let count = (x1 - x0) as u64 * (y1 - y0) as u64;
    let avg = sum.map(|s| (s / count) as u8);

    for y in y0..y1 {
        let start = output.index(x0, y);
        let end = output.index(x1 - 1, y) + CHANNELS;
        for px in output.pixels[start..end].chunks_exact_mut(CHANNELS) {
            px[..3].copy_from_slice(&avg);
        }
    }
    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
