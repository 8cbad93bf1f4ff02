//! Luma calculation using ITU-R BT.601 coefficients.
//!
//! Grayscale conversion, the saturation enhancement, and the contrast mean
//! all share this weighting, so a gray produced by one of them is the same
//! gray the others would produce.

/// 0.299, 0.587 and 0.114 in 16.16 fixed point (sum to 65536).
const FIXED_R: u32 = 19595;
const FIXED_G: u32 = 38470;
const FIXED_B: u32 = 7471;

/// Calculate luma from u8 RGB values (0 to 255).
///
/// Uses 16.16 fixed point with rounding, so pure grays map to themselves.
#[inline]
pub fn calculate_luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let sum = FIXED_R * r as u32 + FIXED_G * g as u32 + FIXED_B * b as u32 + 0x8000;
    (sum >> 16).min(255) as u8
}
