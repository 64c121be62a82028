//! Color range thresholding
//!
//! Converts HSV images into 1 bpp masks by testing every pixel against
//! an inclusive per-channel window.

use crate::colorspace::Hsv;
use crate::{ColorError, ColorResult};
use handsign_core::pix::set_data_bit_val;
use handsign_core::{Pix, PixMut, PixelDepth};

/// Check whether `hsv` lies inside `[lower, upper]` on every channel.
#[inline]
pub fn hsv_in_range(hsv: Hsv, lower: Hsv, upper: Hsv) -> bool {
    (lower.h..=upper.h).contains(&hsv.h)
        && (lower.s..=upper.s).contains(&hsv.s)
        && (lower.v..=upper.v).contains(&hsv.v)
}

/// Threshold an HSV image to a binary mask.
///
/// The input is a 32 bpp image as produced by
/// [`pix_convert_rgb_to_hsv`](crate::pix_convert_rgb_to_hsv). Output
/// pixels are 1 where all three channels are within the inclusive
/// window, 0 elsewhere.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] if `lower` exceeds `upper`
/// on any channel.
pub fn pix_threshold_hsv_range(pix: &Pix, lower: Hsv, upper: Hsv) -> ColorResult<Pix> {
    if pix.depth() != PixelDepth::Bit32 {
        return Err(ColorError::UnsupportedDepth {
            expected: "32-bpp HSV",
            actual: pix.depth().bits(),
        });
    }
    if lower.h > upper.h || lower.s > upper.s || lower.v > upper.v {
        return Err(ColorError::InvalidParameters(format!(
            "lower bound {:?} exceeds upper bound {:?}",
            lower, upper
        )));
    }

    let mut mask = PixMut::new(pix.width(), pix.height(), PixelDepth::Bit1)?;
    for y in 0..pix.height() {
        let src = pix.row_data(y);
        let dst = mask.row_data_mut(y);
        for (x, &val) in src.iter().enumerate() {
            if hsv_in_range(Hsv::from_pixel(val), lower, upper) {
                set_data_bit_val(dst, x as u32);
            }
        }
    }
    Ok(mask.into())
}
