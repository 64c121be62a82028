//! Mask flattening

use crate::segment::{MASK_HEIGHT, MASK_WIDTH};
use crate::{RecogError, RecogResult};
use handsign_core::{Pix, PixelDepth};

/// Length of the feature vector of a default-size mask.
pub const FEATURE_LEN: usize = (MASK_WIDTH * MASK_HEIGHT) as usize;

/// Flatten a 1 bpp mask row-major into 0.0 / 1.0 features.
pub fn mask_to_features(mask: &Pix) -> RecogResult<Vec<f32>> {
    if mask.depth() != PixelDepth::Bit1 {
        return Err(RecogError::UnsupportedDepth {
            expected: "1-bpp mask",
            actual: mask.depth().bits(),
        });
    }
    let w = mask.width() as usize;
    let mut features = Vec::with_capacity(w * mask.height() as usize);
    for y in 0..mask.height() {
        let row = mask.row_data(y);
        features.extend((0..w).map(|x| ((row[x >> 5] >> (31 - (x & 31))) & 1) as f32));
    }
    Ok(features)
}
