//! handsign Color - Color processing for hand segmentation
//!
//! - **Color space conversion** ([`colorspace`]): RGB -> 8-bit HSV
//! - **Thresholding** ([`threshold`]): inclusive HSV window to binary mask

pub mod colorspace;
pub mod error;
pub mod threshold;

// Re-export core types
pub use handsign_core;

pub use error::{ColorError, ColorResult};

pub use colorspace::{Hsv, pix_convert_rgb_to_hsv, pix_convert_to_rgb, rgb_to_hsv};

pub use threshold::{hsv_in_range, pix_threshold_hsv_range};
