//! Hand segmentation
//!
//! Turns a color frame into a fixed-size binary mask of the hand:
//!
//! 1. RGB to 8-bit HSV
//! 2. Inclusive HSV window threshold
//! 3. Binary median (majority) filter
//! 4. Dilation with a disk
//! 5. Nearest-neighbour resize to the output size

use crate::range::SegmentationRange;
use crate::{RecogError, RecogResult};
use handsign_color::{pix_convert_rgb_to_hsv, pix_convert_to_rgb, pix_threshold_hsv_range};
use handsign_core::{Pix, PixelDepth};
use handsign_filter::median_filter;
use handsign_morph::{Sel, dilate};
use handsign_transform::scale_to_size_sampled;

/// Output mask width.
pub const MASK_WIDTH: u32 = 640;

/// Output mask height.
pub const MASK_HEIGHT: u32 = 480;

/// Options for segmentation
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// Side of the square median window, odd (default: 5)
    pub median_size: u32,
    /// Radius of the dilation disk; 0 disables dilation (default: 5)
    pub dilation_radius: u32,
    /// Output mask width (default: 640)
    pub output_width: u32,
    /// Output mask height (default: 480)
    pub output_height: u32,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            median_size: 5,
            dilation_radius: 5,
            output_width: MASK_WIDTH,
            output_height: MASK_HEIGHT,
        }
    }
}

impl SegmentOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the median window size
    pub fn with_median_size(mut self, size: u32) -> Self {
        self.median_size = size;
        self
    }

    /// Set the dilation disk radius
    pub fn with_dilation_radius(mut self, radius: u32) -> Self {
        self.dilation_radius = radius;
        self
    }

    /// Set the output mask size
    pub fn with_output_size(mut self, width: u32, height: u32) -> Self {
        self.output_width = width;
        self.output_height = height;
        self
    }

    /// Number of features produced by a mask of the output size.
    pub fn feature_len(&self) -> usize {
        self.output_width as usize * self.output_height as usize
    }

    /// Validate options
    pub fn validate(&self) -> RecogResult<()> {
        if self.median_size == 0 || self.median_size % 2 == 0 {
            return Err(RecogError::InvalidParameter(
                "median_size must be odd".to_string(),
            ));
        }
        if self.output_width == 0 || self.output_height == 0 {
            return Err(RecogError::InvalidParameter(
                "output size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Segment a frame with the default options.
///
/// Returns a 1 bpp mask of exactly 640x480 pixels.
///
/// # Errors
///
/// - [`RecogError::InvalidRange`] if any bound is outside its channel
///   domain or a lower bound exceeds its upper bound
/// - [`RecogError::UnsupportedDepth`] for 1 bpp input
pub fn segment(pix: &Pix, range: &SegmentationRange) -> RecogResult<Pix> {
    segment_with_options(pix, range, &SegmentOptions::default())
}

/// Segment a frame with explicit options.
pub fn segment_with_options(
    pix: &Pix,
    range: &SegmentationRange,
    options: &SegmentOptions,
) -> RecogResult<Pix> {
    let (lower, upper) = range.bounds()?;
    options.validate()?;
    if pix.depth() == PixelDepth::Bit1 {
        return Err(RecogError::UnsupportedDepth {
            expected: "8 or 32 bpp color",
            actual: 1,
        });
    }

    let rgb = pix_convert_to_rgb(pix)?;
    let hsv = pix_convert_rgb_to_hsv(&rgb)?;
    let mask = pix_threshold_hsv_range(&hsv, lower, upper)?;
    let mask = median_filter(&mask, options.median_size, options.median_size)?;
    let mask = if options.dilation_radius > 0 {
        dilate(&mask, &Sel::create_disk(options.dilation_radius)?)?
    } else {
        mask
    };
    Ok(scale_to_size_sampled(
        &mask,
        options.output_width,
        options.output_height,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use handsign_core::{PixMut, color};

    fn uniform(w: u32, h: u32, r: u8, g: u8, b: u8) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit32).unwrap();
        for y in 0..h {
            for x in 0..w {
                pm.set_pixel_unchecked(x, y, color::compose_rgb(r, g, b));
            }
        }
        pm.into()
    }

    #[test]
    fn test_output_geometry() {
        let pix = uniform(50, 30, 100, 60, 40);
        let mask = segment(&pix, &SegmentationRange::TRAINING).unwrap();
        assert_eq!(mask.width(), MASK_WIDTH);
        assert_eq!(mask.height(), MASK_HEIGHT);
        assert_eq!(mask.depth(), PixelDepth::Bit1);
    }

    #[test]
    fn test_uniform_frames() {
        let range = SegmentationRange::new(0, 180, 0, 255, 1, 255);
        let black = segment(&uniform(32, 24, 0, 0, 0), &range).unwrap();
        assert_eq!(black.count_pixels().unwrap(), 0);
        let white = segment(&uniform(32, 24, 255, 255, 255), &range).unwrap();
        assert_eq!(white.count_pixels().unwrap(), (MASK_WIDTH * MASK_HEIGHT) as u64);
    }

    #[test]
    fn test_invalid_range() {
        let pix = uniform(8, 8, 0, 0, 0);
        let err = segment(&pix, &SegmentationRange::new(50, 40, 0, 255, 0, 255));
        assert!(matches!(err, Err(RecogError::InvalidRange(_))));
        let err = segment(&pix, &SegmentationRange::new(0, 200, 0, 255, 0, 255));
        assert!(matches!(err, Err(RecogError::InvalidRange(_))));
    }

    #[test]
    fn test_gray_input_is_promoted() {
        let gray = Pix::new(16, 16, PixelDepth::Bit8).unwrap();
        let mask = segment(&gray, &SegmentationRange::new(0, 180, 0, 255, 0, 255)).unwrap();
        assert_eq!(mask.count_pixels().unwrap(), (MASK_WIDTH * MASK_HEIGHT) as u64);
        let binary = Pix::new(16, 16, PixelDepth::Bit1).unwrap();
        assert!(segment(&binary, &SegmentationRange::TRAINING).is_err());
    }
}
