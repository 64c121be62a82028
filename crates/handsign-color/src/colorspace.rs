//! Color space conversion
//!
//! HSV here uses the 8-bit convention common in computer vision:
//!
//! - `h`: hue in half-degrees, range [0, 180)
//! - `s`: saturation, range [0, 255]
//! - `v`: value, range [0, 255]
//!
//! HSV images are 32 bpp with H, S and V stored in the red, green and
//! blue slots of each pixel.

use crate::{ColorError, ColorResult};
use handsign_core::{Pix, PixMut, PixelDepth, color};

/// HSV color in 8-bit channel form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    /// Create a new HSV color
    pub fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Pack into a 32-bit pixel, H/S/V in the R/G/B slots.
    #[inline]
    pub fn to_pixel(self) -> u32 {
        color::compose_rgb(self.h, self.s, self.v)
    }

    /// Unpack from a 32-bit pixel written by [`Hsv::to_pixel`].
    #[inline]
    pub fn from_pixel(pixel: u32) -> Self {
        let (h, s, v) = color::extract_rgb(pixel);
        Self { h, s, v }
    }
}

/// Convert an RGB triple to 8-bit HSV.
///
/// When two channels tie for the maximum, red takes precedence over
/// green and green over blue. Gray pixels have hue 0; black has
/// saturation 0.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (ri, gi, bi) = (r as i32, g as i32, b as i32);
    let v = ri.max(gi).max(bi);
    let min = ri.min(gi).min(bi);
    let diff = v - min;

    let s = if v == 0 {
        0
    } else {
        (255.0 * diff as f64 / v as f64).round() as i32
    };

    let h = if diff == 0 {
        0
    } else {
        let raw = if v == ri {
            30.0 * (gi - bi) as f64 / diff as f64
        } else if v == gi {
            60.0 + 30.0 * (bi - ri) as f64 / diff as f64
        } else {
            120.0 + 30.0 * (ri - gi) as f64 / diff as f64
        };
        // Round half up before wrapping, so -0.5 maps to 0
        let h = (raw + 0.5).floor() as i32;
        if h < 0 { h + 180 } else { h }
    };

    Hsv {
        h: h as u8,
        s: s as u8,
        v: v as u8,
    }
}

/// Convert an RGB image to an HSV image
///
/// Input must be 32 bpp. The output stores H, S, V in the R, G, B slots.
pub fn pix_convert_rgb_to_hsv(pix: &Pix) -> ColorResult<Pix> {
    if pix.depth() != PixelDepth::Bit32 {
        return Err(ColorError::UnsupportedDepth {
            expected: "32-bpp RGB",
            actual: pix.depth().bits(),
        });
    }

    let mut out = pix.create_template().into_mut();
    out.set_spp(3);
    for y in 0..pix.height() {
        let src = pix.row_data(y);
        let dst = out.row_data_mut(y);
        for (d, &s) in dst.iter_mut().zip(src.iter()) {
            let (r, g, b) = color::extract_rgb(s);
            *d = rgb_to_hsv(r, g, b).to_pixel();
        }
    }
    Ok(out.into())
}

/// Promote an image to 32 bpp RGB.
///
/// 32 bpp input is returned as a shared handle; 8 bpp gray is replicated
/// into all three channels. 1 bpp input is rejected.
pub fn pix_convert_to_rgb(pix: &Pix) -> ColorResult<Pix> {
    match pix.depth() {
        PixelDepth::Bit32 => Ok(pix.clone()),
        PixelDepth::Bit8 => {
            let mut out = PixMut::new(pix.width(), pix.height(), PixelDepth::Bit32)?;
            for y in 0..pix.height() {
                for x in 0..pix.width() {
                    let g = pix.get_pixel_unchecked(x, y) as u8;
                    out.set_pixel_unchecked(x, y, color::compose_rgb(g, g, g));
                }
            }
            Ok(out.into())
        }
        PixelDepth::Bit1 => Err(ColorError::UnsupportedDepth {
            expected: "8 or 32 bpp",
            actual: 1,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hsv_primaries() {
        assert_eq!(rgb_to_hsv(255, 0, 0), Hsv::new(0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), Hsv::new(60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), Hsv::new(120, 255, 255));
        assert_eq!(rgb_to_hsv(255, 255, 0), Hsv::new(30, 255, 255));
        assert_eq!(rgb_to_hsv(255, 0, 255), Hsv::new(150, 255, 255));
    }

    #[test]
    fn test_rgb_to_hsv_gray() {
        assert_eq!(rgb_to_hsv(0, 0, 0), Hsv::new(0, 0, 0));
        assert_eq!(rgb_to_hsv(255, 255, 255), Hsv::new(0, 0, 255));
        assert_eq!(rgb_to_hsv(128, 128, 128), Hsv::new(0, 0, 128));
    }

    #[test]
    fn test_rgb_to_hsv_rounding_and_wrap() {
        // Slightly-blue red wraps below zero
        let hsv = rgb_to_hsv(200, 100, 110);
        assert_eq!(hsv.h, 177);
        assert_eq!(hsv.v, 200);
        assert_eq!(hsv.s, 128);
    }

    #[test]
    fn test_hue_half_rounds_up() {
        // raw hue is exactly -0.5
        assert_eq!(rgb_to_hsv(100, 40, 41).h, 0);
        // raw hue is exactly -1.5
        assert_eq!(rgb_to_hsv(100, 40, 43).h, 179);
        // raw hue is exactly 0.5
        assert_eq!(rgb_to_hsv(100, 41, 40).h, 1);
    }

    #[test]
    fn test_pix_convert_rgb_to_hsv() {
        let mut pm = Pix::new(2, 1, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_rgb(0, 0, 0, 255, 0).unwrap();
        pm.set_rgb(1, 0, 10, 10, 10).unwrap();
        let hsv = pix_convert_rgb_to_hsv(&pm.into()).unwrap();
        assert_eq!(
            Hsv::from_pixel(hsv.get_pixel(0, 0).unwrap()),
            Hsv::new(60, 255, 255)
        );
        assert_eq!(
            Hsv::from_pixel(hsv.get_pixel(1, 0).unwrap()),
            Hsv::new(0, 0, 10)
        );
    }

    #[test]
    fn test_depth_checks() {
        let pix = Pix::new(2, 2, PixelDepth::Bit1).unwrap();
        assert!(pix_convert_rgb_to_hsv(&pix).is_err());
        assert!(pix_convert_to_rgb(&pix).is_err());

        let mut gray = Pix::new(2, 2, PixelDepth::Bit8).unwrap().to_mut();
        gray.set_pixel(1, 1, 77).unwrap();
        let rgb = pix_convert_to_rgb(&gray.into()).unwrap();
        assert_eq!(rgb.get_rgb(1, 1), Some((77, 77, 77)));
    }
}
