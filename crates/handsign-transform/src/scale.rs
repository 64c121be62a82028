//! Image scaling by sampling
//!
//! Nearest-neighbour scaling works at every depth and never introduces
//! new pixel values, so binary masks stay binary.

use crate::{TransformError, TransformResult};
use handsign_core::{Pix, PixMut};

/// Scale to an exact output size by nearest-neighbour sampling.
///
/// Destination pixel `(x, y)` takes source pixel
/// `(floor(x * w / width), floor(y * h / height))`.
pub fn scale_to_size_sampled(pix: &Pix, width: u32, height: u32) -> TransformResult<Pix> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidParameters(format!(
            "output size must be non-zero: {}x{}",
            width, height
        )));
    }
    let ws = pix.width() as u64;
    let hs = pix.height() as u64;
    if ws == width as u64 && hs == height as u64 {
        return Ok(pix.clone());
    }

    let xmap: Vec<u32> = (0..width as u64)
        .map(|x| (x * ws / width as u64) as u32)
        .collect();

    let mut out = PixMut::new(width, height, pix.depth())?;
    out.set_spp(pix.spp());
    for y in 0..height {
        let sy = (y as u64 * hs / height as u64) as u32;
        for (x, &sx) in xmap.iter().enumerate() {
            out.set_pixel_unchecked(x as u32, y, pix.get_pixel_unchecked(sx, sy));
        }
    }
    Ok(out.into())
}

/// Scale by independent factors using nearest-neighbour sampling.
///
/// The output size is `round(w * scale_x) x round(h * scale_y)`,
/// at least 1 in each direction.
pub fn scale_by_sampling(pix: &Pix, scale_x: f32, scale_y: f32) -> TransformResult<Pix> {
    if !(scale_x > 0.0 && scale_y > 0.0) || !scale_x.is_finite() || !scale_y.is_finite() {
        return Err(TransformError::InvalidScaleFactor(format!(
            "{} x {}",
            scale_x, scale_y
        )));
    }
    let width = ((pix.width() as f32 * scale_x).round() as u32).max(1);
    let height = ((pix.height() as f32 * scale_y).round() as u32).max(1);
    scale_to_size_sampled(pix, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use handsign_core::PixelDepth;

    #[test]
    fn test_upscale_binary() {
        let mut pm = PixMut::new(2, 2, PixelDepth::Bit1).unwrap();
        pm.set_pixel(1, 0, 1).unwrap();
        let out = scale_to_size_sampled(&pm.into(), 640, 480).unwrap();
        assert_eq!(out.width(), 640);
        assert_eq!(out.height(), 480);
        assert_eq!(out.depth(), PixelDepth::Bit1);
        assert_eq!(out.count_pixels().unwrap(), 320 * 240);
        assert_eq!(out.get_pixel(320, 0), Some(1));
        assert_eq!(out.get_pixel(319, 0), Some(0));
        assert_eq!(out.get_pixel(639, 240), Some(0));
    }

    #[test]
    fn test_downscale_picks_floor() {
        let mut pm = PixMut::new(4, 1, PixelDepth::Bit8).unwrap();
        for x in 0..4 {
            pm.set_pixel(x, 0, x * 10).unwrap();
        }
        let out = scale_to_size_sampled(&pm.into(), 2, 1).unwrap();
        assert_eq!(out.get_pixel(0, 0), Some(0));
        assert_eq!(out.get_pixel(1, 0), Some(20));
    }

    #[test]
    fn test_same_size_shares_data() {
        let pix = Pix::new(8, 8, PixelDepth::Bit32).unwrap();
        let out = scale_to_size_sampled(&pix, 8, 8).unwrap();
        assert!(std::ptr::eq(out.data().as_ptr(), pix.data().as_ptr()));
    }

    #[test]
    fn test_invalid_sizes() {
        let pix = Pix::new(8, 8, PixelDepth::Bit1).unwrap();
        assert!(scale_to_size_sampled(&pix, 0, 8).is_err());
        assert!(scale_by_sampling(&pix, -1.0, 1.0).is_err());
        assert_eq!(scale_by_sampling(&pix, 0.5, 2.0).unwrap().height(), 16);
    }
}
