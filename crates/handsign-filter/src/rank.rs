//! Rank filtering operations
//!
//! Order-statistic filters over a `width x height` window centered on
//! each pixel. Pixels outside the image take the value of the nearest
//! edge pixel (replicated border).
//!
//! For a rank `r` in [0.0, 1.0] and a window of `n` pixels, the output
//! is the element at index `min(n - 1, floor(r * n))` of the sorted
//! window. With `r = 0.5` and a 5x5 window that is the 13th smallest
//! value, so a binary median sets a pixel iff at least 13 of its 25
//! neighbours are set.

use crate::{FilterError, FilterResult};
use handsign_core::pix::set_data_bit_val;
use handsign_core::{Pix, PixMut, PixelDepth};

fn check_window(width: u32, height: u32, rank: f32) -> FilterResult<()> {
    if width == 0 || height == 0 || width % 2 == 0 || height % 2 == 0 {
        return Err(FilterError::InvalidParameters(format!(
            "window must have odd, non-zero sides: {}x{}",
            width, height
        )));
    }
    if !(0.0..=1.0).contains(&rank) {
        return Err(FilterError::InvalidParameters(format!(
            "rank {} not in [0.0, 1.0]",
            rank
        )));
    }
    Ok(())
}

/// Index of the selected element in a sorted window of `n` values.
#[inline]
fn rank_index(n: usize, rank: f32) -> usize {
    ((rank as f64 * n as f64) as usize).min(n - 1)
}

#[inline]
fn clamp_coord(v: i64, len: u32) -> u32 {
    v.clamp(0, len as i64 - 1) as u32
}

/// Apply rank filter (auto-dispatch by depth).
///
/// # Arguments
/// * `pix` - Input 1 bpp binary or 8 bpp grayscale image
/// * `width` - Filter window width (odd)
/// * `height` - Filter window height (odd)
/// * `rank` - Rank value in [0.0, 1.0] (0.0=min, 0.5=median, 1.0=max)
pub fn rank_filter(pix: &Pix, width: u32, height: u32, rank: f32) -> FilterResult<Pix> {
    match pix.depth() {
        PixelDepth::Bit1 => rank_filter_binary(pix, width, height, rank),
        PixelDepth::Bit8 => rank_filter_gray(pix, width, height, rank),
        PixelDepth::Bit32 => Err(FilterError::UnsupportedDepth {
            expected: "1 or 8 bpp",
            actual: 32,
        }),
    }
}

/// Apply rank filter to a 1 bpp binary image.
///
/// Window counts come from a summed-area table over the border-padded
/// image, so the cost per pixel does not depend on the window size.
pub fn rank_filter_binary(pix: &Pix, width: u32, height: u32, rank: f32) -> FilterResult<Pix> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(FilterError::UnsupportedDepth {
            expected: "1 bpp",
            actual: pix.depth().bits(),
        });
    }
    check_window(width, height, rank)?;

    let w = pix.width();
    let h = pix.height();
    let rx = (width / 2) as i64;
    let ry = (height / 2) as i64;
    let pw = w as usize + 2 * rx as usize;
    let ph = h as usize + 2 * ry as usize;

    // integral[(py + 1) * (pw + 1) + (px + 1)] = set pixels in [0, px] x [0, py]
    let stride = pw + 1;
    let mut integral = vec![0u32; stride * (ph + 1)];
    for py in 0..ph {
        let sy = clamp_coord(py as i64 - ry, h);
        let row = pix.row_data(sy);
        let mut run = 0u32;
        for px in 0..pw {
            let sx = clamp_coord(px as i64 - rx, w);
            run += (row[(sx >> 5) as usize] >> (31 - (sx & 31))) & 1;
            integral[(py + 1) * stride + px + 1] = integral[py * stride + px + 1] + run;
        }
    }

    let n = (width * height) as usize;
    // Sorted window is zeros then ones; the pick is 1 iff ones >= n - k
    let needed = (n - rank_index(n, rank)) as u32;
    let (ww, wh) = (width as usize, height as usize);

    let mut out = PixMut::new(w, h, PixelDepth::Bit1)?;
    for y in 0..h as usize {
        let dst = out.row_data_mut(y as u32);
        for x in 0..w as usize {
            let count = integral[(y + wh) * stride + x + ww] + integral[y * stride + x]
                - integral[y * stride + x + ww]
                - integral[(y + wh) * stride + x];
            if count >= needed {
                set_data_bit_val(dst, x as u32);
            }
        }
    }
    Ok(out.into())
}

/// Apply rank filter to an 8 bpp grayscale image.
pub fn rank_filter_gray(pix: &Pix, width: u32, height: u32, rank: f32) -> FilterResult<Pix> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8 bpp",
            actual: pix.depth().bits(),
        });
    }
    check_window(width, height, rank)?;

    let w = pix.width();
    let h = pix.height();
    let rx = (width / 2) as i64;
    let ry = (height / 2) as i64;
    let n = (width * height) as usize;
    let k = rank_index(n, rank);

    let mut window = Vec::with_capacity(n);
    let mut out = PixMut::new(w, h, PixelDepth::Bit8)?;
    for y in 0..h {
        for x in 0..w {
            window.clear();
            for dy in -ry..=ry {
                let sy = clamp_coord(y as i64 + dy, h);
                for dx in -rx..=rx {
                    let sx = clamp_coord(x as i64 + dx, w);
                    window.push(pix.get_pixel_unchecked(sx, sy));
                }
            }
            let (_, val, _) = window.select_nth_unstable(k);
            out.set_pixel_unchecked(x, y, *val);
        }
    }
    Ok(out.into())
}

/// Apply median filter (rank = 0.5).
pub fn median_filter(pix: &Pix, width: u32, height: u32) -> FilterResult<Pix> {
    rank_filter(pix, width, height, 0.5)
}

/// Apply minimum filter (rank = 0.0).
pub fn min_filter(pix: &Pix, width: u32, height: u32) -> FilterResult<Pix> {
    rank_filter(pix, width, height, 0.0)
}

/// Apply maximum filter (rank = 1.0).
pub fn max_filter(pix: &Pix, width: u32, height: u32) -> FilterResult<Pix> {
    rank_filter(pix, width, height, 1.0)
}
