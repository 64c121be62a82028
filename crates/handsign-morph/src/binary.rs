//! Binary morphological operations
//!
//! Dilation for 1 bpp images, implemented with word-level
//! shift-and-OR over each row.

use crate::{MorphError, MorphResult, Sel};
use handsign_core::{Pix, PixMut, PixelDepth};

/// Dilate a binary image
///
/// For every hit `(dx, dy)` of the SEL relative to its origin, the
/// output is `out(x, y) |= src(x + dx, y + dy)`. Pixels outside the
/// image are background, so nothing is dilated in from the edges.
pub fn dilate(pix: &Pix, sel: &Sel) -> MorphResult<Pix> {
    check_binary(pix)?;

    let w = pix.width();
    let h = pix.height();
    let wpl = pix.wpl() as usize;

    let mut out_mut = PixMut::new(w, h, PixelDepth::Bit1)?;

    let src_data = pix.data();
    let dst_data = out_mut.data_mut();

    for (dx, dy) in sel.hit_offsets() {
        for y in 0..h as i32 {
            let src_y = y + dy;
            if src_y < 0 || src_y >= h as i32 {
                continue;
            }

            let src_start = src_y as usize * wpl;
            let dst_start = y as usize * wpl;

            shift_or_row(
                &mut dst_data[dst_start..dst_start + wpl],
                &src_data[src_start..src_start + wpl],
                -dx,
            );
        }
    }

    // Right shifts can carry set bits into the row padding
    clear_unused_bits(out_mut.data_mut(), w, wpl);
    Ok(out_mut.into())
}

/// Dilate with a `width x height` brick.
pub fn dilate_brick(pix: &Pix, width: u32, height: u32) -> MorphResult<Pix> {
    if width == 1 && height == 1 {
        check_binary(pix)?;
        return Ok(pix.clone());
    }
    dilate(pix, &Sel::create_brick(width, height)?)
}

/// Shift src row by `shift` pixels and OR into dst (word-level).
///
/// Positive `shift` moves pixels toward higher x: `dst[x] |= src[x - shift]`.
/// Pixels shifted in from outside the row are 0.
#[allow(clippy::needless_range_loop)]
fn shift_or_row(dst: &mut [u32], src: &[u32], shift: i32) {
    let wpl = dst.len();

    if shift == 0 {
        for i in 0..wpl {
            dst[i] |= src[i];
        }
        return;
    }

    let abs_shift = shift.unsigned_abs() as usize;
    let word_shift = abs_shift / 32;
    let bit_shift = (abs_shift % 32) as u32;

    if word_shift >= wpl {
        return;
    }

    if shift > 0 {
        if bit_shift == 0 {
            for i in word_shift..wpl {
                dst[i] |= src[i - word_shift];
            }
        } else {
            dst[word_shift] |= src[0] >> bit_shift;
            for i in (word_shift + 1)..wpl {
                let si = i - word_shift;
                dst[i] |= (src[si] >> bit_shift) | (src[si - 1] << (32 - bit_shift));
            }
        }
    } else {
        let end = wpl - word_shift;
        if bit_shift == 0 {
            for i in 0..end {
                dst[i] |= src[i + word_shift];
            }
        } else {
            for i in 0..end.saturating_sub(1) {
                let si = i + word_shift;
                dst[i] |= (src[si] << bit_shift) | (src[si + 1] >> (32 - bit_shift));
            }
            dst[end - 1] |= src[wpl - 1] << bit_shift;
        }
    }
}

/// Clear the padding bits past `width` in the last word of each row.
fn clear_unused_bits(data: &mut [u32], width: u32, wpl: usize) {
    let extra = width % 32;
    if extra == 0 {
        return;
    }
    // MSB-first: valid bits are the top `extra` bits
    let mask = !0u32 << (32 - extra);
    for row in data.chunks_exact_mut(wpl) {
        row[wpl - 1] &= mask;
    }
}

fn check_binary(pix: &Pix) -> MorphResult<()> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(MorphError::UnsupportedDepth {
            expected: "1-bpp binary",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_pixel(w: u32, h: u32, x: u32, y: u32) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit1).unwrap();
        pm.set_pixel_unchecked(x, y, 1);
        pm.into()
    }

    #[test]
    fn test_dilate_point_with_disk() {
        let pix = single_pixel(40, 20, 20, 10);
        let sel = Sel::create_disk(5).unwrap();
        let out = dilate(&pix, &sel).unwrap();
        assert_eq!(out.count_pixels().unwrap(), 89);
        assert_eq!(out.get_pixel(15, 10), Some(1));
        assert_eq!(out.get_pixel(25, 10), Some(1));
        assert_eq!(out.get_pixel(20, 5), Some(1));
        assert_eq!(out.get_pixel(19, 5), Some(0));
        assert_eq!(out.get_pixel(14, 10), Some(0));
    }

    #[test]
    fn test_dilate_across_word_boundary() {
        let pix = single_pixel(70, 3, 31, 1);
        let out = dilate_brick(&pix, 3, 1).unwrap();
        assert_eq!(out.get_pixel(30, 1), Some(1));
        assert_eq!(out.get_pixel(32, 1), Some(1));
        assert_eq!(out.count_pixels().unwrap(), 3);
    }

    #[test]
    fn test_dilate_clips_at_edges() {
        // Right edge of a width that is not a multiple of 32
        let pix = single_pixel(35, 3, 34, 0);
        let out = dilate_brick(&pix, 5, 3).unwrap();
        // 3 columns (32..=34) by 2 rows (0..=1)
        assert_eq!(out.count_pixels().unwrap(), 6);
    }

    #[test]
    fn test_dilate_rejects_gray() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        let sel = Sel::create_brick(3, 3).unwrap();
        assert!(dilate(&pix, &sel).is_err());
    }
}
