//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels.
//!
//! # Pixel packing
//!
//! Pixels are packed MSB-to-LSB within each 32-bit word. For example,
//! in a 1-bit image, pixel 0 occupies bit 31 (MSB) of the first word.

use super::{Pix, PixMut, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

/// Read the pixel at `x` from a packed row.
#[inline]
fn get_in_line(line: &[u32], x: u32, depth: PixelDepth) -> u32 {
    match depth {
        PixelDepth::Bit1 => get_data_bit(line, x),
        PixelDepth::Bit8 => get_data_byte(line, x),
        PixelDepth::Bit32 => line[x as usize],
    }
}

/// Write the pixel at `x` into a packed row.
#[inline]
fn set_in_line(line: &mut [u32], x: u32, val: u32, depth: PixelDepth) {
    match depth {
        PixelDepth::Bit1 => set_data_bit(line, x, val),
        PixelDepth::Bit8 => set_data_byte(line, x, val),
        PixelDepth::Bit32 => line[x as usize] = val,
    }
}

impl Pix {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height` or `x` falls outside the row's words.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        get_in_line(self.row_data(y), x, self.depth())
    }

    /// Get RGB values at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if self.depth() != PixelDepth::Bit32 {
            return None;
        }
        self.get_pixel(x, y).map(color::extract_rgb)
    }
}

impl PixMut {
    /// Get a pixel value at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        let wpl = self.wpl() as usize;
        let start = y as usize * wpl;
        get_in_line(&self.data()[start..start + wpl], x, self.depth())
    }

    /// Set a pixel value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds,
    /// [`Error::ValueOutOfRange`] if `val` does not fit the depth.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.width() {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width() as usize,
            });
        }
        if y >= self.height() {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height() as usize,
            });
        }
        let max = self.depth().max_value();
        if val > max {
            return Err(Error::ValueOutOfRange { value: val, max });
        }
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set a pixel value without bounds checking.
    ///
    /// Values wider than the depth are truncated to its low bits.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height` or `x` falls outside the row's words.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let depth = self.depth();
        set_in_line(self.row_data_mut(y), x, val, depth);
    }

    /// Set an RGB pixel at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        self.set_pixel(x, y, color::compose_rgb(r, g, b))
    }
}

/// Get a 1-bit pixel value.
///
/// Pixels are packed MSB to LSB within each 32-bit word.
#[inline]
pub fn get_data_bit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 5) as usize] >> (31 - (x & 31))) & 1
}

/// Set a 1-bit pixel value.
#[inline]
pub fn set_data_bit(line: &mut [u32], x: u32, val: u32) {
    if val & 1 != 0 {
        set_data_bit_val(line, x);
    } else {
        clear_data_bit(line, x);
    }
}

/// Set a 1-bit pixel to 1.
#[inline]
pub fn set_data_bit_val(line: &mut [u32], x: u32) {
    line[(x >> 5) as usize] |= 0x8000_0000 >> (x & 31);
}

/// Clear a 1-bit pixel to 0.
#[inline]
pub fn clear_data_bit(line: &mut [u32], x: u32) {
    line[(x >> 5) as usize] &= !(0x8000_0000 >> (x & 31));
}

/// Get an 8-bit pixel value.
#[inline]
pub fn get_data_byte(line: &[u32], x: u32) -> u32 {
    (line[(x >> 2) as usize] >> (8 * (3 - (x & 3)))) & 0xff
}

/// Set an 8-bit pixel value.
#[inline]
pub fn set_data_byte(line: &mut [u32], x: u32, val: u32) {
    let shift = 8 * (3 - (x & 3));
    let word = &mut line[(x >> 2) as usize];
    *word = (*word & !(0xff << shift)) | ((val & 0xff) << shift);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_packing_msb_first() {
        let mut line = [0u32; 2];
        set_data_bit_val(&mut line, 0);
        set_data_bit_val(&mut line, 33);
        assert_eq!(line[0], 0x8000_0000);
        assert_eq!(line[1], 0x4000_0000);
        assert_eq!(get_data_bit(&line, 33), 1);
        clear_data_bit(&mut line, 0);
        assert_eq!(line[0], 0);
    }

    #[test]
    fn test_byte_packing() {
        let mut line = [0u32; 1];
        set_data_byte(&mut line, 0, 0x12);
        set_data_byte(&mut line, 3, 0xab);
        assert_eq!(line[0], 0x1200_00ab);
        assert_eq!(get_data_byte(&line, 3), 0xab);
    }

    #[test]
    fn test_set_get_pixel_rgb() {
        let mut pm = Pix::new(3, 2, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_rgb(2, 1, 10, 20, 30).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_rgb(2, 1), Some((10, 20, 30)));
        assert_eq!(pix.get_rgb(3, 1), None);
    }

    #[test]
    fn test_set_pixel_bounds() {
        let mut pm = Pix::new(3, 2, PixelDepth::Bit1).unwrap().to_mut();
        assert!(pm.set_pixel(3, 0, 1).is_err());
        assert!(pm.set_pixel(0, 0, 2).is_err());
        pm.set_pixel(2, 1, 1).unwrap();
        assert_eq!(pm.get_pixel(2, 1), Some(1));
    }
}
