//! PIX - The main image container
//!
//! The `Pix` structure is the image type shared by every crate in the
//! workspace. Camera frames and dataset images are 32 bpp, segmentation
//! masks are 1 bpp, intermediate single-channel planes are 8 bpp.
//!
//! # Pixel layout
//!
//! - Image data is stored in 32-bit words
//! - Every row starts on a 32-bit boundary
//! - Pixels are packed MSB to LSB within each word
//! - For 32-bit images, color order is RGBA (red in MSB)
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `PixMut` via [`Pix::into_mut`]
//! or [`Pix::to_mut`], then convert back with `Into<Pix>`.

mod access;

pub use access::*;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel depth (bits per pixel)
///
/// Only the depths the gesture pipeline produces are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 1-bit binary image
    Bit1 = 1,
    /// 8-bit grayscale or single channel plane
    Bit8 = 8,
    /// 32-bit RGB or RGBA
    Bit32 = 32,
}

impl PixelDepth {
    /// Create `PixelDepth` from a raw bit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] if `bits` is not 1, 8, or 32.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(PixelDepth::Bit1),
            8 => Ok(PixelDepth::Bit8),
            32 => Ok(PixelDepth::Bit32),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    /// Get the number of bits per pixel.
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Get the maximum pixel value representable at this depth.
    pub fn max_value(self) -> u32 {
        match self {
            PixelDepth::Bit32 => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }
}

/// Internal PIX data
#[derive(Debug)]
struct PixData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Depth in bits per pixel
    depth: PixelDepth,
    /// Samples per pixel (1 for grayscale, 3 for RGB, 4 for RGBA)
    spp: u32,
    /// 32-bit words per line
    wpl: u32,
    /// The image data (packed 32-bit words)
    data: Vec<u32>,
}

impl PixData {
    fn duplicate(&self) -> Self {
        PixData {
            width: self.width,
            height: self.height,
            depth: self.depth,
            spp: self.spp,
            wpl: self.wpl,
            data: self.data.clone(),
        }
    }
}

/// PIX - Main image container
///
/// `Pix` uses reference counting via `Arc`, so frames and masks can be
/// handed between pipeline stages without copying pixel data.
///
/// # Examples
///
/// ```
/// use handsign_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(640, 480, PixelDepth::Bit1).unwrap();
/// assert_eq!(pix.width(), 640);
/// assert_eq!(pix.height(), 480);
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new PIX with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let wpl = Self::compute_wpl(width, depth)?;
        let data_size = (wpl as usize) * (height as usize);

        let spp = match depth {
            PixelDepth::Bit32 => 3, // Default to RGB
            _ => 1,
        };

        let inner = PixData {
            width,
            height,
            depth,
            spp,
            wpl,
            data: vec![0u32; data_size],
        };

        Ok(Pix {
            inner: Arc::new(inner),
        })
    }

    /// Compute words per line for given width and depth.
    ///
    /// Uses u64 arithmetic to prevent overflow for large widths.
    #[inline]
    fn compute_wpl(width: u32, depth: PixelDepth) -> Result<u32> {
        let bits_per_line = u64::from(width) * u64::from(depth.bits());
        let wpl = bits_per_line.div_ceil(32);
        u32::try_from(wpl).map_err(|_| {
            Error::InvalidParameter(format!(
                "image row too large: width={width} depth={depth:?} requires {wpl} words"
            ))
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get the samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// Get the words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get the words of a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let start = (y * self.inner.wpl) as usize;
        let end = start + self.inner.wpl as usize;
        &self.inner.data[start..end]
    }

    /// Create a new zeroed PIX with the same dimensions, depth and spp.
    pub fn create_template(&self) -> Self {
        let data_size = (self.inner.wpl as usize) * (self.inner.height as usize);
        let inner = PixData {
            width: self.inner.width,
            height: self.inner.height,
            depth: self.inner.depth,
            spp: self.inner.spp,
            wpl: self.inner.wpl,
            data: vec![0u32; data_size],
        };
        Pix {
            inner: Arc::new(inner),
        }
    }

    /// Count the ON pixels of a 1 bpp image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for depths other than 1 bpp.
    pub fn count_pixels(&self) -> Result<u64> {
        if self.inner.depth != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.inner.depth.bits()));
        }
        // Unused trailing bits are always kept clear
        Ok(self
            .inner
            .data
            .iter()
            .map(|word| u64::from(word.count_ones()))
            .sum())
    }

    /// Take mutable ownership, copying only if the data is shared.
    pub fn into_mut(self) -> PixMut {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => PixMut { inner: data },
            Err(arc) => PixMut {
                inner: arc.duplicate(),
            },
        }
    }

    /// Create a mutable copy of this PIX.
    ///
    /// Always creates a new copy that can be modified.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: self.inner.duplicate(),
        }
    }
}

/// Mutable PIX
///
/// Allows modification of image data. Convert back to an immutable
/// [`Pix`] using `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Create a new zeroed, uniquely owned image.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Ok(Pix::new(width, height, depth)?.into_mut())
    }

    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// Get words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Set samples per pixel.
    pub fn set_spp(&mut self, spp: u32) {
        self.inner.spp = spp;
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get mutable access to the image data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }

    /// Get mutable access to a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u32] {
        let start = (y * self.inner.wpl) as usize;
        let end = start + self.inner.wpl as usize;
        &mut self.inner.data[start..end]
    }

    /// Set all pixels to an arbitrary value.
    ///
    /// The value is depth-dependent:
    /// - 1 bpp: 0 or 1
    /// - 8 bpp: 0-255
    /// - 32 bpp: full 32-bit value
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueOutOfRange`] if `val` does not fit the depth.
    pub fn set_all_arbitrary(&mut self, val: u32) -> Result<()> {
        let depth = self.inner.depth;
        if val > depth.max_value() {
            return Err(Error::ValueOutOfRange {
                value: val,
                max: depth.max_value(),
            });
        }
        let word = match depth {
            PixelDepth::Bit1 => {
                if val == 0 {
                    0
                } else {
                    u32::MAX
                }
            }
            PixelDepth::Bit8 => val * 0x0101_0101,
            PixelDepth::Bit32 => val,
        };
        self.inner.data.fill(word);
        clear_row_padding(&mut self.inner);
        Ok(())
    }
}

/// Zero the bits past the last pixel of each row.
fn clear_row_padding(data: &mut PixData) {
    let used_bits = (data.width * data.depth.bits()) % 32;
    if used_bits == 0 {
        return;
    }
    let mask = !0u32 << (32 - used_bits);
    let wpl = data.wpl as usize;
    for row in data.data.chunks_exact_mut(wpl) {
        row[wpl - 1] &= mask;
    }
}

impl From<PixMut> for Pix {
    fn from(pix_mut: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pix_creation() {
        let pix = Pix::new(100, 200, PixelDepth::Bit8).unwrap();
        assert_eq!(pix.width(), 100);
        assert_eq!(pix.height(), 200);
        assert_eq!(pix.depth(), PixelDepth::Bit8);
        assert_eq!(pix.wpl(), 25);
        assert_eq!(pix.spp(), 1);
    }

    #[test]
    fn test_pix_invalid_dimensions() {
        assert!(Pix::new(0, 100, PixelDepth::Bit8).is_err());
        assert!(Pix::new(100, 0, PixelDepth::Bit8).is_err());
    }

    #[test]
    fn test_wpl_calculation() {
        // 1-bit: 32 pixels per word
        assert_eq!(Pix::new(32, 1, PixelDepth::Bit1).unwrap().wpl(), 1);
        assert_eq!(Pix::new(33, 1, PixelDepth::Bit1).unwrap().wpl(), 2);
        // 8-bit: 4 pixels per word
        assert_eq!(Pix::new(640, 1, PixelDepth::Bit8).unwrap().wpl(), 160);
        // 32-bit: 1 pixel per word
        assert_eq!(Pix::new(7, 1, PixelDepth::Bit32).unwrap().wpl(), 7);
    }

    #[test]
    fn test_into_mut_copies_shared_data() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        let shared = pix.clone();
        let mut pm = pix.into_mut();
        pm.set_pixel(1, 1, 200).unwrap();
        assert_eq!(shared.get_pixel(1, 1), Some(0));
        let pix: Pix = pm.into();
        assert_eq!(pix.get_pixel(1, 1), Some(200));
    }

    #[test]
    fn test_set_all_binary_keeps_padding_clear() {
        let mut pm = Pix::new(40, 3, PixelDepth::Bit1).unwrap().to_mut();
        pm.set_all_arbitrary(1).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.count_pixels().unwrap(), 120);
    }

    #[test]
    fn test_set_all_out_of_range() {
        let mut pm = Pix::new(4, 4, PixelDepth::Bit8).unwrap().to_mut();
        assert!(pm.set_all_arbitrary(256).is_err());
    }

    #[test]
    fn test_pixel_depth_from_bits() {
        assert_eq!(PixelDepth::from_bits(1).unwrap(), PixelDepth::Bit1);
        assert_eq!(PixelDepth::from_bits(32).unwrap(), PixelDepth::Bit32);
        assert!(PixelDepth::from_bits(4).is_err());
    }
}
