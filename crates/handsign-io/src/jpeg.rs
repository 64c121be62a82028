//! JPEG image format support
//!
//! Reads baseline and progressive JPEG images with `jpeg-decoder` and
//! writes 32 bpp RGB images with `jpeg-encoder`.

use crate::{IoError, IoResult};
use handsign_core::{Pix, PixMut, PixelDepth, color};
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder};
use std::io::{Read, Write};

/// Default quality for JPEG output.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Read a JPEG image from a reader.
///
/// Returns an 8 bpp image for grayscale files and a 32 bpp image for
/// color files.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG frame info".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let (depth, samples) = match info.pixel_format {
        PixelFormat::L8 => (PixelDepth::Bit8, 1usize),
        PixelFormat::RGB24 => (PixelDepth::Bit32, 3usize),
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };

    if pixels.len() < width as usize * height as usize * samples {
        return Err(IoError::InvalidData("truncated JPEG pixel data".to_string()));
    }

    let mut pix_mut = PixMut::new(width, height, depth)?;
    for y in 0..height {
        for x in 0..width {
            let idx = (y as usize * width as usize + x as usize) * samples;
            let val = if samples == 1 {
                pixels[idx] as u32
            } else {
                color::compose_rgb(pixels[idx], pixels[idx + 1], pixels[idx + 2])
            };
            pix_mut.set_pixel_unchecked(x, y, val);
        }
    }

    Ok(pix_mut.into())
}

/// Write a JPEG image.
///
/// Accepts 8 bpp (grayscale) and 32 bpp (RGB) images; alpha is dropped.
pub fn write_jpeg<W: Write>(pix: &Pix, writer: W, quality: u8) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(IoError::InvalidData(format!(
            "image too large for JPEG: {}x{}",
            width, height
        )));
    }

    let (data, color_type) = match pix.depth() {
        PixelDepth::Bit8 => {
            let mut data = Vec::with_capacity(width as usize * height as usize);
            for y in 0..height {
                for x in 0..width {
                    data.push(pix.get_pixel_unchecked(x, y) as u8);
                }
            }
            (data, ColorType::Luma)
        }
        PixelDepth::Bit32 => {
            let mut data = Vec::with_capacity(width as usize * height as usize * 3);
            for y in 0..height {
                for x in 0..width {
                    let (r, g, b) = color::extract_rgb(pix.get_pixel_unchecked(x, y));
                    data.extend_from_slice(&[r, g, b]);
                }
            }
            (data, ColorType::Rgb)
        }
        PixelDepth::Bit1 => {
            return Err(IoError::UnsupportedFormat(
                "1 bpp images cannot be written as JPEG".to_string(),
            ));
        }
    };

    let encoder = Encoder::new(writer, quality);
    encoder
        .encode(&data, width as u16, height as u16, color_type)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_roundtrip_uniform_rgb() {
        let mut pix_mut = Pix::new(16, 16, PixelDepth::Bit32).unwrap().to_mut();
        for y in 0..16 {
            for x in 0..16 {
                pix_mut.set_rgb(x, y, 200, 100, 50).unwrap();
            }
        }
        let pix: Pix = pix_mut.into();

        let mut buffer = Vec::new();
        write_jpeg(&pix, &mut buffer, 95).unwrap();
        assert_eq!(&buffer[..3], &[0xFF, 0xD8, 0xFF]);

        let pix2 = read_jpeg(&buffer[..]).unwrap();
        assert_eq!(pix2.width(), 16);
        assert_eq!(pix2.depth(), PixelDepth::Bit32);
        let (r, g, b) = pix2.get_rgb(8, 8).unwrap();
        assert!((r as i32 - 200).abs() <= 4);
        assert!((g as i32 - 100).abs() <= 4);
        assert!((b as i32 - 50).abs() <= 4);
    }

    #[test]
    fn test_jpeg_rejects_binary() {
        let pix = Pix::new(8, 8, PixelDepth::Bit1).unwrap();
        let mut buffer = Vec::new();
        assert!(write_jpeg(&pix, &mut buffer, 90).is_err());
    }

    #[test]
    fn test_jpeg_garbage() {
        assert!(read_jpeg(&[0xFF, 0xD8, 0xFF, 0x00][..]).is_err());
    }
}
