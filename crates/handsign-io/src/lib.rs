//! handsign-io - Image I/O for gesture frames and training images
//!
//! Supports reading and writing:
//! - PNG (feature `png-format`)
//! - JPEG (feature `jpeg`)
//!
//! Formats are detected from the file's magic bytes, never from its
//! extension.

pub mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use handsign_core::Pix;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Read an image from a file path.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let data = std::fs::read(path.as_ref())?;
    read_image_mem(&data)
}

/// Read an image from an in-memory buffer.
pub fn read_image_mem(data: &[u8]) -> IoResult<Pix> {
    match detect_format_from_bytes(data)? {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(Cursor::new(data)),
        other => Err(IoError::UnsupportedFormat(format!("{:?}", other))),
    }
}

/// Write an image to a file path in the given format.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P, format: ImageFormat) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_image_to(pix, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Write an image into an in-memory buffer in the given format.
pub fn write_image_mem(pix: &Pix, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_image_to(pix, &mut buffer, format)?;
    Ok(buffer)
}

fn write_image_to<W: Write>(pix: &Pix, writer: W, format: ImageFormat) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(pix, writer),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(pix, writer, jpeg::DEFAULT_JPEG_QUALITY),
        other => {
            let _ = writer;
            Err(IoError::UnsupportedFormat(format!("{:?}", other)))
        }
    }
}
