//! handsign-test - Regression test framework for handsign
//!
//! Provides [`RegParams`] for accumulating checks and fixture helpers
//! that synthesize frames and labeled dataset directories on disk.
//!
//! # Usage
//!
//! ```ignore
//! use handsign_test::RegParams;
//!
//! let mut rp = RegParams::new("segment");
//! rp.compare_values(307200.0, count as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::RegParams;

use handsign_core::{Pix, PixMut, PixelDepth, color};
use handsign_io::ImageFormat;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the path to the regout (regression output) directory
///
/// Lives under the system temp directory so test runs never touch the
/// source tree.
pub fn regout_dir() -> PathBuf {
    std::env::temp_dir().join("handsign-regout")
}

/// Create an empty scratch directory for one regression test.
///
/// Any previous contents under the same name are removed first.
pub fn scratch_dir(name: &str) -> TestResult<PathBuf> {
    let dir = regout_dir().join(name);
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Build a 32 bpp frame filled with one color.
pub fn uniform_rgb(width: u32, height: u32, r: u8, g: u8, b: u8) -> TestResult<Pix> {
    let mut pm = PixMut::new(width, height, PixelDepth::Bit32)?;
    let val = color::compose_rgb(r, g, b);
    for y in 0..height {
        for x in 0..width {
            pm.set_pixel_unchecked(x, y, val);
        }
    }
    Ok(pm.into())
}

/// Build a 32 bpp frame filled with `fg` inside `[x0, x1) x [y0, y1)`
/// and `bg` elsewhere.
pub fn rgb_with_rect(
    width: u32,
    height: u32,
    bg: (u8, u8, u8),
    fg: (u8, u8, u8),
    rect: (u32, u32, u32, u32),
) -> TestResult<Pix> {
    let (x0, y0, x1, y1) = rect;
    let mut pm = PixMut::new(width, height, PixelDepth::Bit32)?;
    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = if x >= x0 && x < x1 && y >= y0 && y < y1 {
                fg
            } else {
                bg
            };
            pm.set_pixel_unchecked(x, y, color::compose_rgb(r, g, b));
        }
    }
    Ok(pm.into())
}

/// One label directory of a synthetic dataset.
#[derive(Debug, Clone)]
pub struct LabelFixture {
    /// Directory name under the root
    pub label: String,
    /// Frame color for every image in the directory
    pub rgb: (u8, u8, u8),
    /// Number of images to write
    pub count: usize,
}

impl LabelFixture {
    /// Create a fixture for `count` uniform images of one color.
    pub fn new(label: &str, rgb: (u8, u8, u8), count: usize) -> Self {
        Self {
            label: label.to_string(),
            rgb,
            count,
        }
    }
}

/// Write a labeled dataset tree under `root`.
///
/// Each image is named `img_NNN.<ext>` so that lexicographic order
/// matches write order.
pub fn write_dataset(
    root: &Path,
    labels: &[LabelFixture],
    width: u32,
    height: u32,
    format: ImageFormat,
) -> TestResult<()> {
    for fixture in labels {
        let dir = root.join(&fixture.label);
        fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let (r, g, b) = fixture.rgb;
        let pix = uniform_rgb(width, height, r, g, b)?;
        for i in 0..fixture.count {
            let path = dir.join(format!("img_{:03}.{}", i, format.extension()));
            handsign_io::write_image(&pix, &path, format).map_err(|e| TestError::ImageWrite {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        }
    }
    Ok(())
}
