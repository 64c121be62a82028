//! Image I/O regression test
//!
//! Writes synthetic frames as PNG and JPEG, reads them back through
//! magic-byte detection and checks the decoded geometry and colors.
//!
//! Run with:
//! ```
//! cargo test -p handsign-io --test imageio_reg
//! ```

use handsign_core::PixelDepth;
use handsign_io::{ImageFormat, detect_format, read_image, read_image_mem, write_image, write_image_mem};
use handsign_test::{RegParams, rgb_with_rect, scratch_dir};

#[test]
fn imageio_reg() {
    let mut rp = RegParams::new("imageio");
    let dir = scratch_dir("imageio").unwrap();

    let pix = rgb_with_rect(40, 30, (0, 0, 0), (255, 255, 255), (10, 5, 30, 25)).unwrap();

    // PNG is lossless
    let png_path = dir.join("frame.png");
    write_image(&pix, &png_path, ImageFormat::Png).unwrap();
    rp.check(detect_format(&png_path).unwrap() == ImageFormat::Png, "png magic");
    let back = read_image(&png_path).unwrap();
    rp.compare_pix(&pix, &back);

    // Extension does not drive detection
    let misnamed = dir.join("frame.jpg");
    std::fs::copy(&png_path, &misnamed).unwrap();
    let back = read_image(&misnamed).unwrap();
    rp.compare_values(40.0, back.width() as f64, 0.0);

    // JPEG keeps geometry and roughly keeps flat regions
    let jpeg = write_image_mem(&pix, ImageFormat::Jpeg).unwrap();
    let back = read_image_mem(&jpeg).unwrap();
    rp.compare_values(40.0, back.width() as f64, 0.0);
    rp.compare_values(30.0, back.height() as f64, 0.0);
    rp.check(back.depth() == PixelDepth::Bit32, "jpeg decodes to 32 bpp");
    let (r, _, _) = back.get_rgb(20, 15).unwrap();
    rp.compare_values(255.0, r as f64, 8.0);
    let (r, _, _) = back.get_rgb(1, 1).unwrap();
    rp.compare_values(0.0, r as f64, 8.0);

    // Non-image data is rejected
    rp.check(read_image_mem(b"not an image at all").is_err(), "garbage rejected");

    assert!(rp.cleanup());
}
