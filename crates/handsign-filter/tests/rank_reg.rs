//! Rank filter regression test
//!
//! A 5x5 median over a binary mask removes isolated noise and rounds the
//! corners of solid regions.
//!
//! Run with:
//! ```
//! cargo test -p handsign-filter --test rank_reg
//! ```

use handsign_core::{Pix, PixMut, PixelDepth};
use handsign_filter::{max_filter, median_filter, min_filter};
use handsign_test::RegParams;

fn rect_with_speck() -> Pix {
    let mut pm = PixMut::new(40, 40, PixelDepth::Bit1).unwrap();
    for y in 10..20 {
        for x in 10..20 {
            pm.set_pixel_unchecked(x, y, 1);
        }
    }
    pm.set_pixel_unchecked(30, 30, 1);
    pm.into()
}

#[test]
fn rank_reg() {
    let mut rp = RegParams::new("rank");
    let pix = rect_with_speck();
    rp.compare_values(101.0, pix.count_pixels().unwrap() as f64, 0.0);

    let med = median_filter(&pix, 5, 5).unwrap();
    rp.compare_values(0.0, med.get_pixel(30, 30).unwrap() as f64, 0.0);
    rp.compare_values(1.0, med.get_pixel(15, 15).unwrap() as f64, 0.0);
    // Three pixels lost at each corner
    rp.compare_values(0.0, med.get_pixel(10, 10).unwrap() as f64, 0.0);
    rp.compare_values(1.0, med.get_pixel(10, 12).unwrap() as f64, 0.0);
    rp.compare_values(88.0, med.count_pixels().unwrap() as f64, 0.0);

    // 1x1 window is the identity
    let same = median_filter(&pix, 1, 1).unwrap();
    rp.compare_pix(&pix, &same);

    // Min erodes, max dilates
    let min = min_filter(&pix, 3, 3).unwrap();
    rp.compare_values(64.0, min.count_pixels().unwrap() as f64, 0.0);
    let max = max_filter(&pix, 3, 3).unwrap();
    rp.compare_values((144 + 9) as f64, max.count_pixels().unwrap() as f64, 0.0);

    rp.check(median_filter(&pix, 4, 4).is_err(), "even window rejected");

    assert!(rp.cleanup());
}
