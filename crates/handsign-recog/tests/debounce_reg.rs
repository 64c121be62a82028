//! Prediction debounce regression test
//!
//! Replays timed sequences of raw predictions through the debouncer.
//!
//! Run with:
//! ```
//! cargo test -p handsign-recog --test debounce_reg
//! ```

use handsign_recog::{DebounceState, PredictionDebouncer};
use handsign_test::RegParams;
use std::time::{Duration, Instant};

/// Feed `(seconds, raw)` pairs and collect the emitted labels.
fn replay(ticks: &[(u64, u32)]) -> Vec<u32> {
    let t0 = Instant::now();
    let mut d = PredictionDebouncer::new();
    ticks
        .iter()
        .filter_map(|&(s, raw)| d.tick_at(raw, t0 + Duration::from_secs(s)))
        .collect()
}

#[test]
fn debounce_reg() {
    let mut rp = RegParams::new("debounce");

    rp.check(replay(&[(0, 1), (1, 1), (2, 1)]) == vec![1], "[1,1,1] within 2 s");
    rp.check(replay(&[(0, 1), (4, 2)]) == vec![1, 2], "[1, gap 4 s, 2]");
    rp.check(replay(&[(0, 0), (1, 6), (2, 0)]).is_empty(), "no-gesture inputs");
    rp.check(
        replay(&[(0, 0), (1, 3), (2, 4), (3, 5), (4, 5), (5, 2)]) == vec![3, 5],
        "cooldown measured from the last emission",
    );

    // Emissions are never closer than the cooldown
    let t0 = Instant::now();
    let mut d = PredictionDebouncer::new();
    let mut last: Option<Instant> = None;
    let mut spaced = true;
    for k in 0..100u64 {
        let now = t0 + Duration::from_millis(k * 250);
        if d.tick_at((k % 5 + 1) as u32, now).is_some() {
            if let Some(prev) = last {
                spaced &= now - prev >= Duration::from_secs(3);
            }
            last = Some(now);
        }
    }
    rp.check(spaced, "emissions at least 3 s apart");
    rp.check(
        matches!(d.state(), DebounceState::Cooling { .. }),
        "cooling after the last emission",
    );

    assert!(rp.cleanup());
}
