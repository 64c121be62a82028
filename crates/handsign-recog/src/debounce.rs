//! Prediction debouncing
//!
//! Turns a per-frame stream of raw predictions into a rate-limited stream
//! of gesture symbols. After each emission the debouncer cools down and
//! ignores every input until the cooldown has elapsed.

use std::time::{Duration, Instant};

/// Lowest label treated as a recognized gesture
pub const MIN_GESTURE: u32 = 1;
/// Highest label treated as a recognized gesture
pub const MAX_GESTURE: u32 = 5;

/// Options for [`PredictionDebouncer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceOptions {
    /// Minimum time between two emissions
    pub cooldown: Duration,
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(3),
        }
    }
}

impl DebounceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }
}

/// Debouncer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceState {
    /// Ready to emit the next recognized gesture
    #[default]
    Idle,
    /// Suppressing input since the last emission
    Cooling {
        /// Instant of the last emission
        since: Instant,
    },
}

/// Whether `raw` is one of the recognized gesture labels.
#[inline]
pub fn is_gesture(raw: u32) -> bool {
    (MIN_GESTURE..=MAX_GESTURE).contains(&raw)
}

/// Rate-limits raw per-frame predictions.
#[derive(Debug, Clone, Default)]
pub struct PredictionDebouncer {
    options: DebounceOptions,
    state: DebounceState,
}

impl PredictionDebouncer {
    /// Create an idle debouncer with the default 3 s cooldown.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DebounceOptions) -> Self {
        Self {
            options,
            state: DebounceState::Idle,
        }
    }

    pub fn options(&self) -> &DebounceOptions {
        &self.options
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Feed one raw prediction observed at `now`.
    ///
    /// Returns the label when it is emitted. At most one label is emitted
    /// per call and emissions are at least one cooldown apart. Labels
    /// outside `1..=5` are treated as "no gesture" and never emitted.
    pub fn tick_at(&mut self, raw: u32, now: Instant) -> Option<u32> {
        if let DebounceState::Cooling { since } = self.state
            && now.saturating_duration_since(since) >= self.options.cooldown
        {
            self.state = DebounceState::Idle;
        }

        match self.state {
            DebounceState::Idle if is_gesture(raw) => {
                self.state = DebounceState::Cooling { since: now };
                Some(raw)
            }
            _ => None,
        }
    }

    /// Feed one raw prediction observed now.
    pub fn tick(&mut self, raw: u32) -> Option<u32> {
        self.tick_at(raw, Instant::now())
    }

    /// Forget any cooldown in progress.
    pub fn reset(&mut self) {
        self.state = DebounceState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_repeated_gesture_emits_once() {
        let t0 = Instant::now();
        let mut d = PredictionDebouncer::new();
        assert_eq!(d.tick_at(1, t0), Some(1));
        assert_eq!(d.tick_at(1, t0 + secs(1)), None);
        assert_eq!(d.tick_at(1, t0 + secs(2)), None);
        assert!(matches!(d.state(), DebounceState::Cooling { since } if since == t0));
    }

    #[test]
    fn test_emits_again_after_cooldown() {
        let t0 = Instant::now();
        let mut d = PredictionDebouncer::new();
        assert_eq!(d.tick_at(1, t0), Some(1));
        assert_eq!(d.tick_at(2, t0 + secs(4)), Some(2));
        // exactly at the cooldown boundary counts as elapsed
        assert_eq!(d.tick_at(3, t0 + secs(7)), Some(3));
    }

    #[test]
    fn test_no_gesture_never_emits() {
        let t0 = Instant::now();
        let mut d = PredictionDebouncer::new();
        for (k, raw) in [0, 6, 100, 0].into_iter().enumerate() {
            assert_eq!(d.tick_at(raw, t0 + secs(k as u64 * 5)), None);
        }
        assert_eq!(d.state(), DebounceState::Idle);
    }

    #[test]
    fn test_custom_cooldown() {
        let t0 = Instant::now();
        let opts = DebounceOptions::new().with_cooldown(Duration::from_millis(500));
        let mut d = PredictionDebouncer::with_options(opts);
        assert_eq!(d.tick_at(5, t0), Some(5));
        assert_eq!(d.tick_at(5, t0 + Duration::from_millis(499)), None);
        assert_eq!(d.tick_at(5, t0 + Duration::from_millis(500)), Some(5));
        d.reset();
        assert_eq!(d.tick_at(4, t0 + Duration::from_millis(501)), Some(4));
    }
}
