//! Live prediction over a frame stream
//!
//! [`LivePredictor`] runs segment, flatten, predict and debounce for each
//! frame pulled from a source. Frame acquisition itself is left to the
//! caller; any iterator of [`Pix`] works.

use crate::debounce::{DebounceOptions, PredictionDebouncer};
use crate::features::mask_to_features;
use crate::range::SegmentationRange;
use crate::segment::{SegmentOptions, segment_with_options};
use crate::svm::LinearSvm;
use crate::{RecogError, RecogResult};
use handsign_core::Pix;
use std::time::Instant;
use tracing::{debug, info};

/// Model, range and debouncer for one live session.
#[derive(Debug, Clone)]
pub struct LivePredictor {
    model: LinearSvm,
    range: SegmentationRange,
    options: SegmentOptions,
    debouncer: PredictionDebouncer,
}

impl LivePredictor {
    /// Create a predictor with default segmentation and a 3 s cooldown.
    pub fn new(model: LinearSvm, range: SegmentationRange) -> RecogResult<Self> {
        Self::with_options(
            model,
            range,
            SegmentOptions::default(),
            DebounceOptions::default(),
        )
    }

    /// Create a predictor with explicit options.
    ///
    /// # Errors
    ///
    /// Fails if the range or options are invalid, or if the model was
    /// not trained on masks of the configured output size.
    pub fn with_options(
        model: LinearSvm,
        range: SegmentationRange,
        options: SegmentOptions,
        debounce: DebounceOptions,
    ) -> RecogResult<Self> {
        range.validate()?;
        options.validate()?;
        if model.dim() != options.feature_len() {
            return Err(RecogError::DimensionMismatch {
                expected: options.feature_len(),
                actual: model.dim(),
            });
        }
        Ok(Self {
            model,
            range,
            options,
            debouncer: PredictionDebouncer::with_options(debounce),
        })
    }

    pub fn model(&self) -> &LinearSvm {
        &self.model
    }

    pub fn range(&self) -> &SegmentationRange {
        &self.range
    }

    pub fn debouncer(&self) -> &PredictionDebouncer {
        &self.debouncer
    }

    /// Predict the raw label of one frame, without debouncing.
    pub fn classify(&self, frame: &Pix) -> RecogResult<u32> {
        let mask = segment_with_options(frame, &self.range, &self.options)?;
        let features = mask_to_features(&mask)?;
        self.model.predict(&features)
    }

    /// Classify one frame observed at `now` and debounce the result.
    pub fn process_frame(&mut self, frame: &Pix, now: Instant) -> RecogResult<Option<u32>> {
        let raw = self.classify(frame)?;
        let emitted = self.debouncer.tick_at(raw, now);
        match emitted {
            Some(label) => info!(label, "gesture emitted"),
            None => debug!(raw, "frame suppressed"),
        }
        Ok(emitted)
    }

    /// Adapt a frame source into a stream of emitted labels.
    ///
    /// Each frame is stamped with the instant it is pulled. Frames that
    /// emit nothing are skipped; errors are passed through.
    pub fn emissions<'a, I>(&'a mut self, frames: I) -> impl Iterator<Item = RecogResult<u32>> + 'a
    where
        I: IntoIterator<Item = Pix>,
        I::IntoIter: 'a,
    {
        frames
            .into_iter()
            .filter_map(move |frame| self.process_frame(&frame, Instant::now()).transpose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Sample;
    use crate::svm::SvmParams;
    use handsign_core::{PixMut, PixelDepth, color};

    fn uniform(v: u8) -> Pix {
        let mut pm = PixMut::new(16, 12, PixelDepth::Bit32).unwrap();
        for y in 0..12 {
            for x in 0..16 {
                pm.set_pixel_unchecked(x, y, color::compose_rgb(v, v, v));
            }
        }
        pm.into()
    }

    fn small_options() -> SegmentOptions {
        SegmentOptions::new()
            .with_median_size(3)
            .with_dilation_radius(1)
            .with_output_size(8, 6)
    }

    fn predictor() -> LivePredictor {
        // 0 = dark frame, 2 = bright frame
        let samples = vec![
            Sample::new(vec![0.0; 48], 0),
            Sample::new(vec![1.0; 48], 2),
        ];
        let model = LinearSvm::train(&samples, &SvmParams::default()).unwrap();
        LivePredictor::with_options(
            model,
            SegmentationRange::new(0, 180, 0, 255, 1, 255),
            small_options(),
            DebounceOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_classify_frames() {
        let live = predictor();
        assert_eq!(live.classify(&uniform(0)).unwrap(), 0);
        assert_eq!(live.classify(&uniform(255)).unwrap(), 2);
    }

    #[test]
    fn test_process_frame_debounces() {
        let mut live = predictor();
        let t0 = Instant::now();
        assert_eq!(live.process_frame(&uniform(0), t0).unwrap(), None);
        assert_eq!(live.process_frame(&uniform(255), t0).unwrap(), Some(2));
        let later = t0 + std::time::Duration::from_secs(1);
        assert_eq!(live.process_frame(&uniform(255), later).unwrap(), None);
    }

    #[test]
    fn test_emissions_stream() {
        let mut live = predictor();
        let frames = vec![uniform(0), uniform(255), uniform(255), uniform(0)];
        let out: Vec<u32> = live.emissions(frames).collect::<RecogResult<_>>().unwrap();
        assert_eq!(out, vec![2]);
    }

    #[test]
    fn test_model_size_must_match_mask() {
        let model = predictor().model().clone();
        let err = LivePredictor::new(model, SegmentationRange::TRAINING).unwrap_err();
        assert!(matches!(
            err,
            RecogError::DimensionMismatch { expected: 307_200, actual: 48 }
        ));
    }
}
