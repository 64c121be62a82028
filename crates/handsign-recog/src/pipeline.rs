//! Train and evaluate pipeline
//!
//! Wraps [`LinearSvm`] with the fixed feature dimension of a default
//! mask, accuracy reporting and the train-and-save / load switch.

use crate::dataset::{Dataset, Sample};
use crate::features::FEATURE_LEN;
use crate::store::{ModelStore, load_model, save_model};
use crate::svm::{LinearSvm, SvmParams, check_dims};
use crate::{RecogError, RecogResult};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of predicting one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    /// Label predicted by the model
    pub predicted: u32,
    /// Label of the sample
    pub expected: u32,
}

impl Prediction {
    /// Whether the prediction matches the sample label
    pub fn is_correct(&self) -> bool {
        self.predicted == self.expected
    }
}

/// Accuracy over a set of samples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// `correct / total`, or `None` when no samples were evaluated
    pub accuracy: Option<f64>,
    /// One entry per sample, in input order
    pub results: Vec<Prediction>,
}

impl Evaluation {
    /// Number of correct predictions
    pub fn correct(&self) -> usize {
        self.results.iter().filter(|p| p.is_correct()).count()
    }

    /// Number of evaluated samples
    pub fn total(&self) -> usize {
        self.results.len()
    }
}

/// Whether to train a fresh model or load a stored one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainMode {
    /// Train on the training split and store the result
    #[default]
    Train,
    /// Load a previously stored model
    Load,
}

/// Summary of one [`run`]
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Trained or loaded model
    pub model: LinearSvm,
    /// Number of training samples
    pub train_count: usize,
    /// Number of test samples
    pub test_count: usize,
    /// Held-out accuracy on the test split
    pub test: Evaluation,
    /// Accuracy on the training split; diagnostic only
    pub training_fit: Evaluation,
    /// Time spent training or loading
    pub elapsed: Duration,
}

/// Train a model with the default parameters.
///
/// # Errors
///
/// - [`RecogError::EmptyTrainingSet`] if `samples` is empty
/// - [`RecogError::DimensionMismatch`] if a feature vector does not
///   have 640x480 entries
pub fn train(samples: &[Sample]) -> RecogResult<LinearSvm> {
    train_with_params(samples, &SvmParams::default())
}

/// Train a model with explicit parameters.
pub fn train_with_params(samples: &[Sample], params: &SvmParams) -> RecogResult<LinearSvm> {
    if samples.is_empty() {
        return Err(RecogError::EmptyTrainingSet);
    }
    check_dims(samples, FEATURE_LEN)?;
    info!(samples = samples.len(), "starting training");
    LinearSvm::train(samples, params)
}

/// Predict every sample and compare with its label.
pub fn evaluate(model: &LinearSvm, samples: &[Sample]) -> RecogResult<Evaluation> {
    let mut results = Vec::with_capacity(samples.len());
    for (k, sample) in samples.iter().enumerate() {
        let predicted = model.predict(&sample.features)?;
        debug!(index = k, expected = sample.label, predicted, "prediction");
        results.push(Prediction {
            predicted,
            expected: sample.label,
        });
    }

    let mut eval = Evaluation {
        accuracy: None,
        results,
    };
    if eval.total() > 0 {
        eval.accuracy = Some(eval.correct() as f64 / eval.total() as f64);
    }
    Ok(eval)
}

/// Evaluate the model on its own training split.
///
/// This measures fit, not generalization.
pub fn evaluate_training_fit(model: &LinearSvm, dataset: &Dataset) -> RecogResult<Evaluation> {
    let eval = evaluate(model, &dataset.train)?;
    info!(
        correct = eval.correct(),
        total = eval.total(),
        accuracy = eval.accuracy,
        "training-fit diagnostic"
    );
    Ok(eval)
}

/// Train and store a model, or load it, depending on `mode`.
pub fn train_or_load(
    store: &mut dyn ModelStore,
    name: &str,
    samples: &[Sample],
    mode: TrainMode,
) -> RecogResult<LinearSvm> {
    match mode {
        TrainMode::Train => {
            let model = train(samples)?;
            save_model(store, name, &model)?;
            Ok(model)
        }
        TrainMode::Load => load_model(store, name),
    }
}

/// Obtain a model for `dataset` and evaluate it on both splits.
pub fn run(
    dataset: &Dataset,
    store: &mut dyn ModelStore,
    name: &str,
    mode: TrainMode,
) -> RecogResult<TrainReport> {
    info!(
        train = dataset.train.len(),
        test = dataset.test.len(),
        ?mode,
        "running pipeline"
    );
    let start = Instant::now();
    let model = train_or_load(store, name, &dataset.train, mode)?;
    let elapsed = start.elapsed();
    info!(elapsed_s = elapsed.as_secs_f64(), "model ready");

    let training_fit = evaluate_training_fit(&model, dataset)?;
    let test = evaluate(&model, &dataset.test)?;
    info!(
        correct = test.correct(),
        total = test.total(),
        accuracy = test.accuracy,
        "test split evaluated"
    );

    Ok(TrainReport {
        model,
        train_count: dataset.train.len(),
        test_count: dataset.test.len(),
        test,
        training_fit,
        elapsed,
    })
}
