//! Multi-class linear support vector machine
//!
//! C-SVC with a linear kernel, one-vs-one over every pair of labels.
//! Each pairwise problem is solved by dual coordinate descent on the
//! hinge-loss dual, with the bias folded in as a constant feature of
//! value 1. Prediction takes a majority vote over the pairwise
//! classifiers; ties go to the lower label.
//!
//! # Serialized format
//!
//! ```text
//! \nLinearSvm Version 1\n
//! Params: c = <f64>, gamma = <f64>, max_iter = <u64>, epsilon = <f64>, tolerance = <f64>, seed = <u64>\n
//! Dimension = <dim>, labels = <l0> <l1> ...\n
//! Pair[k]: positive = <label>, negative = <label>, bias = <f64>\n   (one per pair)
//! Weights:\n
//! [pairs * dim little-endian f64]
//! ```

use crate::dataset::Sample;
use crate::{RecogError, RecogResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Serialization format version
const SVM_VERSION: i32 = 1;

/// Maximum serialized size in bytes.
const MAX_INPUT_SIZE: usize = 2_000_000_000;

/// Training parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SvmParams {
    /// Soft-margin penalty (default: 2.67)
    pub c: f64,
    /// Kernel width; recorded with the model, unused by the linear kernel
    /// (default: 5.383)
    pub gamma: f64,
    /// Maximum number of passes over the samples (default: 10,000,000)
    pub max_iter: u64,
    /// Stop when a pass changes the dual objective by less than this
    /// (default: 1e-6)
    pub epsilon: f64,
    /// Stop when the projected-gradient gap falls below this
    /// (default: 1e-3)
    pub tolerance: f64,
    /// Seed of the per-pass shuffle (default: 42)
    pub seed: u64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            c: 2.67,
            gamma: 5.383,
            max_iter: 10_000_000,
            epsilon: 1e-6,
            tolerance: 1e-3,
            seed: 42,
        }
    }
}

impl SvmParams {
    /// Create new parameters with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the soft-margin penalty
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Set the maximum number of passes
    pub fn with_max_iter(mut self, max_iter: u64) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the shuffle seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate parameters
    pub fn validate(&self) -> RecogResult<()> {
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(RecogError::InvalidParameter(
                "c must be positive".to_string(),
            ));
        }
        if self.max_iter == 0 {
            return Err(RecogError::InvalidParameter(
                "max_iter must be positive".to_string(),
            ));
        }
        if !(self.epsilon >= 0.0 && self.tolerance >= 0.0) {
            return Err(RecogError::InvalidParameter(
                "epsilon and tolerance must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// One pairwise classifier: `f(x) = w . x + b`, positive means
/// [`positive`](Self::positive).
#[derive(Debug, Clone, PartialEq)]
pub struct PairClassifier {
    pub positive: u32,
    pub negative: u32,
    weights: Vec<f64>,
    bias: f64,
}

impl PairClassifier {
    /// Decision value for a feature vector of the model dimension.
    pub fn decision(&self, features: &[f32]) -> f64 {
        dot(&self.weights, features) + self.bias
    }

    /// Bias term
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Weight vector
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Trained one-vs-one linear SVM
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSvm {
    params: SvmParams,
    dim: usize,
    labels: Vec<u32>,
    classifiers: Vec<PairClassifier>,
}

impl LinearSvm {
    /// Train on `samples`.
    ///
    /// # Errors
    ///
    /// - [`RecogError::EmptyTrainingSet`] if `samples` is empty
    /// - [`RecogError::DimensionMismatch`] if the feature vectors differ
    ///   in length
    pub fn train(samples: &[Sample], params: &SvmParams) -> RecogResult<Self> {
        params.validate()?;
        let first = samples.first().ok_or(RecogError::EmptyTrainingSet)?;
        let dim = first.features.len();
        check_dims(samples, dim)?;

        let mut labels: Vec<u32> = samples.iter().map(|s| s.label).collect();
        labels.sort_unstable();
        labels.dedup();

        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut classifiers = Vec::with_capacity(labels.len() * labels.len().saturating_sub(1) / 2);
        for (i, &pos) in labels.iter().enumerate() {
            for &neg in &labels[i + 1..] {
                let subset: Vec<&Sample> = samples
                    .iter()
                    .filter(|s| s.label == pos || s.label == neg)
                    .collect();
                let (weights, bias, passes) = solve_pair(&subset, pos, dim, params, &mut rng);
                debug!(positive = pos, negative = neg, samples = subset.len(), passes, "pair trained");
                classifiers.push(PairClassifier {
                    positive: pos,
                    negative: neg,
                    weights,
                    bias,
                });
            }
        }
        info!(
            classes = labels.len(),
            pairs = classifiers.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "linear SVM trained"
        );

        Ok(Self {
            params: params.clone(),
            dim,
            labels,
            classifiers,
        })
    }

    /// Predict the label of one feature vector.
    pub fn predict(&self, features: &[f32]) -> RecogResult<u32> {
        if features.len() != self.dim {
            return Err(RecogError::DimensionMismatch {
                expected: self.dim,
                actual: features.len(),
            });
        }

        let mut votes = vec![0u32; self.labels.len()];
        for clf in &self.classifiers {
            let winner = if clf.decision(features) > 0.0 {
                clf.positive
            } else {
                clf.negative
            };
            if let Ok(idx) = self.labels.binary_search(&winner) {
                votes[idx] += 1;
            }
        }

        // Labels are ascending, so the first maximum is the lowest label
        let mut best = 0;
        for (idx, &v) in votes.iter().enumerate() {
            if v > votes[best] {
                best = idx;
            }
        }
        Ok(self.labels[best])
    }

    /// Training parameters
    pub fn params(&self) -> &SvmParams {
        &self.params
    }

    /// Feature vector length
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Class labels in ascending order
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Pairwise classifiers in `(labels[i], labels[j]), i < j` order
    pub fn classifiers(&self) -> &[PairClassifier] {
        &self.classifiers
    }

    /// Read a model from a reader.
    pub fn read_from_reader(reader: &mut impl Read) -> RecogResult<Self> {
        let mut buf = Vec::new();
        reader
            .take((MAX_INPUT_SIZE + 1) as u64)
            .read_to_end(&mut buf)?;
        if buf.len() > MAX_INPUT_SIZE {
            return Err(model_error(format!(
                "input too large: exceeds maximum allowed size of {MAX_INPUT_SIZE} bytes"
            )));
        }
        Self::read_from_bytes(&buf)
    }

    /// Read a model from a file.
    pub fn read_from_file(path: impl AsRef<Path>) -> RecogResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| RecogError::ModelLoad {
            name: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut reader = BufReader::new(file);
        Self::read_from_reader(&mut reader).map_err(|e| match e {
            RecogError::ModelLoad { message, .. } => RecogError::ModelLoad {
                name: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Read a model from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::ModelLoad`] if the data is not a valid model.
    pub fn read_from_bytes(data: &[u8]) -> RecogResult<Self> {
        parse_model(data).map_err(model_error)
    }

    /// Write the model to a writer.
    pub fn write_to_writer(&self, writer: &mut impl Write) -> RecogResult<()> {
        let p = &self.params;
        writeln!(writer, "\nLinearSvm Version {SVM_VERSION}")?;
        writeln!(
            writer,
            "Params: c = {}, gamma = {}, max_iter = {}, epsilon = {}, tolerance = {}, seed = {}",
            p.c, p.gamma, p.max_iter, p.epsilon, p.tolerance, p.seed
        )?;
        let labels: Vec<String> = self.labels.iter().map(u32::to_string).collect();
        writeln!(
            writer,
            "Dimension = {}, labels = {}",
            self.dim,
            labels.join(" ")
        )?;
        for (k, clf) in self.classifiers.iter().enumerate() {
            writeln!(
                writer,
                "Pair[{k}]: positive = {}, negative = {}, bias = {}",
                clf.positive, clf.negative, clf.bias
            )?;
        }
        writeln!(writer, "Weights:")?;
        for clf in &self.classifiers {
            for &w in &clf.weights {
                writer.write_all(&w.to_le_bytes())?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the model to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> RecogResult<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| RecogError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to_writer(&mut writer)
    }

    /// Write the model to a byte vector.
    pub fn write_to_bytes(&self) -> RecogResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to_writer(&mut buf)?;
        Ok(buf)
    }
}

/// Check that every sample has `dim` features.
pub(crate) fn check_dims(samples: &[Sample], dim: usize) -> RecogResult<()> {
    match samples.iter().find(|s| s.features.len() != dim) {
        Some(bad) => Err(RecogError::DimensionMismatch {
            expected: dim,
            actual: bad.features.len(),
        }),
        None => Ok(()),
    }
}

fn model_error(message: String) -> RecogError {
    RecogError::ModelLoad {
        name: "<bytes>".to_string(),
        message,
    }
}

#[inline]
fn dot(w: &[f64], x: &[f32]) -> f64 {
    w.iter().zip(x).map(|(&a, &b)| a * b as f64).sum()
}

/// Dual coordinate descent for one binary problem.
///
/// Returns `(weights, bias, passes)`.
fn solve_pair(
    samples: &[&Sample],
    positive: u32,
    dim: usize,
    params: &SvmParams,
    rng: &mut StdRng,
) -> (Vec<f64>, f64, u64) {
    let c = params.c;
    let ys: Vec<f64> = samples
        .iter()
        .map(|s| if s.label == positive { 1.0 } else { -1.0 })
        .collect();
    // Diagonal of Q with the constant bias feature included
    let qd: Vec<f64> = samples
        .iter()
        .map(|s| s.features.iter().map(|&v| (v as f64) * (v as f64)).sum::<f64>() + 1.0)
        .collect();

    let mut alpha = vec![0.0f64; samples.len()];
    let mut w = vec![0.0f64; dim];
    let mut b = 0.0f64;
    let mut order: Vec<usize> = (0..samples.len()).collect();

    let mut passes = 0;
    while passes < params.max_iter {
        passes += 1;
        order.shuffle(rng);

        let mut pg_max = f64::NEG_INFINITY;
        let mut pg_min = f64::INFINITY;
        let mut delta_obj = 0.0;

        for &i in &order {
            let x = &samples[i].features;
            let g = ys[i] * (dot(&w, x) + b) - 1.0;
            let pg = if alpha[i] <= 0.0 {
                g.min(0.0)
            } else if alpha[i] >= c {
                g.max(0.0)
            } else {
                g
            };
            pg_max = pg_max.max(pg);
            pg_min = pg_min.min(pg);

            if pg.abs() > 1e-12 {
                let old = alpha[i];
                alpha[i] = (old - g / qd[i]).clamp(0.0, c);
                let da = alpha[i] - old;
                if da != 0.0 {
                    let step = da * ys[i];
                    for (wj, &xj) in w.iter_mut().zip(x) {
                        *wj += step * xj as f64;
                    }
                    b += step;
                    delta_obj += g * da + 0.5 * qd[i] * da * da;
                }
            }
        }

        if pg_max - pg_min <= params.tolerance || delta_obj.abs() < params.epsilon {
            break;
        }
    }

    (w, b, passes)
}

/// Split a serialized model into its next text line and advance `pos`.
fn next_line<'a>(data: &'a [u8], pos: &mut usize) -> Result<&'a str, String> {
    let rest = data.get(*pos..).ok_or("unexpected end of data")?;
    let end = rest
        .iter()
        .position(|&b| b == b'\n')
        .ok_or("unterminated header line")?;
    *pos += end + 1;
    std::str::from_utf8(&rest[..end]).map_err(|e| format!("invalid UTF-8: {e}"))
}

/// Parse `key = value` pairs separated by `", "` after `prefix`.
fn parse_fields<'a>(line: &'a str, prefix: &str) -> Result<Vec<(&'a str, &'a str)>, String> {
    let body = line
        .strip_prefix(prefix)
        .ok_or_else(|| format!("expected '{prefix}', got '{line}'"))?;
    body.split(", ")
        .map(|field| {
            field
                .split_once(" = ")
                .map(|(k, v)| (k.trim(), v.trim()))
                .ok_or_else(|| format!("malformed field '{field}'"))
        })
        .collect()
}

fn field<T: std::str::FromStr>(fields: &[(&str, &str)], key: &str) -> Result<T, String> {
    let (_, raw) = fields
        .iter()
        .find(|(k, _)| *k == key)
        .ok_or_else(|| format!("missing field '{key}'"))?;
    raw.parse()
        .map_err(|_| format!("invalid value for '{key}': '{raw}'"))
}

fn parse_model(data: &[u8]) -> Result<LinearSvm, String> {
    let mut pos = 0;

    let blank = next_line(data, &mut pos)?;
    if !blank.trim().is_empty() {
        return Err("missing leading blank line".to_string());
    }
    let version_line = next_line(data, &mut pos)?;
    let version: i32 = version_line
        .trim()
        .strip_prefix("LinearSvm Version ")
        .ok_or("not a LinearSvm model")?
        .parse()
        .map_err(|_| "invalid version number".to_string())?;
    if version != SVM_VERSION {
        return Err(format!("unsupported version: {version}"));
    }

    let fields = parse_fields(next_line(data, &mut pos)?, "Params: ")?;
    let params = SvmParams {
        c: field(&fields, "c")?,
        gamma: field(&fields, "gamma")?,
        max_iter: field(&fields, "max_iter")?,
        epsilon: field(&fields, "epsilon")?,
        tolerance: field(&fields, "tolerance")?,
        seed: field(&fields, "seed")?,
    };

    let fields = parse_fields(next_line(data, &mut pos)?, "")?;
    let dim: usize = field(&fields, "Dimension")?;
    let labels_raw: String = field(&fields, "labels")?;
    let labels = labels_raw
        .split_whitespace()
        .map(|l| l.parse::<u32>().map_err(|_| format!("invalid label '{l}'")))
        .collect::<Result<Vec<_>, _>>()?;
    if labels.is_empty() {
        return Err("model has no labels".to_string());
    }
    if labels.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err("labels must be strictly ascending".to_string());
    }

    let npairs = labels.len() * (labels.len() - 1) / 2;
    let expected_pairs = labels
        .iter()
        .enumerate()
        .flat_map(|(i, &pos)| labels[i + 1..].iter().map(move |&neg| (pos, neg)));
    let mut heads = Vec::with_capacity(npairs);
    for (k, (want_pos, want_neg)) in expected_pairs.enumerate() {
        let fields = parse_fields(next_line(data, &mut pos)?, &format!("Pair[{k}]: "))?;
        let positive: u32 = field(&fields, "positive")?;
        let negative: u32 = field(&fields, "negative")?;
        if (positive, negative) != (want_pos, want_neg) {
            return Err(format!(
                "pair {k} is ({positive}, {negative}), expected ({want_pos}, {want_neg})"
            ));
        }
        let bias: f64 = field(&fields, "bias")?;
        heads.push((positive, negative, bias));
    }
    if next_line(data, &mut pos)?.trim() != "Weights:" {
        return Err("missing weights marker".to_string());
    }

    let expected = npairs
        .checked_mul(dim)
        .and_then(|n| n.checked_mul(8))
        .ok_or("model size overflow")?;
    let body = &data[pos..];
    if body.len() != expected {
        return Err(format!(
            "weight data size mismatch: expected {expected} bytes, got {}",
            body.len()
        ));
    }

    let mut chunks = body.chunks_exact(8);
    let mut classifiers = Vec::with_capacity(npairs);
    for (positive, negative, bias) in heads {
        let weights: Vec<f64> = chunks
            .by_ref()
            .take(dim)
            .map(|c| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(c);
                f64::from_le_bytes(raw)
            })
            .collect();
        classifiers.push(PairClassifier {
            positive,
            negative,
            weights,
            bias,
        });
    }

    Ok(LinearSvm {
        params,
        dim,
        labels,
        classifiers,
    })
}
