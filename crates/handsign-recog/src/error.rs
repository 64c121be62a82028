//! Error types for handsign-recog

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during segmentation, training and prediction
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] handsign_core::Error),

    /// Image I/O error
    #[error("image I/O error: {0}")]
    Image(#[from] handsign_io::IoError),

    /// Color library error
    #[error("color error: {0}")]
    Color(#[from] handsign_color::ColorError),

    /// Filter library error
    #[error("filter error: {0}")]
    Filter(#[from] handsign_filter::FilterError),

    /// Morphology library error
    #[error("morph error: {0}")]
    Morph(#[from] handsign_morph::MorphError),

    /// Transform library error
    #[error("transform error: {0}")]
    Transform(#[from] handsign_transform::TransformError),

    /// Segmentation range out of its channel domain or inverted
    #[error("invalid segmentation range: {0}")]
    InvalidRange(String),

    /// Malformed threshold parameter text
    #[error("malformed range text at line {line}: {message}")]
    RangeFormat { line: usize, message: String },

    /// Dataset root missing or unreadable
    #[error("dataset directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// File-level failure carrying the offending path
    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Stream-level I/O error
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),

    /// Feature vector of the wrong length
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// No samples to train on
    #[error("training set is empty")]
    EmptyTrainingSet,

    /// Named model absent or corrupt
    #[error("failed to load model '{name}': {message}")]
    ModelLoad { name: String, message: String },

    /// Unsupported pixel depth for this operation
    #[error("unsupported depth: expected {expected}, got {actual}")]
    UnsupportedDepth { expected: &'static str, actual: u32 },

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for recognition operations
pub type RecogResult<T> = Result<T, RecogError>;
