//! Error types for handsign-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// handsign-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Invalid pixel depth
    #[error("invalid pixel depth: {0} bpp")]
    InvalidDepth(u32),

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Unsupported pixel depth for this operation
    #[error("unsupported pixel depth: {0} bpp")]
    UnsupportedDepth(u32),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Pixel value does not fit the image depth
    #[error("pixel value {value} exceeds maximum {max} for this depth")]
    ValueOutOfRange { value: u32, max: u32 },
}

/// Result type alias for handsign-core operations
pub type Result<T> = std::result::Result<T, Error>;
