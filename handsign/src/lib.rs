//! handsign - Hand gesture recognition for Rust
//!
//! # Overview
//!
//! Frames are segmented in HSV space into a fixed-size binary mask, the
//! mask is flattened into a feature vector and a linear SVM maps it to a
//! gesture label. A debouncer turns per-frame labels into a rate-limited
//! symbol stream.
//!
//! - Image I/O (PNG, JPEG)
//! - HSV conversion and range thresholding
//! - Median filtering and disk dilation of masks
//! - Dataset building, training, evaluation and model storage
//!
//! # Example
//!
//! ```
//! use handsign::{Pix, PixelDepth};
//! use handsign::recog::{SegmentationRange, segment};
//!
//! let frame = Pix::new(320, 240, PixelDepth::Bit32).unwrap();
//! let mask = segment(&frame, &SegmentationRange::TRAINING).unwrap();
//! assert_eq!(mask.width(), 640);
//! assert_eq!(mask.height(), 480);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use handsign_core::{Error, Pix, PixMut, PixelDepth, Result};

// Re-export domain crates as modules to avoid name conflicts
pub use handsign_color as color;
pub use handsign_filter as filter;
pub use handsign_io as io;
pub use handsign_morph as morph;
pub use handsign_recog as recog;
pub use handsign_transform as transform;
