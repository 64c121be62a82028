//! handsign-morph - Morphological operations for binary masks
//!
//! - Structuring elements (SEL): bricks, ellipses and disks
//! - Binary dilation by word-level rasterop

pub mod binary;
mod error;
pub mod sel;

pub use error::{MorphError, MorphResult};
pub use sel::{Sel, SelElement};

pub use binary::{dilate, dilate_brick};
