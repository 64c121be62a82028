//! handsign-transform - Geometric transforms
//!
//! Provides nearest-neighbour scaling to a fixed size or by factor.

mod error;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use scale::{scale_by_sampling, scale_to_size_sampled};
