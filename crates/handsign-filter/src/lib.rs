//! handsign-filter - Image filtering operations
//!
//! Rank filtering (median, min, max) of binary and grayscale images.

mod error;
pub mod rank;

pub use error::{FilterError, FilterResult};

pub use rank::{
    max_filter, median_filter, min_filter, rank_filter, rank_filter_binary, rank_filter_gray,
};
