//! Labeled dataset construction
//!
//! A dataset root holds one directory per class, named by its integer
//! label. Every `.jpg` or `.png` file inside is segmented, flattened
//! and routed to either the training or the test split.
//!
//! # Split policy
//!
//! Each label has a running position that starts at 1, advances after
//! every image and wraps from 10 back to 1. Positions 3, 5 and 8 go to
//! the test split, the other seven to training. Class directories and
//! the images inside them are visited in lexicographic order of their
//! names, so the routing is reproducible.

use crate::features::mask_to_features;
use crate::range::SegmentationRange;
use crate::segment::{SegmentOptions, segment_with_options};
use crate::{RecogError, RecogResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Image file suffixes accepted as samples (case-sensitive).
pub const IMAGE_SUFFIXES: [&str; 2] = [".jpg", ".png"];

/// Counter positions routed to the test split.
const TEST_POSITIONS: [u32; 3] = [3, 5, 8];

/// Length of one routing cycle.
const CYCLE_LEN: u32 = 10;

/// One labeled, segmented, flattened example
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Row-major mask values, 0.0 or 1.0
    pub features: Vec<f32>,
    /// Class label
    pub label: u32,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: Vec<f32>, label: u32) -> Self {
        Self { features, label }
    }
}

/// Destination of one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

/// Per-class running position deciding the split of each image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitCounter {
    position: u32,
}

impl Default for SplitCounter {
    fn default() -> Self {
        Self { position: 1 }
    }
}

impl SplitCounter {
    /// Create a counter at position 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Position the next image will take (1..=10).
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Route the next image and advance.
    pub fn route(&mut self) -> Split {
        let split = if TEST_POSITIONS.contains(&self.position) {
            Split::Test
        } else {
            Split::Train
        };
        self.position = if self.position >= CYCLE_LEN {
            1
        } else {
            self.position + 1
        };
        split
    }
}

/// Training and test splits
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub train: Vec<Sample>,
    pub test: Vec<Sample>,
}

impl Dataset {
    /// Total number of samples in both splits
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// Check whether both splits are empty
    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.test.is_empty()
    }
}

/// Builds a [`Dataset`] from a directory tree
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    range: SegmentationRange,
    options: SegmentOptions,
}

impl DatasetBuilder {
    /// Create a builder using the training range and default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the segmentation range
    pub fn with_range(mut self, range: SegmentationRange) -> Self {
        self.range = range;
        self
    }

    /// Set the segmentation options
    pub fn with_options(mut self, options: SegmentOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the dataset rooted at `root`.
    ///
    /// # Errors
    ///
    /// - [`RecogError::DirectoryNotFound`] if `root` is missing or unreadable
    /// - [`RecogError::Io`] if a class directory cannot be listed or an
    ///   image cannot be decoded
    /// - [`RecogError::InvalidRange`] if the range is invalid
    pub fn build(&self, root: impl AsRef<Path>) -> RecogResult<Dataset> {
        let root = root.as_ref();
        self.range.validate()?;
        self.options.validate()?;

        let class_dirs = list_class_dirs(root)?;
        let mut counters: BTreeMap<u32, SplitCounter> = BTreeMap::new();
        let mut dataset = Dataset::default();

        for (name, dir) in class_dirs {
            let label = match name.parse::<u32>() {
                Ok(label) => label,
                Err(_) => {
                    warn!(directory = %dir.display(), "skipping non-numeric class directory");
                    continue;
                }
            };

            let images = list_images(&dir)?;
            debug!(label, count = images.len(), "reading class directory");
            let counter = counters.entry(label).or_default();

            for path in images {
                let pix = handsign_io::read_image(&path).map_err(|e| RecogError::Io {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                let mask = segment_with_options(&pix, &self.range, &self.options)?;
                let sample = Sample::new(mask_to_features(&mask)?, label);

                let position = counter.position();
                match counter.route() {
                    Split::Train => dataset.train.push(sample),
                    Split::Test => dataset.test.push(sample),
                }
                debug!(path = %path.display(), label, position, "sample added");
            }
        }

        info!(train = dataset.train.len(), "training split built");
        info!(test = dataset.test.len(), "test split built");
        Ok(dataset)
    }
}

/// Build a dataset with the given range and default options.
pub fn build_dataset(root: impl AsRef<Path>, range: &SegmentationRange) -> RecogResult<Dataset> {
    DatasetBuilder::new().with_range(*range).build(root)
}

/// Subdirectories of `root` as `(name, path)`, sorted by name.
fn list_class_dirs(root: &Path) -> RecogResult<Vec<(String, PathBuf)>> {
    let not_found = || RecogError::DirectoryNotFound {
        path: root.to_path_buf(),
    };
    if !root.is_dir() {
        return Err(not_found());
    }
    let entries = fs::read_dir(root).map_err(|_| not_found())?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|_| not_found())?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => dirs.push((name, path)),
            Err(_) => warn!(directory = %path.display(), "skipping non-UTF-8 class directory"),
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Image files of one class directory, sorted by name.
fn list_images(dir: &Path) -> RecogResult<Vec<PathBuf>> {
    let io_err = |e: std::io::Error| RecogError::Io {
        path: dir.to_path_buf(),
        message: e.to_string(),
    };
    let mut images = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        let is_image = entry
            .file_name()
            .to_str()
            .is_some_and(|name| IMAGE_SUFFIXES.iter().any(|s| name.ends_with(s)));
        if is_image && path.is_file() {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_counter_cycle() {
        let mut counter = SplitCounter::new();
        let splits: Vec<Split> = (0..20).map(|_| counter.route()).collect();
        let test_positions: Vec<usize> = splits
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Split::Test)
            .map(|(i, _)| i + 1)
            .collect();
        assert_eq!(test_positions, vec![3, 5, 8, 13, 15, 18]);
        assert_eq!(counter.position(), 1);
    }

    #[test]
    fn test_split_counter_wraps() {
        let mut counter = SplitCounter::new();
        for _ in 0..9 {
            counter.route();
        }
        assert_eq!(counter.position(), 10);
        counter.route();
        assert_eq!(counter.position(), 1);
    }

    #[test]
    fn test_missing_root() {
        let root = std::env::temp_dir().join("handsign-no-such-dataset-root");
        let err = DatasetBuilder::new().build(&root).unwrap_err();
        assert!(matches!(err, RecogError::DirectoryNotFound { .. }));
    }
}
