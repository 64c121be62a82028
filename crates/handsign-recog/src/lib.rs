//! handsign-recog - Hand gesture recognition
//!
//! This crate turns color frames into gesture labels:
//!
//! - **Segmentation**: HSV window, median cleanup, disk dilation, resize to 640x480
//! - **Dataset building**: labelled folders split 7/3 into train and test
//! - **Classification**: one-vs-one linear SVM with accuracy reporting
//! - **Live prediction**: per-frame classification with a 3 s debounce
//!
//! # Quick Start
//!
//! ```no_run
//! use handsign_recog::{DirModelStore, SegmentationRange, TrainMode, build_dataset, run};
//!
//! let dataset = build_dataset("dataset", &SegmentationRange::TRAINING).unwrap();
//! let mut store = DirModelStore::new("models");
//! let report = run(&dataset, &mut store, "svm_linear.yml", TrainMode::Train).unwrap();
//! println!("test accuracy: {:?}", report.test.accuracy);
//! ```
//!
//! # Modules
//!
//! - [`range`]: segmentation window and its text store
//! - [`segment`]: frame to mask
//! - [`features`]: mask to feature vector
//! - [`dataset`]: folder walk and train/test split
//! - [`svm`]: linear SVM and its serialized form
//! - [`store`]: named model blobs
//! - [`pipeline`]: train, evaluate, train-or-load
//! - [`debounce`]: prediction rate limiting
//! - [`live`]: frame stream to emitted labels

pub mod dataset;
pub mod debounce;
mod error;
pub mod features;
pub mod live;
pub mod pipeline;
pub mod range;
pub mod segment;
pub mod store;
pub mod svm;

pub use error::{RecogError, RecogResult};

pub use dataset::{Dataset, DatasetBuilder, Sample, Split, SplitCounter, build_dataset};
pub use debounce::{DebounceOptions, DebounceState, PredictionDebouncer};
pub use features::{FEATURE_LEN, mask_to_features};
pub use live::LivePredictor;
pub use pipeline::{
    Evaluation, Prediction, TrainMode, TrainReport, evaluate, evaluate_training_fit, run, train,
    train_or_load, train_with_params,
};
pub use range::SegmentationRange;
pub use segment::{MASK_HEIGHT, MASK_WIDTH, SegmentOptions, segment, segment_with_options};
pub use store::{DirModelStore, MemoryModelStore, ModelStore, load_model, save_model};
pub use svm::{LinearSvm, PairClassifier, SvmParams};

// Re-export core for convenience
pub use handsign_core;
