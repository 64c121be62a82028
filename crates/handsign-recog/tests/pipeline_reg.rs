//! Train / evaluate pipeline regression test
//!
//! Black frames labelled 0 and white frames labelled 1 must be separated
//! perfectly on both splits. The trained model is stored, loaded back and
//! must predict identically.
//!
//! Run with:
//! ```
//! cargo test -p handsign-recog --test pipeline_reg
//! ```

use handsign_io::ImageFormat;
use handsign_recog::{
    DirModelStore, MemoryModelStore, ModelStore, SegmentationRange, TrainMode, build_dataset,
    evaluate, load_model, run,
};
use handsign_test::{LabelFixture, RegParams, scratch_dir, write_dataset};

#[test]
fn pipeline_end_to_end_reg() {
    let mut rp = RegParams::new("pipeline_end_to_end");
    let root = scratch_dir("pipeline_end_to_end").unwrap();
    let data = root.join("dataset");
    write_dataset(
        &data,
        &[
            LabelFixture::new("0", (0, 0, 0), 10),
            LabelFixture::new("1", (255, 255, 255), 10),
        ],
        32,
        24,
        ImageFormat::Png,
    )
    .unwrap();

    let dataset = build_dataset(&data, &SegmentationRange::new(0, 180, 0, 255, 1, 255)).unwrap();
    let mut store = DirModelStore::new(root.join("models"));
    let report = run(&dataset, &mut store, "svm_linear.yml", TrainMode::Train).unwrap();

    rp.compare_values(14.0, report.train_count as f64, 0.0);
    rp.compare_values(6.0, report.test_count as f64, 0.0);
    rp.compare_values(1.0, report.test.accuracy.unwrap_or(0.0), 0.0);
    rp.compare_values(1.0, report.training_fit.accuracy.unwrap_or(0.0), 0.0);
    rp.compare_values(6.0, report.test.correct() as f64, 0.0);
    rp.check(
        root.join("models").join("svm_linear.yml").is_file(),
        "model blob written to the store directory",
    );

    // Load mode must reproduce the stored model exactly
    let reloaded = run(&dataset, &mut store, "svm_linear.yml", TrainMode::Load).unwrap();
    rp.check(reloaded.model == report.model, "loaded model equals trained model");
    rp.compare_values(1.0, reloaded.test.accuracy.unwrap_or(0.0), 0.0);

    assert!(rp.cleanup());
}

#[test]
fn pipeline_store_reg() {
    let mut rp = RegParams::new("pipeline_store");
    let root = scratch_dir("pipeline_store").unwrap();
    let data = root.join("dataset");
    write_dataset(
        &data,
        &[LabelFixture::new("2", (255, 255, 255), 3)],
        8,
        8,
        ImageFormat::Png,
    )
    .unwrap();
    let dataset = build_dataset(&data, &SegmentationRange::new(0, 180, 0, 255, 1, 255)).unwrap();

    let mut mem = MemoryModelStore::new();
    let report = run(&dataset, &mut mem, "single", TrainMode::Train).unwrap();
    rp.compare_values(1.0, mem.len() as f64, 0.0);
    // A single class predicts that class
    rp.compare_values(1.0, report.training_fit.accuracy.unwrap_or(0.0), 0.0);
    rp.check(report.test.accuracy.is_some(), "one test sample at position 3");

    let blob = mem.get("single").unwrap();
    let model = load_model(&mem, "single").unwrap();
    rp.compare_values(1.0, model.labels().len() as f64, 0.0);
    rp.check(!blob.is_empty(), "blob is not empty");

    let empty = evaluate(&model, &[]).unwrap();
    rp.check(empty.accuracy.is_none(), "empty evaluation has no accuracy");

    let missing = run(&dataset, &mut mem, "absent", TrainMode::Load);
    rp.check(missing.is_err(), "loading an absent model fails");

    assert!(rp.cleanup());
}
