//! Jellyfish species identification pipeline.
//!
//! Decodes uploaded photos, runs each one through a pre-trained 6-class
//! MobileNetV2 classifier (ONNX Runtime), and turns the probability vectors
//! into ranked predictions with confidence tiers, species reference facts,
//! and two export artifacts: a CSV table and a self-contained HTML report.
//!
//! The pipeline is a single strictly sequential pass per batch; no state is
//! shared across images. When the model artifact is missing the batch runs
//! in degraded mode: every image is skipped with a visible warning instead
//! of the session failing.

pub mod batch;
pub mod classifier;
pub mod config;
pub mod error;
pub mod gallery;
pub mod metrics;
pub mod preprocess;
pub mod report;
pub mod species;
pub mod synthesis;

pub use batch::{
    BatchItem, BatchResult, ScanOptions, SkippedImage, TierCounts, classify_batch,
    classify_batch_with_progress, scan_folder, scan_folder_with,
};
pub use classifier::{Classifier, ClassifierConfig, MobileNetOrt};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use gallery::GalleryAssets;
pub use metrics::{ClassMetrics, EVALUATION, EvaluationSnapshot};
pub use preprocess::{INPUT_SIZE, decode_image, decode_image_bytes, preprocess};
pub use report::{
    CSV_HEADER, render_narrative, tabular_to_writer, write_narrative, write_tabular,
};
pub use species::{CLASS_COUNT, CLASS_ORDER, Danger, SpeciesRecord};
pub use synthesis::{
    ClassScore, ConfidenceTier, HIGH_THRESHOLD, MODERATE_THRESHOLD, Prediction, TOP_K, synthesize,
};
