//! Batch ingestion and the per-image pipeline.
//!
//! Each image flows decode -> preprocess -> predict -> synthesize exactly
//! once; every consumer (tabular export, narrative export, on-screen
//! display) reuses the same [`Prediction`]. Processing is sequential and
//! order-independent; nothing survives the batch.

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::classifier::Classifier;
use crate::error::{Error, Result};
use crate::preprocess;
use crate::species::{self, SpeciesRecord};
use crate::synthesis::{self, ConfidenceTier, Prediction};

/// Options controlling how folder scanning behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanOptions {
    /// When true, scan subdirectories recursively.
    pub recursive: bool,
}

/// Scan a folder for supported images, sorted by path.
pub fn scan_folder(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    scan_folder_with(path, ScanOptions::default())
}

/// Scan a folder with options.
pub fn scan_folder_with(path: impl AsRef<Path>, opts: ScanOptions) -> Result<Vec<PathBuf>> {
    let root = path.as_ref();
    if !root.exists() {
        return Err(Error::Scan {
            path: root.to_path_buf(),
            reason: "path does not exist".to_string(),
        });
    }
    if !root.is_dir() {
        return Err(Error::Scan {
            path: root.to_path_buf(),
            reason: "path is not a directory".to_string(),
        });
    }

    let walker = if opts.recursive {
        WalkDir::new(root).into_iter()
    } else {
        WalkDir::new(root).max_depth(1).into_iter()
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("walkdir error: {e}");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && is_supported_image(path) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            matches!(ext.as_str(), "jpg" | "jpeg" | "png" | "webp")
        }
        None => false,
    }
}

/// One classified image joined to its species record.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub file: PathBuf,
    pub prediction: Prediction,
    pub species: &'static SpeciesRecord,
}

/// An image that produced no prediction.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedImage {
    pub file: PathBuf,
    pub reason: String,
}

/// Aggregate confidence tier counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
}

/// Ordered outcome of one upload batch. Exists only until the exports are
/// written; no cross-batch state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub items: Vec<BatchItem>,
    pub skipped: Vec<SkippedImage>,
}

impl BatchResult {
    /// True when nothing was classified. Skips alone still count as empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn tier_counts(&self) -> TierCounts {
        let mut counts = TierCounts::default();
        for item in &self.items {
            match item.prediction.tier() {
                ConfidenceTier::High => counts.high += 1,
                ConfidenceTier::Moderate => counts.moderate += 1,
                ConfidenceTier::Low => counts.low += 1,
            }
        }
        counts
    }
}

/// Classify a batch of image files in order.
///
/// `classifier` is `None` in degraded mode (model artifact unavailable):
/// every image is then skipped with a visible reason instead of failing the
/// session.
pub fn classify_batch(classifier: Option<&dyn Classifier>, files: &[PathBuf]) -> BatchResult {
    classify_batch_with_progress(classifier, files, |_, _| {})
}

/// Classify a batch, invoking `progress(done, total)` after each image.
pub fn classify_batch_with_progress<F>(
    classifier: Option<&dyn Classifier>,
    files: &[PathBuf],
    mut progress: F,
) -> BatchResult
where
    F: FnMut(usize, usize),
{
    let total = files.len();
    let mut result = BatchResult::default();
    for (idx, file) in files.iter().enumerate() {
        match classify_single(classifier, file) {
            Ok(item) => result.items.push(item),
            Err(err) => {
                tracing::warn!("skipping {}: {err}", file.display());
                result.skipped.push(SkippedImage {
                    file: file.clone(),
                    reason: err.to_string(),
                });
            }
        }
        progress(idx + 1, total);
    }
    result
}

fn classify_single(classifier: Option<&dyn Classifier>, file: &Path) -> Result<BatchItem> {
    let Some(classifier) = classifier else {
        return Err(Error::ModelUnavailable {
            reason: "no model available".to_string(),
        });
    };
    let img = preprocess::decode_image(file)?;
    let tensor = preprocess::preprocess(&img);
    let probs = classifier.predict(&tensor)?;
    let prediction = synthesis::synthesize(&probs)?;
    let record = species::lookup(prediction.species).unwrap_or_else(species::placeholder);
    Ok(BatchItem {
        file: file.to_path_buf(),
        prediction,
        species: record,
    })
}
