//! Error types for the identification pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while classifying images or generating exports.
///
/// Per-image failures (`InvalidImage`) are recoverable: the batch skips the
/// image and continues. A missing model (`ModelUnavailable`) degrades the
/// whole batch to skips but never aborts the session.
#[derive(Error, Debug)]
pub enum Error {
    /// Model artifact missing, unloadable, or answering outside its contract.
    #[error("model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    /// Upload could not be decoded or converted.
    #[error("invalid image {path}: {reason}")]
    InvalidImage { path: PathBuf, reason: String },

    /// Report requested with zero classified results.
    #[error("report requested for an empty batch")]
    EmptyBatch,

    /// Probability vector length does not match the known class list.
    #[error("classifier returned {actual} probabilities, expected {expected}")]
    ClassCountMismatch { expected: usize, actual: usize },

    /// Folder ingestion failed before any image was looked at.
    #[error("cannot scan {path}: {reason}")]
    Scan { path: PathBuf, reason: String },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Image codec error outside the per-upload decode path.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
