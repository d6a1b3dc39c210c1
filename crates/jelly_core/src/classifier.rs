//! Inference adapter around the pre-trained ONNX artifact.

use ndarray::{Array4, CowArray};
use once_cell::sync::Lazy;
use ort::{
    GraphOptimizationLevel, SessionBuilder, environment::Environment, session::Session,
    tensor::OrtOwnedTensor, value::Value,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::preprocess::INPUT_SIZE;
use crate::species::CLASS_COUNT;

static ORT_ENV: Lazy<Arc<Environment>> = Lazy::new(|| {
    Environment::builder()
        .with_name("jelly-vision")
        .build()
        .expect("failed to initialize ONNX Runtime environment")
        .into_arc()
});

/// A single forward pass producing a softmax probability vector over the
/// known classes, in class-index order.
pub trait Classifier {
    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>>;
}

/// Configuration for the ONNX-based MobileNetV2 classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    pub input_size: u32,
    /// Set when the artifact was exported without its terminal softmax layer.
    pub apply_softmax: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/jellyfish_mobilenetv2.onnx"),
            input_size: INPUT_SIZE,
            apply_softmax: false,
        }
    }
}

/// MobileNetV2 classifier backed by ONNX Runtime.
#[derive(Debug)]
pub struct MobileNetOrt {
    session: Session,
    apply_softmax: bool,
}

impl MobileNetOrt {
    /// Load the model artifact. Every failure maps to
    /// [`Error::ModelUnavailable`] so callers can degrade to a predictions-off
    /// session instead of aborting.
    pub fn load(cfg: &ClassifierConfig) -> Result<Self> {
        if !cfg.model_path.exists() {
            return Err(Error::ModelUnavailable {
                reason: format!("model file missing: {}", cfg.model_path.display()),
            });
        }
        let env = ORT_ENV.clone();
        let session = SessionBuilder::new(&env)
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level1))
            .and_then(|b| b.with_model_from_file(&cfg.model_path))
            .map_err(|e| Error::ModelUnavailable {
                reason: e.to_string(),
            })?;

        // The class list is a hidden contract with the training run. Where
        // the graph declares a static output width, check it up front rather
        // than at the first prediction.
        if let Some(classes) = session
            .outputs
            .first()
            .and_then(|o| o.dimensions.last().copied().flatten())
        {
            if classes as usize != CLASS_COUNT {
                return Err(Error::ModelUnavailable {
                    reason: format!("artifact predicts {classes} classes, expected {CLASS_COUNT}"),
                });
            }
        }

        Ok(Self {
            session,
            apply_softmax: cfg.apply_softmax,
        })
    }
}

impl Classifier for MobileNetOrt {
    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        let input_array = input.clone().into_dyn();
        let cow = CowArray::from(input_array.view());
        let value = Value::from_array(self.session.allocator(), &cow).map_err(|e| {
            Error::ModelUnavailable {
                reason: format!("could not build input tensor: {e}"),
            }
        })?;
        let outputs: Vec<Value> =
            self.session
                .run(vec![value])
                .map_err(|e| Error::ModelUnavailable {
                    reason: e.to_string(),
                })?;
        let first = outputs.first().ok_or_else(|| Error::ModelUnavailable {
            reason: "model produced no output".to_string(),
        })?;
        let tensor: OrtOwnedTensor<f32, _> =
            first.try_extract().map_err(|e| Error::ModelUnavailable {
                reason: e.to_string(),
            })?;
        let view = tensor.view();
        let mut probs: Vec<f32> = view.iter().copied().collect();
        if self.apply_softmax {
            probs = softmax(&probs);
        }
        if probs.len() != CLASS_COUNT {
            return Err(Error::ClassCountMismatch {
                expected: CLASS_COUNT,
                actual: probs.len(),
            });
        }
        Ok(probs)
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|x| x / sum).collect()
}
