//! Turns a raw probability vector into a ranked, tiered prediction.

use serde::Serialize;
use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::species::{self, CLASS_COUNT};

/// Tier thresholds and top-K are display policy, independent of the
/// classifier itself.
pub const MODERATE_THRESHOLD: f32 = 0.60;
pub const HIGH_THRESHOLD: f32 = 0.80;
pub const TOP_K: usize = 3;

/// Three-level bucketing of the top confidence, used for advisory display
/// only. The prediction itself is never blocked on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceTier {
    Low,
    Moderate,
    High,
}

impl ConfidenceTier {
    /// Bucket a confidence value. Total over all inputs.
    pub fn of(confidence: f32) -> Self {
        if confidence < MODERATE_THRESHOLD {
            ConfidenceTier::Low
        } else if confidence < HIGH_THRESHOLD {
            ConfidenceTier::Moderate
        } else {
            ConfidenceTier::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceTier::Low => "Low",
            ConfidenceTier::Moderate => "Moderate",
            ConfidenceTier::High => "High",
        }
    }

    /// Advisory note for the tabular export.
    pub fn advisory(self) -> &'static str {
        match self {
            ConfidenceTier::Low => "Verify — may not be a supported species",
            ConfidenceTier::Moderate => "Consider using a clearer image",
            ConfidenceTier::High => "OK",
        }
    }

    /// Badge color used by the narrative export.
    pub fn badge_color(self) -> &'static str {
        match self {
            ConfidenceTier::Low => "#ef4444",
            ConfidenceTier::Moderate => "#eab308",
            ConfidenceTier::High => "#22c55e",
        }
    }
}

/// One class with its probability, as ranked for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassScore {
    pub index: usize,
    pub identifier: &'static str,
    pub probability: f32,
}

/// Ranked outcome of one inference call. Derived per image, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Identifier of the argmax class.
    pub species: &'static str,
    /// Probability of the argmax class. Not a calibrated certainty.
    pub confidence: f32,
    /// Every known class, descending by probability, ties broken by lower
    /// class index.
    pub ranking: Vec<ClassScore>,
}

impl Prediction {
    pub fn tier(&self) -> ConfidenceTier {
        ConfidenceTier::of(self.confidence)
    }

    /// The highest-probability classes, at most [`TOP_K`].
    pub fn top_k(&self) -> &[ClassScore] {
        &self.ranking[..TOP_K.min(self.ranking.len())]
    }
}

/// Rank a probability vector against the fixed class list.
///
/// Pure: the same vector always yields the same prediction. The argmax is
/// always reported, even when the top score is barely above chance;
/// confidence gating is the consumer's concern.
pub fn synthesize(probs: &[f32]) -> Result<Prediction> {
    if probs.len() != CLASS_COUNT {
        return Err(Error::ClassCountMismatch {
            expected: CLASS_COUNT,
            actual: probs.len(),
        });
    }
    let mut ranking: Vec<ClassScore> = probs
        .iter()
        .enumerate()
        .map(|(index, &probability)| ClassScore {
            index,
            identifier: species::CLASS_ORDER[index],
            probability,
        })
        .collect();
    // Stable sort: on equal probabilities the lower class index stays first.
    ranking.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });
    let top = ranking[0];
    Ok(Prediction {
        species: top.identifier,
        confidence: top.probability,
        ranking,
    })
}
