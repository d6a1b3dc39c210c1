//! Hand-authored evaluation metrics snapshot.
//!
//! The confusion matrix below was transcribed from the offline evaluation
//! of the shipped artifact on its held-out split. It is display-only data:
//! nothing here is derived from live inference. Per-class metrics are
//! computed from the matrix so a future transcription update cannot drift
//! out of sync with them.

use serde::Serialize;

use crate::species::{CLASS_COUNT, CLASS_ORDER};

/// Rows are actual classes, columns predicted, both in class-index order.
pub type ConfusionMatrix = [[u32; CLASS_COUNT]; CLASS_COUNT];

/// Derived metrics for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub identifier: &'static str,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u32,
}

/// Immutable snapshot of the held-out evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluationSnapshot {
    pub matrix: ConfusionMatrix,
}

/// Evaluation of the shipped MobileNetV2 artifact, 240 held-out images.
pub static EVALUATION: EvaluationSnapshot = EvaluationSnapshot {
    matrix: [
        [37, 1, 1, 0, 0, 1],
        [2, 35, 1, 1, 1, 0],
        [1, 0, 33, 2, 3, 1],
        [0, 1, 2, 36, 1, 0],
        [1, 1, 4, 1, 32, 1],
        [2, 0, 1, 0, 1, 36],
    ],
};

impl EvaluationSnapshot {
    /// Total number of evaluated samples.
    pub fn total(&self) -> u32 {
        self.matrix.iter().flatten().sum()
    }

    /// Number of actual samples of a class (row sum).
    pub fn support(&self, class: usize) -> u32 {
        self.matrix[class].iter().sum()
    }

    fn predicted_total(&self, class: usize) -> u32 {
        self.matrix.iter().map(|row| row[class]).sum()
    }

    /// Fraction of all samples on the matrix diagonal.
    pub fn accuracy(&self) -> f64 {
        let correct: u32 = (0..CLASS_COUNT).map(|i| self.matrix[i][i]).sum();
        f64::from(correct) / f64::from(self.total())
    }

    /// True positives over predicted positives; 0 when the class was never
    /// predicted.
    pub fn precision(&self, class: usize) -> f64 {
        let predicted = self.predicted_total(class);
        if predicted == 0 {
            return 0.0;
        }
        f64::from(self.matrix[class][class]) / f64::from(predicted)
    }

    /// True positives over actual positives; 0 for an absent class.
    pub fn recall(&self, class: usize) -> f64 {
        let support = self.support(class);
        if support == 0 {
            return 0.0;
        }
        f64::from(self.matrix[class][class]) / f64::from(support)
    }

    /// Harmonic mean of precision and recall.
    pub fn f1(&self, class: usize) -> f64 {
        let p = self.precision(class);
        let r = self.recall(class);
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }

    /// Derived metrics for every class, in class-index order.
    pub fn per_class(&self) -> Vec<ClassMetrics> {
        (0..CLASS_COUNT)
            .map(|class| ClassMetrics {
                identifier: CLASS_ORDER[class],
                precision: self.precision(class),
                recall: self.recall(class),
                f1: self.f1(class),
                support: self.support(class),
            })
            .collect()
    }

    /// Unweighted mean of per-class F1 scores.
    pub fn macro_f1(&self) -> f64 {
        let sum: f64 = (0..CLASS_COUNT).map(|class| self.f1(class)).sum();
        sum / CLASS_COUNT as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn support_is_the_row_sum() {
        for class in 0..CLASS_COUNT {
            let row_sum: u32 = EVALUATION.matrix[class].iter().sum();
            assert_eq!(EVALUATION.support(class), row_sum);
        }
        assert_eq!(EVALUATION.total(), 240);
    }

    #[test]
    fn accuracy_is_trace_over_total() {
        assert_relative_eq!(EVALUATION.accuracy(), 209.0 / 240.0, epsilon = 1e-12);
    }

    #[test]
    fn moon_precision_and_recall_match_hand_check() {
        // Column 0 sums to 43, row 0 to 40, diagonal entry is 37.
        assert_relative_eq!(EVALUATION.precision(0), 37.0 / 43.0, epsilon = 1e-12);
        assert_relative_eq!(EVALUATION.recall(0), 37.0 / 40.0, epsilon = 1e-12);
    }

    #[test]
    fn f1_is_the_harmonic_mean() {
        for class in 0..CLASS_COUNT {
            let p = EVALUATION.precision(class);
            let r = EVALUATION.recall(class);
            assert_relative_eq!(EVALUATION.f1(class), 2.0 * p * r / (p + r), epsilon = 1e-12);
        }
    }

    #[test]
    fn per_class_covers_every_class_in_order() {
        let metrics = EVALUATION.per_class();
        assert_eq!(metrics.len(), CLASS_COUNT);
        for (idx, m) in metrics.iter().enumerate() {
            assert_eq!(m.identifier, CLASS_ORDER[idx]);
            assert!(m.precision > 0.0 && m.precision <= 1.0);
            assert!(m.recall > 0.0 && m.recall <= 1.0);
        }
    }

    #[test]
    fn empty_matrix_degrades_to_zero_metrics() {
        let empty = EvaluationSnapshot {
            matrix: [[0; CLASS_COUNT]; CLASS_COUNT],
        };
        assert_eq!(empty.precision(0), 0.0);
        assert_eq!(empty.recall(0), 0.0);
        assert_eq!(empty.f1(0), 0.0);
    }
}
