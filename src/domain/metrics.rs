// ============================================================
// Layer 3: Classification Metrics
// ============================================================
// Binary confusion counts (class 1 is the positive class)
// and the five metrics reported for every evaluation:
//
//   Sensitivity = TP / (TP + FN)
//   Precision   = TP / (TP + FP)
//   Recall      = TP / (TP + FN)
//   Specificity = TN / (TN + FP)
//   MCC         = (TP·TN − FP·FN) /
//                 sqrt((TP+FP)(TP+FN)(TN+FP)(TN+FN))
//
// A ratio whose denominator is zero is reported as 0.
//
// Reference: Matthews (1975), Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// Counts of a binary classifier's outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives:  u64,
    pub false_positives: u64,
    pub true_negatives:  u64,
    pub false_negatives: u64,
}

impl ConfusionMatrix {
    /// Add counts computed for one batch.
    ///
    /// `predicted_positive` and `actual_positive` count the
    /// positives among predictions and labels respectively.
    pub fn accumulate(
        &mut self,
        total:              u64,
        true_positives:     u64,
        predicted_positive: u64,
        actual_positive:    u64,
    ) {
        let fp = predicted_positive - true_positives;
        let fn_ = actual_positive - true_positives;
        self.true_positives  += true_positives;
        self.false_positives += fp;
        self.false_negatives += fn_;
        self.true_negatives  += total - true_positives - fp - fn_;
    }

    pub fn total(&self) -> u64 {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn metrics(&self) -> ClassificationMetrics {
        ClassificationMetrics::from(self)
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// The five metrics written after every evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub sensitivity: f64,
    pub precision:   f64,
    pub recall:      f64,
    pub specificity: f64,
    pub mcc:         f64,
}

impl From<&ConfusionMatrix> for ClassificationMetrics {
    fn from(cm: &ConfusionMatrix) -> Self {
        let tp = cm.true_positives  as f64;
        let fp = cm.false_positives as f64;
        let tn = cm.true_negatives  as f64;
        let fn_ = cm.false_negatives as f64;

        let mcc_den = ((tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_)).sqrt();

        Self {
            sensitivity: ratio(tp, tp + fn_),
            precision:   ratio(tp, tp + fp),
            recall:      ratio(tp, tp + fn_),
            specificity: ratio(tn, tn + fp),
            mcc:         ratio(tp * tn - fp * fn_, mcc_den),
        }
    }
}

impl ClassificationMetrics {
    /// Element-wise mean over several evaluations (e.g. the test
    /// results of every fold). Returns None for an empty slice.
    pub fn mean(all: &[ClassificationMetrics]) -> Option<Self> {
        if all.is_empty() {
            return None;
        }
        let n = all.len() as f64;
        let sum = all.iter().fold(Self::default(), |acc, m| Self {
            sensitivity: acc.sensitivity + m.sensitivity,
            precision:   acc.precision   + m.precision,
            recall:      acc.recall      + m.recall,
            specificity: acc.specificity + m.specificity,
            mcc:         acc.mcc         + m.mcc,
        });
        Some(Self {
            sensitivity: sum.sensitivity / n,
            precision:   sum.precision   / n,
            recall:      sum.recall      / n,
            specificity: sum.specificity / n,
            mcc:         sum.mcc         / n,
        })
    }
}

impl std::fmt::Display for ClassificationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sensitivity: {:.5}, Precision: {:.5}, Recall: {:.5}, Specificity: {:.5}, MCC: {:.5}",
            self.sensitivity, self.precision, self.recall, self.specificity, self.mcc,
        )
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_known_confusion_matrix() {
        let cm = ConfusionMatrix {
            true_positives:  40,
            false_positives: 10,
            true_negatives:  30,
            false_negatives: 20,
        };
        let m = cm.metrics();
        assert!(close(m.sensitivity, 40.0 / 60.0));
        assert!(close(m.precision,   40.0 / 50.0));
        assert_eq!(m.recall, m.sensitivity);
        assert!(close(m.specificity, 30.0 / 40.0));
        // (40·30 − 10·20) / sqrt(50·60·40·50)
        assert!(close(m.mcc, 1000.0 / 6_000_000f64.sqrt()));
    }

    #[test]
    fn test_zero_denominators_give_zero() {
        // Only negatives, all predicted negative
        let cm = ConfusionMatrix { true_negatives: 5, ..Default::default() };
        let m = cm.metrics();
        assert_eq!(m.sensitivity, 0.0);
        assert_eq!(m.precision,   0.0);
        assert_eq!(m.specificity, 1.0);
        assert_eq!(m.mcc,         0.0);
    }

    #[test]
    fn test_accumulate_batches() {
        let mut cm = ConfusionMatrix::default();
        // 6 samples, 2 TP, 3 predicted positive, 3 actual positive
        cm.accumulate(6, 2, 3, 3);
        // 4 samples, no positives at all
        cm.accumulate(4, 0, 0, 0);

        assert_eq!(
            cm,
            ConfusionMatrix { true_positives: 2, false_positives: 1, true_negatives: 6, false_negatives: 1 }
        );
        assert_eq!(cm.total(), 10);
    }

    #[test]
    fn test_perfect_classifier_has_unit_mcc() {
        let cm = ConfusionMatrix { true_positives: 7, true_negatives: 3, ..Default::default() };
        assert!(close(cm.metrics().mcc, 1.0));
    }

    #[test]
    fn test_mean_over_folds() {
        let a = ClassificationMetrics { sensitivity: 0.5, precision: 1.0, recall: 0.5, specificity: 0.0, mcc: 0.2 };
        let b = ClassificationMetrics { sensitivity: 1.0, precision: 0.0, recall: 1.0, specificity: 1.0, mcc: 0.4 };
        let m = ClassificationMetrics::mean(&[a, b]).unwrap();
        assert!(close(m.sensitivity, 0.75));
        assert!(close(m.precision,   0.5));
        assert!(close(m.mcc,         0.3));
        assert!(ClassificationMetrics::mean(&[]).is_none());
    }

    #[test]
    fn test_display_uses_five_decimals() {
        let m = ClassificationMetrics { sensitivity: 0.5, precision: 0.25, recall: 0.5, specificity: 1.0, mcc: -0.125 };
        assert_eq!(
            m.to_string(),
            "Sensitivity: 0.50000, Precision: 0.25000, Recall: 0.50000, Specificity: 1.00000, MCC: -0.12500"
        );
    }
}
