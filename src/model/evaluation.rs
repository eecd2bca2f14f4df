//! Restoration quality of a learned model against the training labels.

/// Agreement between predicted and true categories.
///
/// The confusion counts treat category `>= 1` as positive, which is exactly
/// "accepted" for binary data and "above the lowest category" otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    pub total: usize,
    /// Entities whose predicted category differs from the label.
    pub mismatches: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl Evaluation {
    /// Compares predictions with labels, entity by entity.
    ///
    /// # Panics
    ///
    /// If the two slices differ in length.
    pub fn compare(predicted: &[usize], truth: &[usize]) -> Self {
        assert_eq!(
            predicted.len(),
            truth.len(),
            "prediction and label counts differ"
        );

        let mut eval = Self {
            total: truth.len(),
            ..Self::default()
        };
        for (&p, &t) in predicted.iter().zip(truth) {
            if p != t {
                eval.mismatches += 1;
            }
            match (p >= 1, t >= 1) {
                (true, true) => eval.true_positives += 1,
                (true, false) => eval.false_positives += 1,
                (false, true) => eval.false_negatives += 1,
                (false, false) => eval.true_negatives += 1,
            }
        }
        eval
    }

    /// Fraction of entities restored to their exact category; 1.0 when empty.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.total - self.mismatches) as f64 / self.total as f64
    }

    /// F1 score of the positive class; 1.0 when there is nothing to find
    /// and nothing was predicted.
    pub fn f1(&self) -> f64 {
        let denom = 2 * self.true_positives + self.false_positives + self.false_negatives;
        if denom == 0 {
            return 1.0;
        }
        (2 * self.true_positives) as f64 / denom as f64
    }

    pub fn is_perfect(&self) -> bool {
        self.mismatches == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_confusion() {
        let eval = Evaluation::compare(&[1, 1, 0, 0, 1], &[1, 0, 1, 0, 1]);
        assert_eq!(eval.total, 5);
        assert_eq!(eval.mismatches, 2);
        assert_eq!(eval.true_positives, 2);
        assert_eq!(eval.false_positives, 1);
        assert_eq!(eval.false_negatives, 1);
        assert_eq!(eval.true_negatives, 1);
        assert!((eval.accuracy() - 0.6).abs() < 1e-12);
        assert!((eval.f1() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_ordered_mismatch_inside_positive_class() {
        // 2 vs 1: both positive, but still a mismatch
        let eval = Evaluation::compare(&[2, 0], &[1, 0]);
        assert_eq!(eval.mismatches, 1);
        assert_eq!(eval.true_positives, 1);
        assert!(!eval.is_perfect());
        assert_eq!(eval.f1(), 1.0);
    }

    #[test]
    fn test_empty() {
        let eval = Evaluation::compare(&[], &[]);
        assert!(eval.is_perfect());
        assert_eq!(eval.accuracy(), 1.0);
        assert_eq!(eval.f1(), 1.0);
    }

    #[test]
    #[should_panic(expected = "prediction and label counts differ")]
    fn test_length_mismatch_panics() {
        Evaluation::compare(&[0], &[0, 1]);
    }
}
