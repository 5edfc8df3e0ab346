use ml_core::MlError;

/// Absorbs the rounding of `predicted - expected` so a difference that equals
/// the tolerance in decimal counts as accurate on both sides.
const TOLERANCE_SLACK: f64 = 1e-12;

/// Rules predictions are judged by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criteria {
    /// A prediction is accurate when `|predicted - expected| <= tolerance`.
    pub tolerance: f64,
    /// Songs whose hotttnesss is strictly above this value are popular.
    pub popularity_threshold: f64,
}

/// Predicted and expected outputs, paired by position.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    predicted: Vec<f64>,
    expected: Vec<f64>,
}

impl PredictionResult {
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if the sequences differ in length.
    pub fn new(predicted: Vec<f64>, expected: Vec<f64>) -> Result<Self, MlError> {
        if predicted.len() != expected.len() {
            return Err(MlError::ShapeMismatch {
                what: "predictions",
                got: predicted.len(),
                expected: expected.len(),
            });
        }

        Ok(Self {
            predicted,
            expected,
        })
    }

    pub fn predicted(&self) -> &[f64] {
        &self.predicted
    }

    pub fn expected(&self) -> &[f64] {
        &self.expected
    }

    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.predicted.iter().copied().zip(self.expected.iter().copied())
    }
}

/// Share of each popularity class predicted on the correct side of the threshold.
///
/// A ratio is `NaN` when its class has no records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopularityRatios {
    pub popular: f64,
    pub unpopular: f64,
}

/// Accuracy metrics over a `PredictionResult`.
pub struct Analysis<'a> {
    result: &'a PredictionResult,
    criteria: Criteria,
}

impl<'a> Analysis<'a> {
    pub fn new(result: &'a PredictionResult, criteria: Criteria) -> Self {
        Self { result, criteria }
    }

    /// Percentage of predictions within the tolerance of their expected value.
    ///
    /// Returns `NaN` for an empty result.
    pub fn percentage_accuracy(&self) -> f64 {
        let tolerance = self.criteria.tolerance + TOLERANCE_SLACK;
        let hits = self
            .result
            .pairs()
            .filter(|(predicted, expected)| (predicted - expected).abs() <= tolerance)
            .count();

        ratio(hits, self.result.len()) * 100.0
    }

    /// Ratio of popular records predicted popular, and of unpopular records
    /// predicted unpopular.
    pub fn precision_recall_analysis(&self) -> PopularityRatios {
        let threshold = self.criteria.popularity_threshold;
        let (mut popular, mut popular_hits) = (0, 0);
        let (mut unpopular, mut unpopular_hits) = (0, 0);

        for (predicted, expected) in self.result.pairs() {
            if expected > threshold {
                popular += 1;
                popular_hits += usize::from(predicted > threshold);
            } else {
                unpopular += 1;
                unpopular_hits += usize::from(predicted <= threshold);
            }
        }

        PopularityRatios {
            popular: ratio(popular_hits, popular),
            unpopular: ratio(unpopular_hits, unpopular),
        }
    }
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        return f64::NAN;
    }
    hits as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRITERIA: Criteria = Criteria {
        tolerance: 0.05,
        popularity_threshold: 0.5,
    };

    fn result(predicted: &[f64], expected: &[f64]) -> PredictionResult {
        PredictionResult::new(predicted.to_vec(), expected.to_vec()).unwrap()
    }

    #[test]
    fn exact_predictions_are_fully_accurate() {
        let r = result(&[0.1, 0.5, 0.9], &[0.1, 0.5, 0.9]);
        assert_eq!(Analysis::new(&r, CRITERIA).percentage_accuracy(), 100.0);
    }

    #[test]
    fn mean_baseline_accuracy() {
        let all_mean = result(&[0.4, 0.4, 0.4], &[0.4, 0.4, 0.4]);
        assert_eq!(Analysis::new(&all_mean, CRITERIA).percentage_accuracy(), 100.0);

        let spread = result(&[0.4, 0.4, 0.4], &[0.9, 0.1, 0.4]);
        let accuracy = Analysis::new(&spread, CRITERIA).percentage_accuracy();
        assert!((accuracy - 100.0 / 3.0).abs() < 1e-9, "got {accuracy}");
    }

    #[test]
    fn tolerance_boundary_is_inclusive_on_both_sides() {
        let r = result(&[0.4, 0.4], &[0.45, 0.35]);
        assert_eq!(Analysis::new(&r, CRITERIA).percentage_accuracy(), 100.0);

        let r = result(&[0.4, 0.4], &[0.46, 0.34]);
        assert_eq!(Analysis::new(&r, CRITERIA).percentage_accuracy(), 0.0);
    }

    #[test]
    fn ratios_count_each_class_separately() {
        let r = result(&[0.6, 0.4, 0.7, 0.2, 0.3], &[0.8, 0.9, 0.1, 0.2, 0.5]);
        let ratios = Analysis::new(&r, CRITERIA).precision_recall_analysis();

        assert_eq!(ratios.popular, 0.5);
        assert!((ratios.unpopular - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_partition_yields_nan() {
        let r = result(&[0.9, 0.1], &[0.8, 0.7]);
        let ratios = Analysis::new(&r, CRITERIA).precision_recall_analysis();

        assert_eq!(ratios.popular, 0.5);
        assert!(ratios.unpopular.is_nan());
    }

    #[test]
    fn ratios_stay_within_unit_interval() {
        let r = result(&[0.0, 1.0, 0.5, 0.51, 0.49], &[1.0, 0.0, 0.5, 0.49, 0.51]);
        let ratios = Analysis::new(&r, CRITERIA).precision_recall_analysis();

        for value in [ratios.popular, ratios.unpopular] {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn empty_result_has_undefined_accuracy() {
        let r = result(&[], &[]);
        assert!(Analysis::new(&r, CRITERIA).percentage_accuracy().is_nan());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(PredictionResult::new(vec![0.1], vec![]).is_err());
    }
}
