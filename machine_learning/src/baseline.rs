use log::debug;
use ml_core::{check_samples, MlError, Predictor, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Null model predicting the mean of the training outputs for every input.
///
/// Features are ignored apart from their width, which must stay the same
/// between `fit` and `predict`.
#[derive(Debug, Default, Clone)]
pub struct MeanBaseline {
    fitted: Option<(f64, usize)>,
}

impl MeanBaseline {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Predictor for MeanBaseline {
    fn name(&self) -> &'static str {
        "training mean baseline"
    }

    fn fit(&mut self, inputs: ArrayView2<f64>, outputs: ArrayView1<f64>) -> Result<()> {
        check_samples(inputs, outputs)?;

        let mean = outputs
            .mean()
            .ok_or(MlError::InvalidInput("cannot fit on zero samples"))?;
        debug!("baseline mean over {} samples: {mean}", outputs.len());

        self.fitted = Some((mean, inputs.ncols()));
        Ok(())
    }

    fn predict(&self, inputs: ArrayView2<f64>) -> Result<Array1<f64>> {
        let (mean, width) = self.fitted.ok_or(MlError::NotFitted)?;
        if inputs.ncols() != width {
            return Err(MlError::ShapeMismatch {
                what: "features",
                got: inputs.ncols(),
                expected: width,
            });
        }

        Ok(Array1::from_elem(inputs.nrows(), mean))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn predicts_training_mean_everywhere() {
        let mut model = MeanBaseline::new();
        model
            .fit(Array2::zeros((3, 2)).view(), array![0.2, 0.4, 0.6].view())
            .unwrap();

        let predicted = model.predict(Array2::ones((4, 2)).view()).unwrap();
        assert_eq!(predicted.len(), 4);
        assert!(predicted.iter().all(|p| (p - 0.4).abs() < 1e-12));
    }

    #[test]
    fn refuses_empty_training_set() {
        let mut model = MeanBaseline::new();
        let err = model
            .fit(Array2::zeros((0, 1)).view(), Array1::zeros(0).view())
            .unwrap_err();
        assert!(matches!(err, MlError::InvalidInput(_)));
    }
}
