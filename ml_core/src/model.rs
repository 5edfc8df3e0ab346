use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{r2_score, MlError, Result};

/// A regression model mapping feature vectors to a scalar output.
///
/// Rows of `inputs` are feature vectors, all of the same width. A `Predictor`
/// does not:
/// - build feature vectors,
/// - split datasets,
/// - decide how predictions are judged.
pub trait Predictor {
    /// Short human-readable name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Fits the model to the given samples, replacing any previous fit.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `inputs.nrows() != outputs.len()`, or
    /// `MlError::InvalidInput` if there are no samples.
    fn fit(&mut self, inputs: ArrayView2<f64>, outputs: ArrayView1<f64>) -> Result<()>;

    /// Predicts one output per row of `inputs`.
    ///
    /// # Errors
    /// Returns `MlError::NotFitted` before `fit`, or `MlError::ShapeMismatch` if
    /// the width of `inputs` differs from the one seen during `fit`.
    fn predict(&self, inputs: ArrayView2<f64>) -> Result<Array1<f64>>;

    /// Returns the coefficient of determination of the predictions on `inputs`
    /// against `outputs`.
    ///
    /// # Errors
    /// Same as `predict`, plus a shape mismatch between rows and outputs.
    fn score(&self, inputs: ArrayView2<f64>, outputs: ArrayView1<f64>) -> Result<f64> {
        let predicted = self.predict(inputs)?;
        r2_score(outputs, predicted.view())
    }
}

/// Checks the invariants shared by every `fit` implementation.
///
/// # Errors
/// Returns `MlError` if the sample counts disagree or there are no samples.
pub fn check_samples(inputs: ArrayView2<f64>, outputs: ArrayView1<f64>) -> Result<()> {
    if inputs.nrows() != outputs.len() {
        return Err(MlError::ShapeMismatch {
            what: "outputs",
            got: outputs.len(),
            expected: inputs.nrows(),
        });
    }

    if inputs.nrows() == 0 {
        return Err(MlError::InvalidInput("cannot fit on zero samples"));
    }

    Ok(())
}
