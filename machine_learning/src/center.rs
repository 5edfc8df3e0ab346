use ml_core::{MlError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Column means of the features that vary across the training samples, along
/// with the mean output.
///
/// Constant columns carry no signal for a centered model, so they are left
/// out of the transformed inputs entirely.
pub(crate) struct Centering {
    columns: Vec<usize>,
    x_mean: Array1<f64>,
    pub y_mean: f64,
}

impl Centering {
    pub fn fit(inputs: ArrayView2<f64>, outputs: ArrayView1<f64>) -> Result<Self> {
        let y_mean = outputs
            .mean()
            .ok_or(MlError::InvalidInput("cannot center zero samples"))?;

        let columns: Vec<usize> = inputs
            .columns()
            .into_iter()
            .enumerate()
            .filter(|(_, column)| column.iter().any(|&v| v != column[0]))
            .map(|(j, _)| j)
            .collect();

        let x_mean = inputs
            .select(Axis(1), &columns)
            .mean_axis(Axis(0))
            .ok_or(MlError::InvalidInput("cannot center zero samples"))?;

        Ok(Self {
            columns,
            x_mean,
            y_mean,
        })
    }

    /// Returns `true` when every feature was constant during `fit`.
    pub fn is_degenerate(&self) -> bool {
        self.columns.is_empty()
    }

    /// Keeps the varying columns of `inputs` and shifts them by the fitted means.
    pub fn inputs(&self, inputs: ArrayView2<f64>) -> Array2<f64> {
        &inputs.select(Axis(1), &self.columns) - &self.x_mean
    }

    pub fn outputs(&self, outputs: ArrayView1<f64>) -> Vec<f64> {
        outputs.iter().map(|y| y - self.y_mean).collect()
    }
}
