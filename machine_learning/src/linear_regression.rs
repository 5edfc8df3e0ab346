use log::debug;
use ml_core::{check_samples, MlError, Predictor, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use smartcore::{
    linalg::basic::matrix::DenseMatrix,
    linear::linear_regression::{
        LinearRegression as LeastSquares, LinearRegressionParameters, LinearRegressionSolverName,
    },
};

use crate::dense::{check_width, solver_error, to_dense};

type Model = LeastSquares<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Ordinary least squares regression with an intercept.
///
/// Solved through SVD, so redundant features (one-hot columns summing to the
/// intercept, genres that never appear in training) get the minimum-norm fit.
#[derive(Default)]
pub struct LinearRegression {
    fitted: Option<(Model, usize)>,
}

impl LinearRegression {
    /// Returns a new, unfitted `LinearRegression`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Predictor for LinearRegression {
    fn name(&self) -> &'static str {
        "linear regression"
    }

    fn fit(&mut self, inputs: ArrayView2<f64>, outputs: ArrayView1<f64>) -> Result<()> {
        check_samples(inputs, outputs)?;
        debug!(
            "fitting least squares: samples={} features={}",
            inputs.nrows(),
            inputs.ncols()
        );

        let parameters =
            LinearRegressionParameters::default().with_solver(LinearRegressionSolverName::SVD);
        let model =
            Model::fit(&to_dense(inputs), &outputs.to_vec(), parameters).map_err(solver_error)?;

        self.fitted = Some((model, inputs.ncols()));
        Ok(())
    }

    fn predict(&self, inputs: ArrayView2<f64>) -> Result<Array1<f64>> {
        let (model, width) = self.fitted.as_ref().ok_or(MlError::NotFitted)?;
        check_width(inputs, *width)?;

        let predicted = model.predict(&to_dense(inputs)).map_err(solver_error)?;
        Ok(Array1::from(predicted))
    }
}
