use log::debug;
use ml_core::{check_samples, MlError, Predictor, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use smartcore::{
    linalg::basic::matrix::DenseMatrix,
    linear::lasso::{Lasso as L1Regression, LassoParameters},
};

use crate::{
    center::Centering,
    dense::{check_width, solver_error, to_dense},
};

const DEFAULT_MAX_ITER: usize = 1000;
const DEFAULT_TOL: f64 = 1e-4;

type Model = L1Regression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Least squares with an L1 penalty.
///
/// Minimizes `(1 / (2 * n)) * ||y - X w - b||^2 + alpha * ||w||_1`, with the
/// intercept `b` left unpenalized. Features are centered but not rescaled, so
/// `alpha` applies to the weights in the units of the inputs.
///
/// The solver needs more training samples than varying features.
pub struct Lasso {
    alpha: f64,
    max_iter: usize,
    tol: f64,
    fitted: Option<Fit>,
}

struct Fit {
    /// `None` when no feature varied during training.
    model: Option<Model>,
    centering: Centering,
    width: usize,
}

impl Lasso {
    /// Returns a new `Lasso`.
    ///
    /// # Arguments
    /// * `alpha` - Strength of the L1 penalty, must be finite and non negative.
    ///
    /// # Errors
    /// `MlError::InvalidParameter` if `alpha` is out of range.
    pub fn new(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(MlError::InvalidParameter {
                name: "alpha",
                reason: format!("must be finite and >= 0, got {alpha}"),
            });
        }

        Ok(Self {
            alpha,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            fitted: None,
        })
    }

    /// Sets the maximum amount of solver iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the duality gap under which the solver stops.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    fn parameters(&self) -> LassoParameters {
        LassoParameters::default()
            .with_alpha(self.alpha)
            .with_normalize(false)
            .with_tol(self.tol)
            .with_max_iter(self.max_iter)
    }
}

impl Predictor for Lasso {
    fn name(&self) -> &'static str {
        "lasso"
    }

    fn fit(&mut self, inputs: ArrayView2<f64>, outputs: ArrayView1<f64>) -> Result<()> {
        check_samples(inputs, outputs)?;
        debug!(
            "fitting lasso: samples={} features={} alpha={}",
            inputs.nrows(),
            inputs.ncols(),
            self.alpha
        );

        let centering = Centering::fit(inputs, outputs)?;
        let model = if centering.is_degenerate() {
            debug!("every feature is constant, lasso reduces to the mean");
            None
        } else {
            let x = to_dense(centering.inputs(inputs).view());
            let y = centering.outputs(outputs);
            Some(Model::fit(&x, &y, self.parameters()).map_err(solver_error)?)
        };

        self.fitted = Some(Fit {
            model,
            centering,
            width: inputs.ncols(),
        });
        Ok(())
    }

    fn predict(&self, inputs: ArrayView2<f64>) -> Result<Array1<f64>> {
        let fit = self.fitted.as_ref().ok_or(MlError::NotFitted)?;
        check_width(inputs, fit.width)?;

        let y_mean = fit.centering.y_mean;
        let Some(model) = &fit.model else {
            return Ok(Array1::from_elem(inputs.nrows(), y_mean));
        };

        let x = to_dense(fit.centering.inputs(inputs).view());
        let predicted = model.predict(&x).map_err(solver_error)?;
        Ok(Array1::from(predicted) + y_mean)
    }
}
