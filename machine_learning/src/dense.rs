use ml_core::MlError;
use ndarray::ArrayView2;
use smartcore::{
    error::Failed,
    linalg::basic::{arrays::Array2 as _, matrix::DenseMatrix},
};

/// Copies `inputs` into the row-major matrix smartcore estimators expect.
pub(crate) fn to_dense(inputs: ArrayView2<f64>) -> DenseMatrix<f64> {
    DenseMatrix::from_iterator(inputs.iter().copied(), inputs.nrows(), inputs.ncols(), 0)
}

pub(crate) fn solver_error(err: Failed) -> MlError {
    MlError::Solver(err.to_string())
}

/// Rejects `inputs` whose width differs from the one seen during `fit`.
pub(crate) fn check_width(inputs: ArrayView2<f64>, expected: usize) -> ml_core::Result<()> {
    if inputs.ncols() != expected {
        return Err(MlError::ShapeMismatch {
            what: "features",
            got: inputs.ncols(),
            expected,
        });
    }

    Ok(())
}
