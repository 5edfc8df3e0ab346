use ndarray::ArrayView1;

use crate::{MlError, Result};

/// Computes the coefficient of determination `1 - SS_res / SS_tot`.
///
/// When `expected` is constant the denominator vanishes; the score is then
/// `1.0` for a perfect prediction and `0.0` otherwise.
///
/// # Errors
/// Returns `MlError::ShapeMismatch` if the lengths differ and
/// `MlError::InvalidInput` if both are empty.
pub fn r2_score(expected: ArrayView1<f64>, predicted: ArrayView1<f64>) -> Result<f64> {
    if expected.len() != predicted.len() {
        return Err(MlError::ShapeMismatch {
            what: "predictions",
            got: predicted.len(),
            expected: expected.len(),
        });
    }

    let Some(mean) = expected.mean() else {
        return Err(MlError::InvalidInput("cannot score zero samples"));
    };

    let ss_res: f64 = expected
        .iter()
        .zip(predicted)
        .map(|(y, y_pred)| (y - y_pred).powi(2))
        .sum();
    let ss_tot: f64 = expected.iter().map(|y| (y - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}
